//! Argument parsers for numeric and hex-string inputs.

/// Parse an integer with an optional sign and radix prefix (`0x`, `0o`,
/// `0b`). Plain digits are decimal.
pub fn parse_int(s: &str) -> Result<i64, String> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };

    // from_str_radix takes its own sign, which would allow "0x-5" or "--5".
    if body.starts_with(['+', '-']) {
        return Err(format!("invalid number '{}': misplaced sign", s));
    }
    let magnitude = i64::from_str_radix(body, radix)
        .map_err(|e| format!("invalid number '{}': {}", s, e))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_in_range(s: &str, min: i64, max: i64) -> Result<i64, String> {
    let value = parse_int(s)?;
    if value < min || value > max {
        return Err(format!("{} is out of range {}..={}", s, min, max));
    }
    Ok(value)
}

/// 7-bit peripheral address.
pub fn parse_addr(s: &str) -> Result<u8, String> {
    parse_in_range(s, 0, 0x7f).map(|v| v as u8)
}

/// Register reference.
pub fn parse_u8(s: &str) -> Result<u8, String> {
    parse_in_range(s, 0, u8::MAX.into()).map(|v| v as u8)
}

pub fn parse_bus(s: &str) -> Result<u32, String> {
    parse_in_range(s, 0, u32::MAX.into()).map(|v| v as u32)
}

pub fn parse_count(s: &str) -> Result<usize, String> {
    parse_in_range(s, 1, 4096).map(|v| v as usize)
}

/// Decode a hex string such as `0fab` or `0x0FAB` into bytes.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| format!("invalid hex '{}': {}", s, e))?;
    if bytes.is_empty() {
        return Err("no data to write".to_string());
    }
    Ok(bytes)
}
