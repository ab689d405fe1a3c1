//! Subcommands and their execution against an open bus.

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use i2cbus::{Connection, Transport};

use crate::parse::{parse_addr, parse_count, parse_hex, parse_int, parse_u8};
use crate::tracing::prelude::*;

/// Register value layout on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    U8,
    #[value(name = "u16be")]
    U16Be,
    #[value(name = "u16le")]
    U16Le,
    #[value(name = "s16be")]
    S16Be,
    #[value(name = "s16le")]
    S16Le,
}

impl Format {
    fn range(self) -> (i64, i64) {
        match self {
            Format::U8 => (0, u8::MAX.into()),
            Format::U16Be | Format::U16Le => (0, u16::MAX.into()),
            Format::S16Be | Format::S16Le => (i16::MIN.into(), i16::MAX.into()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read raw bytes from a peripheral
    Read {
        /// Peripheral address
        #[arg(value_parser = parse_addr)]
        addr: u8,
        /// Number of bytes to read
        #[arg(value_parser = parse_count)]
        count: usize,
    },

    /// Write raw bytes to a peripheral
    Write {
        /// Peripheral address
        #[arg(value_parser = parse_addr)]
        addr: u8,
        /// Bytes to send as a hex string, e.g. 0fab
        #[arg(value_parser = parse_hex)]
        data: ::std::vec::Vec<u8>,
    },

    /// Read a register
    Get {
        /// Peripheral address
        #[arg(value_parser = parse_addr)]
        addr: u8,
        /// Register reference
        #[arg(value_parser = parse_u8)]
        reg: u8,
        #[arg(short, long, value_enum, default_value = "u8")]
        format: Format,
    },

    /// Write a register
    Set {
        /// Peripheral address
        #[arg(value_parser = parse_addr)]
        addr: u8,
        /// Register reference
        #[arg(value_parser = parse_u8)]
        reg: u8,
        /// Value to write
        #[arg(value_parser = parse_int, allow_negative_numbers = true)]
        value: i64,
        #[arg(short, long, value_enum, default_value = "u8")]
        format: Format,
    },
}

/// Run `command`, returning the line to print, if any.
pub fn run<T: Transport>(bus: &Connection<T>, command: &Command) -> Result<Option<String>> {
    match *command {
        Command::Read { addr, count } => {
            let mut data = vec![0u8; count];
            bus.read(addr, &mut data)
                .with_context(|| format!("Failed to read {} bytes from 0x{:02x}", count, addr))?;
            Ok(Some(format!("0x{}", hex::encode_upper(&data))))
        }
        Command::Write { addr, ref data } => {
            bus.write(addr, data)
                .with_context(|| format!("Failed to write to 0x{:02x}", addr))?;
            Ok(None)
        }
        Command::Get { addr, reg, format } => {
            let value = read_register(bus, addr, reg, format)
                .with_context(|| format!("Failed to read register 0x{:02x} at 0x{:02x}", reg, addr))?;
            Ok(Some(value))
        }
        Command::Set {
            addr,
            reg,
            value,
            format,
        } => {
            let (min, max) = format.range();
            anyhow::ensure!(
                (min..=max).contains(&value),
                "Value {} does not fit {:?} ({}..={})",
                value,
                format,
                min,
                max
            );
            write_register(bus, addr, reg, value, format)
                .with_context(|| format!("Failed to write register 0x{:02x} at 0x{:02x}", reg, addr))?;
            Ok(None)
        }
    }
}

fn read_register<T: Transport>(
    bus: &Connection<T>,
    addr: u8,
    reg: u8,
    format: Format,
) -> i2cbus::Result<String> {
    let text = match format {
        Format::U8 => format!("0x{:02X}", bus.read_reg_u8(addr, reg)?),
        Format::U16Be => format!("0x{:04X}", bus.read_reg_u16_be(addr, reg)?),
        Format::U16Le => format!("0x{:04X}", bus.read_reg_u16_le(addr, reg)?),
        Format::S16Be => bus.read_reg_s16_be(addr, reg)?.to_string(),
        Format::S16Le => bus.read_reg_s16_le(addr, reg)?.to_string(),
    };
    Ok(text)
}

// `value` has already been range-checked against `format`.
fn write_register<T: Transport>(
    bus: &Connection<T>,
    addr: u8,
    reg: u8,
    value: i64,
    format: Format,
) -> i2cbus::Result<()> {
    debug!(addr, reg, value, ?format, "Writing register");
    match format {
        Format::U8 => bus.write_reg_u8(addr, reg, value as u8),
        Format::U16Be => bus.write_reg_u16_be(addr, reg, value as u16),
        Format::U16Le => bus.write_reg_u16_le(addr, reg, value as u16),
        Format::S16Be => bus.write_reg_s16_be(addr, reg, value as i16),
        Format::S16Le => bus.write_reg_s16_le(addr, reg, value as i16),
    }
}
