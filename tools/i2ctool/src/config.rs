//! Defaults taken from the environment.

use crate::parse::parse_bus;

/// Tool defaults parsed from environment variables.
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    /// Bus used when `--bus` is not given.
    pub bus: Option<u32>,
}

impl ToolConfig {
    /// Parse configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `I2CTOOL_BUS`: default bus index (decimal or `0x` hex). Ignored if
    ///   it does not parse.
    pub fn from_env() -> Self {
        let bus = std::env::var("I2CTOOL_BUS")
            .ok()
            .and_then(|s| parse_bus(s.trim()).ok());

        Self { bus }
    }
}
