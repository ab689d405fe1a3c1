//! Read and write I2C peripherals from the command line.
//!
//! ```text
//! i2ctool --bus 1 read 0x40 2
//! i2ctool --bus 1 write 0x40 0fab
//! i2ctool --bus 1 get 0x48 0x00 --format s16be
//! i2ctool --bus 1 set 0x4c 0x4a 0x23
//! ```
//!
//! Set `I2CTOOL_BUS` to omit `--bus`.

mod command;
mod config;
mod parse;
mod tracing;

use anyhow::{Context, Result};
use clap::Parser;
use i2cbus::Connection;

use command::Command;
use config::ToolConfig;
use parse::parse_bus;
use crate::tracing::prelude::*;

/// Raw and register-level access to Linux I2C peripherals
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bus index; selects /dev/i2c-<BUS>
    #[arg(short, long, global = true, value_parser = parse_bus)]
    bus: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    crate::tracing::init_journald_or_stderr();

    let config = ToolConfig::from_env();
    let bus = args
        .bus
        .or(config.bus)
        .context("No bus given; pass --bus or set I2CTOOL_BUS")?;

    let conn = Connection::open(bus).with_context(|| format!("Failed to open I2C bus {}", bus))?;
    debug!(bus, command = ?args.command, "Running command");

    // Close even when the command fails, but report the command's error first.
    let outcome = command::run(&conn, &args.command);
    let closed = conn.close();
    if let Some(line) = outcome? {
        println!("{}", line);
    }
    closed.context("Failed to close I2C bus")?;

    Ok(())
}
