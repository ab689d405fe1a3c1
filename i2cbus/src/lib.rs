//! Userspace access to Linux I2C buses.
//!
//! A [`Connection`] owns one open `/dev/i2c-N` node and serializes every
//! transfer on it. On top of raw reads and writes it offers SMBus-style
//! register access: 8-bit values, and 16-bit values in either byte order,
//! signed or unsigned.
//!
//! ```no_run
//! use i2cbus::Connection;
//!
//! let bus = Connection::open(1)?;
//! bus.write_reg_u8(0x4c, 0x4a, 0x23)?;
//! let id = bus.read_reg_u8(0x4c, 0xfd)?;
//! let temp = bus.read_reg_s16_be(0x48, 0x00)?;
//! bus.close()?;
//! # Ok::<(), i2cbus::Error>(())
//! ```
//!
//! The `i2c-dev` kernel module must be loaded for the device nodes to exist.

pub mod bus;
pub mod error;
pub mod linux;
pub mod register;
pub mod transport;

#[cfg(test)]
mod testing;

pub use bus::Connection;
pub use error::{Error, Result};
pub use linux::DevNode;
pub use transport::Transport;
