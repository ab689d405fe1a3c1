//! Error types for bus and register operations.
//!
//! Each variant names the phase that failed so callers can tell an
//! address-set rejection apart from a failed or partial transfer.

use std::{io, path::PathBuf};

/// Errors returned by [`Connection`](crate::Connection) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bus device node could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The kernel rejected the target address
    #[error("Failed to set target address 0x{addr:02x}: {source}")]
    SetAddress {
        addr: u8,
        #[source]
        source: io::Error,
    },

    /// Write to the device failed
    #[error("Write to device at 0x{addr:02x} failed: {source}")]
    Write {
        addr: u8,
        #[source]
        source: io::Error,
    },

    /// Read from the device failed
    #[error("Read from device at 0x{addr:02x} failed: {source}")]
    Read {
        addr: u8,
        #[source]
        source: io::Error,
    },

    /// Fewer bytes were written than requested
    #[error("Short write to device at 0x{addr:02x}: {actual} of {expected} bytes")]
    ShortWrite {
        addr: u8,
        expected: usize,
        actual: usize,
    },

    /// Fewer bytes were read than requested
    #[error("Short read from device at 0x{addr:02x}: {actual} of {expected} bytes")]
    ShortRead {
        addr: u8,
        expected: usize,
        actual: usize,
    },

    /// Releasing the device handle failed
    #[error("Failed to close bus device: {source}")]
    Close {
        #[source]
        source: io::Error,
    },

    /// The connection has already been closed
    #[error("Connection closed")]
    Closed,
}

impl Error {
    /// The peripheral address involved in the failure, if any.
    pub fn addr(&self) -> Option<u8> {
        match self {
            Error::SetAddress { addr, .. }
            | Error::Write { addr, .. }
            | Error::Read { addr, .. }
            | Error::ShortWrite { addr, .. }
            | Error::ShortRead { addr, .. } => Some(*addr),
            Error::Open { .. } | Error::Close { .. } | Error::Closed => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn test_display_names_phase_and_address() {
        let err = Error::SetAddress {
            addr: 0x40,
            source: io::Error::from(Errno::EBUSY),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to set target address 0x40"), "{msg}");

        let err = Error::ShortRead {
            addr: 0x4c,
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Short read from device at 0x4c: 1 of 2 bytes"
        );
    }

    #[test]
    fn test_addr_accessor() {
        assert_eq!(Error::Closed.addr(), None);
        let err = Error::Write {
            addr: 0x24,
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert_eq!(err.addr(), Some(0x24));
    }
}
