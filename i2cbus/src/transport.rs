//! Raw transport beneath a bus connection.
//!
//! A transport is the stateful handle the kernel hands out for one bus:
//! setting the target address changes what the next read or write talks
//! to. [`Connection`](crate::Connection) owns a transport behind its lock
//! and is the only caller of these primitives, always pairing an address-set
//! with the transfer that follows it.

use std::io;

/// Blocking byte-level access to an I2C bus.
pub trait Transport: Send {
    /// Select the peripheral that subsequent transfers target.
    fn set_address(&mut self, addr: u8) -> io::Result<()>;

    /// Write `buf` to the selected peripheral, returning the count written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Read into `buf` from the selected peripheral, returning the count read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the underlying handle.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}
