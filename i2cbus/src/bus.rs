//! Bus connection: one open transport behind one lock.
//!
//! The kernel keeps the target address as per-descriptor state, so an
//! address-set and the transfer after it must run as one unit. Every
//! operation here takes the lock, opens a [`Session`], and performs its
//! address-set plus transfer pairs through it. Nothing outside this module
//! can set the address on its own.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    error::{Error, Result},
    linux::DevNode,
    transport::Transport,
};
use tracing::{debug, trace};

/// A connection to one I2C bus.
///
/// Shareable across threads (`Arc<Connection>`). Operations block the
/// calling thread until the kernel completes the transfer.
pub struct Connection<T: Transport = DevNode> {
    bus: u32,
    transport: Mutex<Option<T>>,
}

impl Connection<DevNode> {
    /// Open `/dev/i2c-<bus>` for read-write access.
    pub fn open(bus: u32) -> Result<Self> {
        let node = DevNode::open(bus)?;
        debug!(bus, "Opened I2C bus");
        Ok(Self::with_transport(bus, node))
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already-open transport.
    pub fn with_transport(bus: u32, transport: T) -> Self {
        Self {
            bus,
            transport: Mutex::new(Some(transport)),
        }
    }

    /// The bus index this connection was opened on.
    pub fn bus(&self) -> u32 {
        self.bus
    }

    /// Whether [`close`](Self::close) has released the device.
    pub fn is_closed(&self) -> bool {
        self.guard().is_none()
    }

    // A panic while holding the lock leaves the descriptor itself intact,
    // so poisoning is ignored.
    fn guard(&self) -> MutexGuard<'_, Option<T>> {
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire the lock for a sequence of transfers.
    pub(crate) fn session(&self) -> Result<Session<'_, T>> {
        let guard = self.guard();
        if guard.is_none() {
            return Err(Error::Closed);
        }
        Ok(Session { guard })
    }

    /// Write `buf` to the peripheral at `addr`.
    ///
    /// A write that the kernel reports as partial is an error.
    pub fn write(&self, addr: u8, buf: &[u8]) -> Result<usize> {
        self.session()?.write(addr, buf)
    }

    /// Read exactly `buf.len()` bytes from the peripheral at `addr`.
    pub fn read(&self, addr: u8, buf: &mut [u8]) -> Result<usize> {
        self.session()?.read(addr, buf)
    }

    /// Write a single byte to the peripheral at `addr`.
    pub fn write_byte(&self, addr: u8, byte: u8) -> Result<usize> {
        self.write(addr, &[byte])
    }

    /// Release the bus device. Every later operation fails with
    /// [`Error::Closed`].
    pub fn close(&self) -> Result<()> {
        let mut guard = self.guard();
        let transport = guard.take().ok_or(Error::Closed)?;
        transport.close().map_err(|source| Error::Close { source })?;
        drop(guard);
        debug!(bus = self.bus, "Closed I2C bus");
        Ok(())
    }
}

/// Exclusive access to an open transport for the lifetime of the guard.
pub(crate) struct Session<'a, T: Transport> {
    guard: MutexGuard<'a, Option<T>>,
}

impl<T: Transport> Session<'_, T> {
    fn transport(&mut self) -> Result<&mut T> {
        self.guard.as_mut().ok_or(Error::Closed)
    }

    fn set_address(&mut self, addr: u8) -> Result<()> {
        self.transport()?
            .set_address(addr)
            .map_err(|source| Error::SetAddress { addr, source })
    }

    /// Address `addr`, then write all of `buf` in one transaction.
    pub(crate) fn write(&mut self, addr: u8, buf: &[u8]) -> Result<usize> {
        self.set_address(addr)?;
        let n = self
            .transport()?
            .write(buf)
            .map_err(|source| Error::Write { addr, source })?;
        if n != buf.len() {
            return Err(Error::ShortWrite {
                addr,
                expected: buf.len(),
                actual: n,
            });
        }
        trace!(addr, data = ?buf, "I2C write");
        Ok(n)
    }

    /// Address `addr`, then fill all of `buf` in one transaction.
    pub(crate) fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<usize> {
        self.set_address(addr)?;
        let n = self
            .transport()?
            .read(buf)
            .map_err(|source| Error::Read { addr, source })?;
        if n != buf.len() {
            return Err(Error::ShortRead {
                addr,
                expected: buf.len(),
                actual: n,
            });
        }
        trace!(addr, data = ?buf, "I2C read");
        Ok(n)
    }
}
