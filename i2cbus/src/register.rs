//! SMBus-style register access.
//!
//! A register read writes the one-byte register reference, then reads the
//! value. A register write sends the reference followed by the value in a
//! single transaction. Both phases run under one lock acquisition, so no
//! other thread's traffic can land between the reference and the data.
//!
//! 16-bit values are big-endian on the wire unless the method says `_le`.

use tracing::debug;

use crate::{bus::Connection, error::Result, transport::Transport};

impl<T: Transport> Connection<T> {
    /// Write `[reg]`, then read exactly `N` bytes.
    fn read_reg_bytes<const N: usize>(&self, addr: u8, reg: u8) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_reg_block(addr, reg, &mut buf)?;
        Ok(buf)
    }

    fn write_reg_bytes(&self, addr: u8, reg: u8, value: &[u8]) -> Result<()> {
        let mut frame = Vec::with_capacity(1 + value.len());
        frame.push(reg);
        frame.extend_from_slice(value);

        self.session()?.write(addr, &frame)?;
        debug!(addr, reg, value = ?value, "Wrote register");
        Ok(())
    }

    /// Read `buf.len()` consecutive bytes starting at register `reg`.
    pub fn read_reg_block(&self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
        let mut session = self.session()?;
        session.write(addr, &[reg])?;
        session.read(addr, buf)?;
        drop(session);

        debug!(addr, reg, value = ?buf, "Read register");
        Ok(())
    }

    /// Read the byte held in register `reg`.
    pub fn read_reg_u8(&self, addr: u8, reg: u8) -> Result<u8> {
        let [value] = self.read_reg_bytes::<1>(addr, reg)?;
        Ok(value)
    }

    /// Write `[reg, value]`.
    pub fn write_reg_u8(&self, addr: u8, reg: u8, value: u8) -> Result<()> {
        self.write_reg_bytes(addr, reg, &[value])
    }

    /// Read a word sent most significant byte first.
    pub fn read_reg_u16_be(&self, addr: u8, reg: u8) -> Result<u16> {
        self.read_reg_bytes(addr, reg).map(u16::from_be_bytes)
    }

    /// Read a word sent least significant byte first.
    pub fn read_reg_u16_le(&self, addr: u8, reg: u8) -> Result<u16> {
        self.read_reg_u16_be(addr, reg).map(u16::swap_bytes)
    }

    /// Read a two's-complement word sent most significant byte first.
    pub fn read_reg_s16_be(&self, addr: u8, reg: u8) -> Result<i16> {
        self.read_reg_bytes(addr, reg).map(i16::from_be_bytes)
    }

    /// Read a two's-complement word sent least significant byte first.
    pub fn read_reg_s16_le(&self, addr: u8, reg: u8) -> Result<i16> {
        self.read_reg_s16_be(addr, reg).map(i16::swap_bytes)
    }

    /// Write `[reg, high, low]`.
    pub fn write_reg_u16_be(&self, addr: u8, reg: u8, value: u16) -> Result<()> {
        self.write_reg_bytes(addr, reg, &value.to_be_bytes())
    }

    /// Write `[reg, low, high]`.
    pub fn write_reg_u16_le(&self, addr: u8, reg: u8, value: u16) -> Result<()> {
        self.write_reg_u16_be(addr, reg, value.swap_bytes())
    }

    /// Write the two's-complement pattern of `value` as `[reg, high, low]`.
    pub fn write_reg_s16_be(&self, addr: u8, reg: u8, value: i16) -> Result<()> {
        self.write_reg_bytes(addr, reg, &value.to_be_bytes())
    }

    /// Write the two's-complement pattern of `value` as `[reg, low, high]`.
    pub fn write_reg_s16_le(&self, addr: u8, reg: u8, value: i16) -> Result<()> {
        self.write_reg_s16_be(addr, reg, value.swap_bytes())
    }
}
