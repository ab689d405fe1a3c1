//! Linux i2c-dev character device transport.
//!
//! The kernel exposes each I2C adapter as `/dev/i2c-N` once the `i2c-dev`
//! module is loaded (`modprobe i2c-dev`). Every `read(2)` or `write(2)` on
//! the node is one complete I2C transaction against the peripheral chosen
//! by the most recent `I2C_SLAVE` ioctl on the same descriptor.

use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    os::fd::{AsRawFd, IntoRawFd},
    path::PathBuf,
};

use crate::{
    error::{Error, Result},
    transport::Transport,
};

/// ioctl request selecting the target peripheral address.
pub const I2C_SLAVE: u16 = 0x0703;

mod ioctl {
    // I2C_SLAVE predates the _IOW encoding and takes the address by value.
    nix::ioctl_write_int_bad!(set_slave, super::I2C_SLAVE);
}

/// Path of the device node for bus `bus`.
pub fn device_path(bus: u32) -> PathBuf {
    PathBuf::from(format!("/dev/i2c-{}", bus))
}

/// An open `/dev/i2c-N` node.
#[derive(Debug)]
pub struct DevNode {
    file: File,
}

impl DevNode {
    /// Open the node for bus `bus` read-write.
    pub fn open(bus: u32) -> Result<Self> {
        let path = device_path(bus);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| Error::Open { path, source })?;

        Ok(Self { file })
    }
}

impl Transport for DevNode {
    fn set_address(&mut self, addr: u8) -> io::Result<()> {
        // SAFETY: the descriptor is owned by `self.file` and stays open for
        // the duration of the call; the argument is passed by value.
        unsafe { ioctl::set_slave(self.file.as_raw_fd(), addr.into()) }?;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn close(self) -> io::Result<()> {
        // Dropping a File swallows close(2) errors; take the descriptor back
        // so the result reaches the caller.
        nix::unistd::close(self.file.into_raw_fd())?;
        Ok(())
    }
}
