//! In-memory transport standing in for `/dev/i2c-N` in tests.

use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::{Arc, Mutex, MutexGuard},
    thread::{self, ThreadId},
    time::Duration,
};

use nix::errno::Errno;

use crate::transport::Transport;

/// One primitive observed by the fake, as the kernel would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetAddress(u8),
    Write { addr: u8, data: Vec<u8> },
    Read { addr: u8, len: usize },
    Close,
}

#[derive(Debug, Clone)]
pub struct Record {
    pub thread: ThreadId,
    pub event: Event,
}

#[derive(Default)]
struct State {
    current: Option<u8>,
    pointer: HashMap<u8, u8>,
    registers: HashMap<(u8, u8), Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    fail_set_address: bool,
    fail_write: bool,
    fail_read: bool,
    delay: Option<Duration>,
    log: Vec<Record>,
}

/// Register-file peripheral model shared between a connection and the test.
///
/// A write's first byte selects the register pointer of the addressed
/// peripheral. Any further bytes are stored as that register's contents.
/// Reads return queued responses first, then the stored register contents
/// padded with zeros.
#[derive(Clone, Default)]
pub struct FakeDevice {
    state: Arc<Mutex<State>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Queue the bytes returned by the next read.
    pub fn push_response(&self, bytes: &[u8]) {
        self.state().responses.push_back(bytes.to_vec());
    }

    /// Supply at most `limit` bytes per read.
    pub fn limit_reads(&self, limit: usize) {
        self.state().read_limit = Some(limit);
    }

    /// Accept at most `limit` bytes per write.
    pub fn limit_writes(&self, limit: usize) {
        self.state().write_limit = Some(limit);
    }

    pub fn fail_set_address(&self) {
        self.state().fail_set_address = true;
    }

    pub fn fail_writes(&self) {
        self.state().fail_write = true;
    }

    pub fn fail_reads(&self) {
        self.state().fail_read = true;
    }

    /// Sleep inside every primitive so unsynchronized callers would
    /// interleave.
    pub fn slow(&self, delay: Duration) {
        self.state().delay = Some(delay);
    }

    pub fn register(&self, addr: u8, reg: u8) -> Option<Vec<u8>> {
        self.state().registers.get(&(addr, reg)).cloned()
    }

    pub fn records(&self) -> Vec<Record> {
        self.state().log.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().log.iter().map(|r| r.event.clone()).collect()
    }

    fn record(state: &mut State, event: Event) {
        state.log.push(Record {
            thread: thread::current().id(),
            event,
        });
    }

    fn pause(&self) {
        let delay = self.state().delay;
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
    }
}

impl Transport for FakeDevice {
    fn set_address(&mut self, addr: u8) -> io::Result<()> {
        let mut state = self.state();
        Self::record(&mut state, Event::SetAddress(addr));
        if state.fail_set_address {
            return Err(io::Error::from(Errno::EBUSY));
        }
        state.current = Some(addr);
        drop(state);

        self.pause();
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state();
        let addr = state.current.expect("write without address");
        Self::record(
            &mut state,
            Event::Write {
                addr,
                data: buf.to_vec(),
            },
        );
        if state.fail_write {
            return Err(io::Error::from(Errno::EREMOTEIO));
        }

        let accepted = state.write_limit.map_or(buf.len(), |n| n.min(buf.len()));
        if let Some((&reg, data)) = buf[..accepted].split_first() {
            state.pointer.insert(addr, reg);
            if !data.is_empty() {
                state.registers.insert((addr, reg), data.to_vec());
            }
        }
        drop(state);

        self.pause();
        Ok(accepted)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state();
        let addr = state.current.expect("read without address");
        Self::record(
            &mut state,
            Event::Read {
                addr,
                len: buf.len(),
            },
        );
        if state.fail_read {
            return Err(io::Error::from(Errno::EREMOTEIO));
        }

        let queued = state.responses.pop_front();
        let source = match queued {
            Some(bytes) => bytes,
            None => state
                .pointer
                .get(&addr)
                .and_then(|reg| state.registers.get(&(addr, *reg)))
                .cloned()
                .unwrap_or_default(),
        };
        let supplied = state.read_limit.map_or(buf.len(), |n| n.min(buf.len()));
        for (i, byte) in buf[..supplied].iter_mut().enumerate() {
            *byte = source.get(i).copied().unwrap_or(0);
        }
        drop(state);

        self.pause();
        Ok(supplied)
    }

    fn close(self) -> io::Result<()> {
        Self::record(&mut self.state(), Event::Close);
        Ok(())
    }
}

/// Panic if any transfer was not immediately preceded by an address-set for
/// the same peripheral from the same thread.
pub fn assert_transfers_paired(records: &[Record]) {
    for (i, record) in records.iter().enumerate() {
        let addr = match &record.event {
            Event::Write { addr, .. } | Event::Read { addr, .. } => *addr,
            _ => continue,
        };
        let prev = i
            .checked_sub(1)
            .map(|j| &records[j])
            .unwrap_or_else(|| panic!("transfer at {} has no address-set", i));
        assert_eq!(
            prev.event,
            Event::SetAddress(addr),
            "transfer at {} not preceded by its address-set",
            i
        );
        assert_eq!(
            prev.thread, record.thread,
            "address-set and transfer at {} came from different threads",
            i
        );
    }
}
