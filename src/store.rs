//! Fixed-size byte stores: persistent memory and the log slot

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{BotError, Result},
    layout::{LOG_MAX_BYTES, LOG_OFFSET, PERSISTENT_MAX_BYTES, PERSISTENT_OFFSET},
    memory::SharedMemoryRegion,
};

/// A bounds-checked byte range at a fixed offset in the region
#[derive(Debug, Clone)]
pub struct ByteStore {
    region: Arc<SharedMemoryRegion>,
    base: usize,
    capacity: usize,
}

impl ByteStore {
    pub(crate) fn new(region: Arc<SharedMemoryRegion>, base: usize, capacity: usize) -> Self {
        debug_assert!(base + capacity <= region.size());
        Self { region, base, capacity }
    }

    fn check(&self, offset: usize, length: usize) -> Result<()> {
        match offset.checked_add(length) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(BotError::out_of_bounds(offset, length, self.capacity)),
        }
    }

    /// Copy `length` bytes starting at `offset`
    pub fn read(&self, offset: usize, length: usize) -> Result<Vec<u8>> {
        self.check(offset, length)?;
        let mut out = vec![0u8; length];
        self.read_into(offset, &mut out)?;
        Ok(out)
    }

    /// Fill `buf` from `offset`
    pub fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        self.check(offset, buf.len())?;
        self.region.read_into(self.base + offset, buf)
    }

    /// Write `data` verbatim at `offset`
    pub fn write(&self, offset: usize, data: &[u8]) -> Result<()> {
        self.check(offset, data.len())?;
        self.region.write_from(self.base + offset, data)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Length + CRC32 header in front of a saved value
const STATE_HEADER_BYTES: usize = 8;

/// Bytes that survive bot restarts.
///
/// The server saves this block when the snake dies and restores it on
/// respawn. Raw byte access and the structured [`save`](Self::save) /
/// [`load`](Self::load) pair share the same bytes.
#[derive(Debug, Clone)]
pub struct PersistentMemory {
    store: ByteStore,
}

impl PersistentMemory {
    pub(crate) fn new(region: Arc<SharedMemoryRegion>) -> Self {
        Self {
            store: ByteStore::new(region, PERSISTENT_OFFSET, PERSISTENT_MAX_BYTES),
        }
    }

    pub fn read(&self, offset: usize, length: usize) -> Result<Vec<u8>> {
        self.store.read(offset, length)
    }

    pub fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        self.store.read_into(offset, buf)
    }

    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        self.store.write(offset, data)
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Serialize `value` into the block as `[len u32][crc32 u32][payload]`
    pub fn save<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let payload = bincode::serialize(value)?;
        let available = self.capacity() - STATE_HEADER_BYTES;
        if payload.len() > available {
            return Err(BotError::insufficient_space(payload.len(), available));
        }

        let mut header = [0u8; STATE_HEADER_BYTES];
        header[..4].copy_from_slice(&(payload.len() as u32).to_le_bytes());
        header[4..].copy_from_slice(&crc32fast::hash(&payload).to_le_bytes());

        self.store.write(STATE_HEADER_BYTES, &payload)?;
        self.store.write(0, &header)
    }

    /// Load a value stored by [`save`](Self::save).
    ///
    /// Returns `Ok(None)` while the header is still zeroed.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let mut header = [0u8; STATE_HEADER_BYTES];
        self.store.read_into(0, &mut header)?;
        if header == [0u8; STATE_HEADER_BYTES] {
            return Ok(None);
        }

        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let expected = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let payload = self.store.read(STATE_HEADER_BYTES, length)?;

        let actual = crc32fast::hash(&payload);
        if actual != expected {
            return Err(BotError::checksum(expected, actual));
        }

        Ok(Some(bincode::deserialize(&payload)?))
    }

    /// Zero the saved-value header so [`load`](Self::load) reports nothing
    pub fn forget(&mut self) -> Result<()> {
        self.store.write(0, &[0u8; STATE_HEADER_BYTES])
    }
}

/// The per-frame log message slot read by the server
#[derive(Debug, Clone)]
pub struct LogSlot {
    store: ByteStore,
}

impl LogSlot {
    pub(crate) fn new(region: Arc<SharedMemoryRegion>) -> Self {
        Self {
            store: ByteStore::new(region, LOG_OFFSET, LOG_MAX_BYTES),
        }
    }

    /// Replace the slot contents with `text` and a NUL terminator.
    ///
    /// Messages that do not fit with their terminator are dropped whole and
    /// `false` is returned; the slot keeps its previous contents.
    pub fn write_message(&mut self, text: &str) -> bool {
        let bytes = text.as_bytes();
        if bytes.len() >= self.store.capacity() {
            log::debug!("dropping {}-byte log message", bytes.len());
            return false;
        }

        let mut framed = Vec::with_capacity(bytes.len() + 1);
        framed.extend_from_slice(bytes);
        framed.push(0);
        match self.store.write(0, &framed) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("log slot write failed: {}", err);
                false
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }
}
