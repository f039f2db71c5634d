//! Length-prefixed record arrays read live from the region

use std::{iter::FusedIterator, marker::PhantomData, sync::Arc};

use crate::{
    error::{BotError, Result},
    layout::SCALAR_BYTES,
    memory::SharedMemoryRegion,
};

use super::{Record, MAX_RECORD_BYTES};

/// A fixed-stride record array whose length lives in the region.
///
/// The count field is re-read on every [`len`](Self::len), [`get`](Self::get)
/// and [`iter`](Self::iter). The server may rewrite count and records
/// between any two reads, so each access is an independent snapshot.
#[derive(Debug)]
pub struct LiveRecordView<R> {
    region: Arc<SharedMemoryRegion>,
    count_offset: usize,
    records_offset: usize,
    capacity: usize,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for LiveRecordView<R> {
    fn clone(&self) -> Self {
        Self {
            region: Arc::clone(&self.region),
            count_offset: self.count_offset,
            records_offset: self.records_offset,
            capacity: self.capacity,
            _record: PhantomData,
        }
    }
}

impl<R: Record> LiveRecordView<R> {
    /// The caller guarantees the count field and `capacity` records fit in `region`
    pub(crate) fn new(
        region: Arc<SharedMemoryRegion>,
        count_offset: usize,
        records_offset: usize,
        capacity: usize,
    ) -> Self {
        debug_assert!(R::SIZE <= R::STRIDE && R::SIZE <= MAX_RECORD_BYTES);
        debug_assert!(records_offset >= count_offset + SCALAR_BYTES);
        debug_assert!(records_offset + capacity * R::STRIDE <= region.size());
        Self {
            region,
            count_offset,
            records_offset,
            capacity,
            _record: PhantomData,
        }
    }

    /// Raw count field as last written
    pub fn raw_count(&self) -> u32 {
        u32::from_le_bytes(self.region.load::<SCALAR_BYTES>(self.count_offset))
    }

    /// Live length, freshly read.
    ///
    /// A count larger than the array capacity is clamped so a corrupt
    /// count never reads into the neighboring field.
    pub fn len(&self) -> usize {
        let count = self.raw_count() as usize;
        if count > self.capacity {
            log::warn!(
                "record count {} at offset {} exceeds capacity {}",
                count,
                self.count_offset,
                self.capacity
            );
            return self.capacity;
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of records the array can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Decode record `index`, bounded by the live length
    pub fn get(&self, index: usize) -> Result<R> {
        let length = self.len();
        if index >= length {
            return Err(BotError::out_of_range(index, length));
        }
        Ok(self.decode_at(index))
    }

    /// Start a traversal; the live length is captured now
    pub fn iter(&self) -> RecordIter<'_, R> {
        RecordIter {
            view: self,
            cursor: 0,
            end: self.len(),
        }
    }

    /// Collect the current contents into owned records
    pub fn to_vec(&self) -> Vec<R> {
        self.iter().collect()
    }

    pub(crate) fn region(&self) -> &Arc<SharedMemoryRegion> {
        &self.region
    }

    pub(crate) fn count_offset(&self) -> usize {
        self.count_offset
    }

    pub(crate) fn record_offset(&self, index: usize) -> usize {
        self.records_offset + index * R::STRIDE
    }

    fn decode_at(&self, index: usize) -> R {
        // Copy out first so a concurrent server write cannot change bytes mid-decode
        let mut buf = [0u8; MAX_RECORD_BYTES];
        let bytes = &mut buf[..R::SIZE];
        if let Err(err) = self.region.read_into(self.record_offset(index), bytes) {
            panic!("record {} outside the mapped region: {}", index, err);
        }
        R::decode(bytes)
    }
}

impl<'a, R: Record> IntoIterator for &'a LiveRecordView<R> {
    type Item = R;
    type IntoIter = RecordIter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One traversal over a [`LiveRecordView`].
///
/// The end is fixed when the traversal starts and is not re-checked per
/// step. Records are still read live, so a traversal that races a server
/// update may mix old and new records.
#[derive(Debug)]
pub struct RecordIter<'a, R> {
    view: &'a LiveRecordView<R>,
    cursor: usize,
    end: usize,
}

impl<'a, R: Record> Iterator for RecordIter<'a, R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        if self.cursor >= self.end {
            return None;
        }
        let record = self.view.decode_at(self.cursor);
        self.cursor += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<'a, R: Record> ExactSizeIterator for RecordIter<'a, R> {}

impl<'a, R: Record> FusedIterator for RecordIter<'a, R> {}
