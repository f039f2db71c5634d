//! The client-owned color pattern

use std::sync::Arc;

use crate::{
    error::Result,
    layout::{COLOR_COUNT_OFFSET, COLOR_MAX_COUNT, COLOR_RECORDS_OFFSET},
    memory::SharedMemoryRegion,
};

use super::{
    types::Color,
    view::{LiveRecordView, RecordIter},
};

/// Bounded, append-only color sequence the server paints the snake with.
///
/// Only the client writes this array. The count stored in the region is the
/// single source of truth: every append reads it, so clones of a pattern
/// never disagree about the next free slot.
#[derive(Debug, Clone)]
pub struct ColorPattern {
    view: LiveRecordView<Color>,
}

impl ColorPattern {
    pub(crate) fn new(region: Arc<SharedMemoryRegion>) -> Self {
        // The server pre-fills a default pattern, which stays in place
        let view = LiveRecordView::new(
            region,
            COLOR_COUNT_OFFSET,
            COLOR_RECORDS_OFFSET,
            COLOR_MAX_COUNT,
        );
        Self { view }
    }

    /// Append a color. A full pattern ignores the call.
    pub fn append(&mut self, r: u8, g: u8, b: u8) {
        let count = self.view.len();
        if count >= COLOR_MAX_COUNT {
            log::debug!("color pattern full, dropping ({}, {}, {})", r, g, b);
            return;
        }

        let region = self.view.region();
        // Record before count: a reader never sees a count covering an unwritten record
        region.store(self.view.record_offset(count), &Color::new(r, g, b).encode());
        region.store(self.view.count_offset(), &(count as u32 + 1).to_le_bytes());
    }

    /// Remove all colors. Old record bytes stay but are unreachable.
    pub fn clear(&mut self) {
        self.view.region().store(self.view.count_offset(), &0u32.to_le_bytes());
    }

    /// Live length as stored in the region
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.view.len() >= COLOR_MAX_COUNT
    }

    pub fn get(&self, index: usize) -> Result<Color> {
        self.view.get(index)
    }

    pub fn iter(&self) -> RecordIter<'_, Color> {
        self.view.iter()
    }
}

impl<'a> IntoIterator for &'a ColorPattern {
    type Item = Color;
    type IntoIter = RecordIter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
