//! Record types and live views over the region's record arrays
//!
//! ```text
//! count_offset      records_offset
//! ┌───────────┬─────┬──────────┬──────────┬─────┐
//! │ count u32 │ pad │ record 0 │ record 1 │ ... │
//! └───────────┴─────┴──────────┴──────────┴─────┘
//!                    ◄─stride─►
//! ```

pub mod colors;
pub mod types;
pub mod view;

pub use colors::ColorPattern;
pub use types::{BotInfo, Color, FoodInfo, SegmentInfo};
pub use view::{LiveRecordView, RecordIter};

/// Largest meaningful record size across all record types
pub const MAX_RECORD_BYTES: usize = 72;

/// A fixed-size record decoded from the region
pub trait Record: Sized {
    /// Distance between consecutive records
    const STRIDE: usize;
    /// Bytes decoded per record (`<= STRIDE`)
    const SIZE: usize;

    /// Decode from exactly `SIZE` bytes
    fn decode(bytes: &[u8]) -> Self;
}

pub(crate) fn le_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn le_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_bits(le_u32(bytes, at))
}

pub(crate) fn le_u64(bytes: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(raw)
}
