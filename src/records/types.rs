//! Record decoders for food, bots, segments and colors

use serde::{Deserialize, Serialize};

use crate::layout::{BOT_NAME_BYTES, BOT_STRIDE, COLOR_STRIDE, FOOD_STRIDE, SEGMENT_STRIDE};

use super::{le_f32, le_u32, le_u64, Record};

/// A food particle in sight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodInfo {
    /// Relative position X in world orientation
    pub x: f32,
    /// Relative position Y in world orientation
    pub y: f32,
    /// Food value
    pub val: f32,
    /// Direction relative to the current heading, in (-π, π]
    pub dir: f32,
    /// Distance from the center of the head
    pub dist: f32,
}

impl Record for FoodInfo {
    const STRIDE: usize = FOOD_STRIDE;
    const SIZE: usize = FOOD_STRIDE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            x: le_f32(bytes, 0),
            y: le_f32(bytes, 4),
            val: le_f32(bytes, 8),
            dir: le_f32(bytes, 12),
            dist: le_f32(bytes, 16),
        }
    }
}

/// Id and name of a bot owning visible segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotInfo {
    pub bot_id: u64,
    /// Name, possibly truncated by the server
    pub bot_name: String,
}

impl Record for BotInfo {
    const STRIDE: usize = BOT_STRIDE;
    const SIZE: usize = 8 + BOT_NAME_BYTES;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            bot_id: le_u64(bytes, 0),
            bot_name: decode_name(&bytes[8..8 + BOT_NAME_BYTES]),
        }
    }
}

/// Decode a NUL-padded name buffer.
///
/// The server cuts long names at the buffer size, which can split a
/// multi-byte character; the incomplete tail is dropped.
fn decode_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let raw = &raw[..end];
    match std::str::from_utf8(raw) {
        Ok(name) => name.to_owned(),
        Err(err) if err.error_len().is_none() => {
            String::from_utf8_lossy(&raw[..err.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// A snake segment in sight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentInfo {
    /// Relative position X in world orientation
    pub x: f32,
    /// Relative position Y in world orientation
    pub y: f32,
    /// Segment radius
    pub r: f32,
    /// Direction relative to the current heading, in (-π, π]
    pub dir: f32,
    /// Distance between the head center and the segment center
    pub dist: f32,
    /// Segment number counted from the head (head is 0)
    pub idx: u32,
    /// Owning bot
    pub bot_id: u64,
    /// True if the segment belongs to this bot's own snake
    pub is_self: bool,
}

impl Record for SegmentInfo {
    const STRIDE: usize = SEGMENT_STRIDE;
    const SIZE: usize = 36;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            x: le_f32(bytes, 0),
            y: le_f32(bytes, 4),
            r: le_f32(bytes, 8),
            dir: le_f32(bytes, 12),
            dist: le_f32(bytes, 16),
            idx: le_u32(bytes, 20),
            bot_id: le_u64(bytes, 24),
            is_self: bytes[32] != 0,
        }
    }
}

/// One entry of the snake's color pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Wire form: three channel bytes and one zero padding byte
    pub fn encode(&self) -> [u8; COLOR_STRIDE] {
        [self.r, self.g, self.b, 0]
    }
}

impl Record for Color {
    const STRIDE: usize = COLOR_STRIDE;
    const SIZE: usize = 3;

    fn decode(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}
