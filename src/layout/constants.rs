//! Byte layout of the shared memory region
//!
//! The layout is fixed by the game server. All multi-byte values are
//! little-endian and floats are IEEE-754 single precision. Arrays holding
//! 64-bit ids are 8-byte aligned, so their count field is followed by
//! 4 bytes of padding.

/// Size of every scalar field and count field
pub const SCALAR_BYTES: usize = 4;

/// Number of scalars in the server configuration block
pub const SERVER_CONFIG_FIELDS: usize = 14;
/// Server configuration block size
pub const SERVER_CONFIG_BYTES: usize = SERVER_CONFIG_FIELDS * SCALAR_BYTES;

/// Number of scalars in the self info block
pub const SELF_INFO_FIELDS: usize = 11;
/// Self info block size
pub const SELF_INFO_BYTES: usize = SELF_INFO_FIELDS * SCALAR_BYTES;

/// Bytes reserved for the food array
pub const FOOD_MAX_BYTES: usize = 1024 * 1024;
/// Food record stride
pub const FOOD_STRIDE: usize = 20;
/// Maximum number of food records
pub const FOOD_MAX_COUNT: usize = FOOD_MAX_BYTES / FOOD_STRIDE;

/// Bot record stride (8-byte id + 64-byte name)
pub const BOT_STRIDE: usize = 72;
/// Maximum number of bot records
pub const BOT_MAX_COUNT: usize = 1024;
/// Length of the fixed bot name buffer
pub const BOT_NAME_BYTES: usize = 64;

/// Bytes reserved for the segment array
pub const SEGMENT_MAX_BYTES: usize = 1024 * 1024;
/// Segment record stride (36 meaningful bytes padded to 8-byte alignment)
pub const SEGMENT_STRIDE: usize = 40;
/// Maximum number of segment records
pub const SEGMENT_MAX_COUNT: usize = SEGMENT_MAX_BYTES / SEGMENT_STRIDE;

/// Color record stride (r, g, b, padding)
pub const COLOR_STRIDE: usize = 4;
/// Maximum number of colors in the pattern
pub const COLOR_MAX_COUNT: usize = 1024;

/// Log slot size, including the NUL terminator
pub const LOG_MAX_BYTES: usize = 1024;

/// Persistent memory size
pub const PERSISTENT_MAX_BYTES: usize = 4096;

const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) / align * align
}

pub const SERVER_CONFIG_OFFSET: usize = 0;
pub const SELF_INFO_OFFSET: usize = SERVER_CONFIG_OFFSET + SERVER_CONFIG_BYTES;

pub const FOOD_COUNT_OFFSET: usize = SELF_INFO_OFFSET + SELF_INFO_BYTES;
pub const FOOD_RECORDS_OFFSET: usize = FOOD_COUNT_OFFSET + SCALAR_BYTES;

pub const BOT_COUNT_OFFSET: usize = FOOD_RECORDS_OFFSET + FOOD_MAX_COUNT * FOOD_STRIDE;
pub const BOT_RECORDS_OFFSET: usize = align_up(BOT_COUNT_OFFSET + SCALAR_BYTES, 8);

pub const SEGMENT_COUNT_OFFSET: usize = BOT_RECORDS_OFFSET + BOT_MAX_COUNT * BOT_STRIDE;
pub const SEGMENT_RECORDS_OFFSET: usize = align_up(SEGMENT_COUNT_OFFSET + SCALAR_BYTES, 8);

pub const COLOR_COUNT_OFFSET: usize = SEGMENT_RECORDS_OFFSET + SEGMENT_MAX_COUNT * SEGMENT_STRIDE;
pub const COLOR_RECORDS_OFFSET: usize = COLOR_COUNT_OFFSET + SCALAR_BYTES;

pub const LOG_OFFSET: usize = COLOR_RECORDS_OFFSET + COLOR_MAX_COUNT * COLOR_STRIDE;
pub const FACE_ID_OFFSET: usize = LOG_OFFSET + LOG_MAX_BYTES;
pub const DOG_TAG_ID_OFFSET: usize = FACE_ID_OFFSET + SCALAR_BYTES;
pub const PERSISTENT_OFFSET: usize = DOG_TAG_ID_OFFSET + SCALAR_BYTES;

/// Minimum mapped size of a valid region
pub const SHARED_MEMORY_BYTES: usize = align_up(PERSISTENT_OFFSET + PERSISTENT_MAX_BYTES, 8);

// Offsets published by the game server.
const _: () = assert!(FOOD_COUNT_OFFSET == 100);
const _: () = assert!(BOT_COUNT_OFFSET == 1_048_664);
const _: () = assert!(BOT_RECORDS_OFFSET == 1_048_672);
const _: () = assert!(SEGMENT_COUNT_OFFSET == 1_122_400);
const _: () = assert!(SEGMENT_RECORDS_OFFSET == 1_122_408);
const _: () = assert!(COLOR_COUNT_OFFSET == 2_170_968);
const _: () = assert!(LOG_OFFSET == 2_175_068);
const _: () = assert!(FACE_ID_OFFSET == 2_176_092);
const _: () = assert!(PERSISTENT_OFFSET == 2_176_100);
const _: () = assert!(SHARED_MEMORY_BYTES == 2_180_200);

/// One row of the layout table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

/// Every top-level field of the region in address order
pub const LAYOUT: [LayoutEntry; 14] = [
    LayoutEntry { name: "serverConfig", offset: SERVER_CONFIG_OFFSET, size: SERVER_CONFIG_BYTES },
    LayoutEntry { name: "selfInfo", offset: SELF_INFO_OFFSET, size: SELF_INFO_BYTES },
    LayoutEntry { name: "foodCount", offset: FOOD_COUNT_OFFSET, size: SCALAR_BYTES },
    LayoutEntry {
        name: "foodInfo",
        offset: FOOD_RECORDS_OFFSET,
        size: FOOD_MAX_COUNT * FOOD_STRIDE,
    },
    LayoutEntry { name: "botCount", offset: BOT_COUNT_OFFSET, size: SCALAR_BYTES },
    LayoutEntry { name: "botInfo", offset: BOT_RECORDS_OFFSET, size: BOT_MAX_COUNT * BOT_STRIDE },
    LayoutEntry { name: "segmentCount", offset: SEGMENT_COUNT_OFFSET, size: SCALAR_BYTES },
    LayoutEntry {
        name: "segmentInfo",
        offset: SEGMENT_RECORDS_OFFSET,
        size: SEGMENT_MAX_COUNT * SEGMENT_STRIDE,
    },
    LayoutEntry { name: "colorCount", offset: COLOR_COUNT_OFFSET, size: SCALAR_BYTES },
    LayoutEntry {
        name: "colors",
        offset: COLOR_RECORDS_OFFSET,
        size: COLOR_MAX_COUNT * COLOR_STRIDE,
    },
    LayoutEntry { name: "logData", offset: LOG_OFFSET, size: LOG_MAX_BYTES },
    LayoutEntry { name: "faceID", offset: FACE_ID_OFFSET, size: SCALAR_BYTES },
    LayoutEntry { name: "dogTagID", offset: DOG_TAG_ID_OFFSET, size: SCALAR_BYTES },
    LayoutEntry { name: "persistentData", offset: PERSISTENT_OFFSET, size: PERSISTENT_MAX_BYTES },
];
