//! Shared fixtures: a region file mapped twice, once for the bot and once
//! for a stand-in game server writing into it.

#![allow(dead_code)]

use std::sync::Arc;

use spnbot::{
    layout::{
        BOT_COUNT_OFFSET, BOT_NAME_BYTES, BOT_RECORDS_OFFSET, BOT_STRIDE, FOOD_COUNT_OFFSET,
        FOOD_RECORDS_OFFSET, FOOD_STRIDE, LOG_MAX_BYTES, LOG_OFFSET, SCALAR_BYTES,
        SEGMENT_COUNT_OFFSET, SEGMENT_RECORDS_OFFSET, SEGMENT_STRIDE, SELF_INFO_OFFSET,
        SERVER_CONFIG_OFFSET, SHARED_MEMORY_BYTES,
    },
    BotApi, FoodInfo, RegionConfig, SegmentInfo, SharedMemoryRegion,
};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub bot_region: Arc<SharedMemoryRegion>,
    pub server: FakeServer,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shm");
        let config = RegionConfig::file(&path, SHARED_MEMORY_BYTES);
        let server = FakeServer {
            region: SharedMemoryRegion::new(config).unwrap(),
        };
        let bot_region = Arc::new(SharedMemoryRegion::open(&path).unwrap());

        Self {
            dir,
            bot_region,
            server,
        }
    }

    pub fn api(&self) -> BotApi {
        BotApi::new(Arc::clone(&self.bot_region)).unwrap()
    }
}

/// Writes the server-owned parts of the region the way the game does
pub struct FakeServer {
    pub region: SharedMemoryRegion,
}

impl FakeServer {
    pub fn set_server_u32(&self, index: usize, value: u32) {
        self.write(SERVER_CONFIG_OFFSET + index * SCALAR_BYTES, &value.to_le_bytes());
    }

    pub fn set_server_f32(&self, index: usize, value: f32) {
        self.write(SERVER_CONFIG_OFFSET + index * SCALAR_BYTES, &value.to_le_bytes());
    }

    pub fn set_self_u32(&self, index: usize, value: u32) {
        self.write(SELF_INFO_OFFSET + index * SCALAR_BYTES, &value.to_le_bytes());
    }

    pub fn set_self_f32(&self, index: usize, value: f32) {
        self.write(SELF_INFO_OFFSET + index * SCALAR_BYTES, &value.to_le_bytes());
    }

    pub fn set_food(&self, food: &[FoodInfo]) {
        for (i, item) in food.iter().enumerate() {
            let mut record = [0u8; FOOD_STRIDE];
            for (j, value) in [item.x, item.y, item.val, item.dir, item.dist].iter().enumerate() {
                record[j * 4..j * 4 + 4].copy_from_slice(&value.to_le_bytes());
            }
            self.write(FOOD_RECORDS_OFFSET + i * FOOD_STRIDE, &record);
        }
        self.set_food_count(food.len() as u32);
    }

    pub fn set_food_count(&self, count: u32) {
        self.write(FOOD_COUNT_OFFSET, &count.to_le_bytes());
    }

    pub fn set_bots(&self, bots: &[(u64, &str)]) {
        for (i, (id, name)) in bots.iter().enumerate() {
            let mut record = [0u8; BOT_STRIDE];
            record[..8].copy_from_slice(&id.to_le_bytes());
            let name = name.as_bytes();
            let len = name.len().min(BOT_NAME_BYTES);
            record[8..8 + len].copy_from_slice(&name[..len]);
            self.write(BOT_RECORDS_OFFSET + i * BOT_STRIDE, &record);
        }
        self.write(BOT_COUNT_OFFSET, &(bots.len() as u32).to_le_bytes());
    }

    pub fn set_segments(&self, segments: &[SegmentInfo]) {
        for (i, segment) in segments.iter().enumerate() {
            let mut record = [0u8; SEGMENT_STRIDE];
            for (j, value) in [segment.x, segment.y, segment.r, segment.dir, segment.dist]
                .iter()
                .enumerate()
            {
                record[j * 4..j * 4 + 4].copy_from_slice(&value.to_le_bytes());
            }
            record[20..24].copy_from_slice(&segment.idx.to_le_bytes());
            record[24..32].copy_from_slice(&segment.bot_id.to_le_bytes());
            record[32] = segment.is_self as u8;
            self.write(SEGMENT_RECORDS_OFFSET + i * SEGMENT_STRIDE, &record);
        }
        self.set_segment_count(segments.len() as u32);
    }

    pub fn set_segment_count(&self, count: u32) {
        self.write(SEGMENT_COUNT_OFFSET, &count.to_le_bytes());
    }

    /// The log message as the server would forward it
    pub fn log_message(&self) -> Vec<u8> {
        let mut slot = [0u8; LOG_MAX_BYTES];
        self.region.read_into(LOG_OFFSET, &mut slot).unwrap();
        let end = slot.iter().position(|&b| b == 0).expect("log slot not terminated");
        slot[..end].to_vec()
    }

    pub fn read(&self, offset: usize, length: usize) -> Vec<u8> {
        let mut buf = vec![0u8; length];
        self.region.read_into(offset, &mut buf).unwrap();
        buf
    }

    pub fn write(&self, offset: usize, data: &[u8]) {
        self.region.write_from(offset, data).unwrap();
    }
}

pub fn food(x: f32, y: f32, val: f32, dir: f32, dist: f32) -> FoodInfo {
    FoodInfo { x, y, val, dir, dist }
}

pub fn segment(dist: f32, idx: u32, bot_id: u64, is_self: bool) -> SegmentInfo {
    SegmentInfo {
        x: dist,
        y: 0.0,
        r: 1.5,
        dir: 0.0,
        dist,
        idx,
        bot_id,
        is_self,
    }
}
