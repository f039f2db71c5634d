//! The bot's handle on the shared region

use std::sync::Arc;

use crate::{
    error::{BotError, Result},
    layout::{
        SelfInfo, ServerConfig, BOT_COUNT_OFFSET, BOT_MAX_COUNT, BOT_RECORDS_OFFSET,
        FOOD_COUNT_OFFSET, FOOD_MAX_COUNT, FOOD_RECORDS_OFFSET, SEGMENT_COUNT_OFFSET,
        SEGMENT_MAX_COUNT, SEGMENT_RECORDS_OFFSET, SHARED_MEMORY_BYTES,
    },
    memory::SharedMemoryRegion,
    records::{BotInfo, Color, ColorPattern, FoodInfo, LiveRecordView, SegmentInfo},
    store::{LogSlot, PersistentMemory},
};

/// Everything a bot can see and set, backed by the shared region.
///
/// Built once per connection and lent to the bot on every callback.
/// Server-owned data (configuration, self info, food, bots, segments) is
/// read live; the color pattern, log slot and persistent memory are written
/// by the bot.
#[derive(Debug)]
pub struct BotApi {
    region: Arc<SharedMemoryRegion>,
    server_config: ServerConfig,
    self_info: SelfInfo,
    food: LiveRecordView<FoodInfo>,
    bots: LiveRecordView<BotInfo>,
    segments: LiveRecordView<SegmentInfo>,
    colors: ColorPattern,
    log: LogSlot,
    persistent: PersistentMemory,
    face_id: u32,
    dog_tag_id: u32,
}

impl BotApi {
    /// Lay the accessors over `region`, which must hold the full layout
    pub fn new(region: Arc<SharedMemoryRegion>) -> Result<Self> {
        if region.size() < SHARED_MEMORY_BYTES {
            return Err(BotError::region_too_small(SHARED_MEMORY_BYTES, region.size()));
        }

        Ok(Self {
            server_config: ServerConfig::new(Arc::clone(&region)),
            self_info: SelfInfo::new(Arc::clone(&region)),
            food: LiveRecordView::new(
                Arc::clone(&region),
                FOOD_COUNT_OFFSET,
                FOOD_RECORDS_OFFSET,
                FOOD_MAX_COUNT,
            ),
            bots: LiveRecordView::new(
                Arc::clone(&region),
                BOT_COUNT_OFFSET,
                BOT_RECORDS_OFFSET,
                BOT_MAX_COUNT,
            ),
            segments: LiveRecordView::new(
                Arc::clone(&region),
                SEGMENT_COUNT_OFFSET,
                SEGMENT_RECORDS_OFFSET,
                SEGMENT_MAX_COUNT,
            ),
            colors: ColorPattern::new(Arc::clone(&region)),
            log: LogSlot::new(Arc::clone(&region)),
            persistent: PersistentMemory::new(Arc::clone(&region)),
            face_id: 0,
            dog_tag_id: 0,
            region,
        })
    }

    /// Static server configuration
    pub fn server_config(&self) -> &ServerConfig {
        &self.server_config
    }

    /// Live state of this bot's snake
    pub fn self_info(&self) -> &SelfInfo {
        &self.self_info
    }

    /// Food in sight, closest first
    pub fn food(&self) -> &LiveRecordView<FoodInfo> {
        &self.food
    }

    /// Bots owning the segments in sight
    pub fn bots(&self) -> &LiveRecordView<BotInfo> {
        &self.bots
    }

    /// Segments in sight, closest first
    pub fn segments(&self) -> &LiveRecordView<SegmentInfo> {
        &self.segments
    }

    /// Current color pattern
    pub fn colors(&self) -> &ColorPattern {
        &self.colors
    }

    /// Remove every color; call before adding a custom pattern
    pub fn clear_colors(&mut self) {
        self.colors.clear();
    }

    /// Append a color to the pattern. Ignored once 1024 colors are set.
    pub fn add_color(&mut self, r: u8, g: u8, b: u8) {
        self.colors.append(r, g, b);
    }

    /// Append several colors in order
    pub fn add_colors<I: IntoIterator<Item = Color>>(&mut self, colors: I) {
        for color in colors {
            self.colors.append(color.r, color.g, color.b);
        }
    }

    /// Memory that survives the snake's death
    pub fn persistent_memory(&self) -> &PersistentMemory {
        &self.persistent
    }

    pub fn persistent_memory_mut(&mut self) -> &mut PersistentMemory {
        &mut self.persistent
    }

    pub fn read_persistent_memory(&self, offset: usize, length: usize) -> Result<Vec<u8>> {
        self.persistent.read(offset, length)
    }

    pub fn write_persistent_memory(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        self.persistent.write(offset, data)
    }

    /// Publish a log message for this frame.
    ///
    /// Replaces the previous message. Returns `false` if the message was
    /// too long and dropped. The server rate-limits what it forwards.
    pub fn log(&mut self, message: impl AsRef<str>) -> bool {
        self.log.write_message(message.as_ref())
    }

    pub fn face_id(&self) -> u32 {
        self.face_id
    }

    /// Select a face for the snake (not forwarded by the server yet)
    pub fn set_face_id(&mut self, face_id: u32) {
        self.face_id = face_id;
    }

    pub fn dog_tag_id(&self) -> u32 {
        self.dog_tag_id
    }

    /// Select a dog tag for the snake (not forwarded by the server yet)
    pub fn set_dog_tag_id(&mut self, dog_tag_id: u32) {
        self.dog_tag_id = dog_tag_id;
    }

    /// The underlying region
    pub fn region(&self) -> &Arc<SharedMemoryRegion> {
        &self.region
    }
}
