//! Server configuration and self info blocks

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::memory::SharedMemoryRegion;

use super::{
    constants::{SELF_INFO_OFFSET, SERVER_CONFIG_OFFSET},
    fields::{FieldBlock, FieldSpec},
};

/// Field table of the server configuration block, in layout order
pub static SERVER_CONFIG_LAYOUT: [FieldSpec; 14] = [
    FieldSpec::u32("snake_boost_steps"),
    FieldSpec::f32("snake_turn_radius_factor"),
    FieldSpec::f32("snake_pull_factor"),
    FieldSpec::f32("snake_conversion_factor"),
    FieldSpec::f32("snake_segment_distance_factor"),
    FieldSpec::f32("snake_segment_distance_exponent"),
    FieldSpec::f32("snake_consume_range"),
    FieldSpec::f32("snake_boost_loss_factor"),
    FieldSpec::f32("snake_survival_loss_factor"),
    FieldSpec::f32("snake_self_kill_mass_threshold"),
    FieldSpec::f32("food_decay_step"),
    FieldSpec::f32("log_credits_per_frame"),
    FieldSpec::f32("log_initial_credits"),
    FieldSpec::f32("log_max_credits"),
];

/// Field table of the self info block, in layout order
pub static SELF_INFO_LAYOUT: [FieldSpec; 11] = [
    FieldSpec::f32("segment_radius"),
    FieldSpec::f32("mass"),
    FieldSpec::f32("sight_radius"),
    FieldSpec::f32("consume_radius"),
    FieldSpec::u32("start_frame"),
    FieldSpec::u32("current_frame"),
    FieldSpec::f32("speed"),
    FieldSpec::f32("max_step_angle"),
    FieldSpec::f32("consumed_natural_food"),
    FieldSpec::f32("consumed_food_hunted_by_self"),
    FieldSpec::f32("consumed_food_hunted_by_others"),
];

/// Static server and world configuration.
///
/// Filled once by the server before the bot starts.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    block: FieldBlock,
}

/// Owned copy of every server configuration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerConfigSnapshot {
    pub snake_boost_steps: u32,
    pub snake_turn_radius_factor: f32,
    pub snake_pull_factor: f32,
    pub snake_conversion_factor: f32,
    pub snake_segment_distance_factor: f32,
    pub snake_segment_distance_exponent: f32,
    pub snake_consume_range: f32,
    pub snake_boost_loss_factor: f32,
    pub snake_survival_loss_factor: f32,
    pub snake_self_kill_mass_threshold: f32,
    pub food_decay_step: f32,
    pub log_credits_per_frame: f32,
    pub log_initial_credits: f32,
    pub log_max_credits: f32,
}

impl ServerConfig {
    pub(crate) fn new(region: Arc<SharedMemoryRegion>) -> Self {
        Self {
            block: FieldBlock::new(region, SERVER_CONFIG_OFFSET, &SERVER_CONFIG_LAYOUT),
        }
    }

    /// Number of steps a snake moves per frame while boosting
    pub fn snake_boost_steps(&self) -> u32 {
        self.block.read_u32(0)
    }

    /// Multiplied with the segment radius to get the inner turn radius
    pub fn snake_turn_radius_factor(&self) -> f32 {
        self.block.read_f32(1)
    }

    /// How fast segments move to the center of a loop
    pub fn snake_pull_factor(&self) -> f32 {
        self.block.read_f32(2)
    }

    /// Share of a dead snake's mass converted to food
    pub fn snake_conversion_factor(&self) -> f32 {
        self.block.read_f32(3)
    }

    /// segment distance = (mass * factor)^exponent
    pub fn snake_segment_distance_factor(&self) -> f32 {
        self.block.read_f32(4)
    }

    /// segment distance = (mass * factor)^exponent
    pub fn snake_segment_distance_exponent(&self) -> f32 {
        self.block.read_f32(5)
    }

    /// Consume range multiplier (times the segment radius)
    pub fn snake_consume_range(&self) -> f32 {
        self.block.read_f32(6)
    }

    /// Mass share lost per frame while boosting
    pub fn snake_boost_loss_factor(&self) -> f32 {
        self.block.read_f32(7)
    }

    /// Mass share dropped every frame
    pub fn snake_survival_loss_factor(&self) -> f32 {
        self.block.read_f32(8)
    }

    /// Mass below which a snake starves
    pub fn snake_self_kill_mass_threshold(&self) -> f32 {
        self.block.read_f32(9)
    }

    /// Food decays by this value each frame
    pub fn food_decay_step(&self) -> f32 {
        self.block.read_f32(10)
    }

    pub fn log_credits_per_frame(&self) -> f32 {
        self.block.read_f32(11)
    }

    pub fn log_initial_credits(&self) -> f32 {
        self.block.read_f32(12)
    }

    pub fn log_max_credits(&self) -> f32 {
        self.block.read_f32(13)
    }

    /// Copy every value out in one pass
    pub fn snapshot(&self) -> ServerConfigSnapshot {
        ServerConfigSnapshot {
            snake_boost_steps: self.snake_boost_steps(),
            snake_turn_radius_factor: self.snake_turn_radius_factor(),
            snake_pull_factor: self.snake_pull_factor(),
            snake_conversion_factor: self.snake_conversion_factor(),
            snake_segment_distance_factor: self.snake_segment_distance_factor(),
            snake_segment_distance_exponent: self.snake_segment_distance_exponent(),
            snake_consume_range: self.snake_consume_range(),
            snake_boost_loss_factor: self.snake_boost_loss_factor(),
            snake_survival_loss_factor: self.snake_survival_loss_factor(),
            snake_self_kill_mass_threshold: self.snake_self_kill_mass_threshold(),
            food_decay_step: self.food_decay_step(),
            log_credits_per_frame: self.log_credits_per_frame(),
            log_initial_credits: self.log_initial_credits(),
            log_max_credits: self.log_max_credits(),
        }
    }

    /// Underlying scalar block
    pub fn fields(&self) -> &FieldBlock {
        &self.block
    }
}

/// Live state of this bot's snake, rewritten every frame
#[derive(Debug, Clone)]
pub struct SelfInfo {
    block: FieldBlock,
}

/// Owned copy of the self info block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelfInfoSnapshot {
    pub segment_radius: f32,
    pub mass: f32,
    pub sight_radius: f32,
    pub consume_radius: f32,
    pub start_frame: u32,
    pub current_frame: u32,
    pub speed: f32,
    pub max_step_angle: f32,
    pub consumed_natural_food: f32,
    pub consumed_food_hunted_by_self: f32,
    pub consumed_food_hunted_by_others: f32,
}

impl SelfInfo {
    pub(crate) fn new(region: Arc<SharedMemoryRegion>) -> Self {
        Self {
            block: FieldBlock::new(region, SELF_INFO_OFFSET, &SELF_INFO_LAYOUT),
        }
    }

    /// Radius of the snake's segments
    pub fn segment_radius(&self) -> f32 {
        self.block.read_f32(0)
    }

    /// Current mass
    pub fn mass(&self) -> f32 {
        self.block.read_f32(1)
    }

    /// Radius around the head in which food and segments are visible
    pub fn sight_radius(&self) -> f32 {
        self.block.read_f32(2)
    }

    /// Radius around the head in which food is consumed
    pub fn consume_radius(&self) -> f32 {
        self.block.read_f32(3)
    }

    /// Frame number the snake was spawned in
    pub fn start_frame(&self) -> u32 {
        self.block.read_u32(4)
    }

    /// Current frame number
    pub fn current_frame(&self) -> u32 {
        self.block.read_u32(5)
    }

    /// Distance per step
    pub fn speed(&self) -> f32 {
        self.block.read_f32(6)
    }

    /// Maximum direction change in this step
    pub fn max_step_angle(&self) -> f32 {
        self.block.read_f32(7)
    }

    pub fn consumed_natural_food(&self) -> f32 {
        self.block.read_f32(8)
    }

    pub fn consumed_food_hunted_by_self(&self) -> f32 {
        self.block.read_f32(9)
    }

    pub fn consumed_food_hunted_by_others(&self) -> f32 {
        self.block.read_f32(10)
    }

    /// Copy every value out in one pass
    pub fn snapshot(&self) -> SelfInfoSnapshot {
        SelfInfoSnapshot {
            segment_radius: self.segment_radius(),
            mass: self.mass(),
            sight_radius: self.sight_radius(),
            consume_radius: self.consume_radius(),
            start_frame: self.start_frame(),
            current_frame: self.current_frame(),
            speed: self.speed(),
            max_step_angle: self.max_step_angle(),
            consumed_natural_food: self.consumed_natural_food(),
            consumed_food_hunted_by_self: self.consumed_food_hunted_by_self(),
            consumed_food_hunted_by_others: self.consumed_food_hunted_by_others(),
        }
    }

    /// Underlying scalar block
    pub fn fields(&self) -> &FieldBlock {
        &self.block
    }
}
