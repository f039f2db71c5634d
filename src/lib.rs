//! # spnbot - Bot client for the SPN snake game
//!
//! A bot runs as its own process next to the game server. The server
//! publishes the world around the bot's snake in a shared memory region and
//! drives the bot over a `SOCK_SEQPACKET` control socket, one command per
//! frame. The bot answers each command with a steering decision and may
//! write back a color pattern, a log message and persistent memory.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   Game server                    │
//! └──────────────────────────────────────────────────┘
//!        │ shared region                │ control socket
//!        ▼                              ▼
//! ┌────────────────────────┐   ┌─────────────────────┐
//! │ BotApi                 │   │ ControlLoop         │
//! │ - server config        │◄──│ - init / step       │
//! │ - self info            │   │ - fault containment │
//! │ - food, bots, segments │   └─────────────────────┘
//! │ - colors, log, memory  │              │
//! └────────────────────────┘              ▼
//!                                 ┌───────────────┐
//!                                 │ impl Bot      │
//!                                 └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use spnbot::{BotApi, ClientConfig, FnBot, StepDecision};
//!
//! let bot = FnBot::new(
//!     |api: &mut BotApi| {
//!         api.clear_colors();
//!         api.add_color(255, 0, 0);
//!         Ok(true)
//!     },
//!     |api: &mut BotApi| {
//!         let angle = match api.food().get(0) {
//!             Ok(food) => food.dir,
//!             Err(_) => 0.0,
//!         };
//!         Ok(StepDecision::steer(angle))
//!     },
//! );
//! spnbot::run(&ClientConfig::default(), bot).unwrap();
//! ```

pub mod api;
pub mod client;
pub mod control;
pub mod error;
pub mod layout;
pub mod memory;
pub mod records;
pub mod store;

pub use api::BotApi;
pub use client::{run, ClientConfig};
pub use control::{
    Bot, CallbackFault, ControlChannel, ControlLoop, FnBot, LoopPhase, LoopStats,
    SeqPacketChannel, StepDecision, StepResponse,
};
pub use error::{BotError, Result};
pub use layout::{SelfInfo, ServerConfig};
pub use memory::{BackingType, RegionConfig, SharedMemoryRegion};
pub use records::{BotInfo, Color, ColorPattern, FoodInfo, LiveRecordView, SegmentInfo};
pub use store::{LogSlot, PersistentMemory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration constants
pub mod config {
    /// Where the server mounts the shared region inside the bot container
    pub const DEFAULT_SHM_PATH: &str = "/spnshm/shm";

    /// The server's listening control socket
    pub const DEFAULT_SOCKET_PATH: &str = "/spnshm/socket";

    pub use crate::layout::{
        COLOR_MAX_COUNT, LOG_MAX_BYTES, PERSISTENT_MAX_BYTES, SHARED_MEMORY_BYTES,
    };
}
