//! Shared memory region management and operations

pub mod config;
pub mod regions;

pub use config::{BackingType, RegionConfig};
pub use regions::SharedMemoryRegion;
