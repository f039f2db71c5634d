//! Fixed binary layout of the shared region and its scalar blocks

pub mod blocks;
pub mod constants;
pub mod fields;

pub use blocks::{
    SelfInfo, SelfInfoSnapshot, ServerConfig, ServerConfigSnapshot, SELF_INFO_LAYOUT,
    SERVER_CONFIG_LAYOUT,
};
pub use constants::*;
pub use fields::{FieldBlock, FieldSpec, ScalarKind, ScalarValue};
