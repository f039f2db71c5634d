//! Command channel, bot interface and the loop tying them together

pub mod bot;
pub mod channel;
pub mod fault;
pub mod protocol;
pub mod runner;

pub use bot::{Bot, FnBot, StepDecision};
pub use channel::{ControlChannel, SeqPacketChannel};
pub use fault::{CallbackFault, CallbackKind, FaultKind};
pub use protocol::{Command, StepResponse, REQUEST_BYTES, RESPONSE_BYTES};
pub use runner::{ControlLoop, LoopPhase, LoopStats};
