//! The bot callback interface

use crate::{api::BotApi, error::Result};

use super::protocol::StepResponse;

/// What a bot decided for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDecision {
    /// `false` asks the server for a controlled shutdown of the snake
    pub success: bool,
    /// Heading change relative to the last heading, in radians
    pub angle: f32,
    /// Trade mass for speed this frame
    pub boost: bool,
}

impl StepDecision {
    /// Keep going, turn by `angle`, no boost
    pub fn steer(angle: f32) -> Self {
        Self {
            success: true,
            angle,
            boost: false,
        }
    }

    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = boost;
        self
    }

    /// Give up; the snake dies and respawns
    pub fn stop() -> Self {
        Self {
            success: false,
            angle: 0.0,
            boost: false,
        }
    }
}

impl From<StepDecision> for StepResponse {
    fn from(decision: StepDecision) -> Self {
        StepResponse {
            success: decision.success,
            angle: decision.angle,
            boost: decision.boost,
        }
    }
}

/// User-supplied decision logic.
///
/// Errors and panics raised here are contained by the control loop: the
/// frame is answered as failed and a diagnostic lands in the log slot.
pub trait Bot {
    /// Called once after startup. Return `false` to refuse to start.
    fn init(&mut self, api: &mut BotApi) -> Result<bool>;

    /// Called once per frame
    fn step(&mut self, api: &mut BotApi) -> Result<StepDecision>;
}

impl<B: Bot + ?Sized> Bot for Box<B> {
    fn init(&mut self, api: &mut BotApi) -> Result<bool> {
        (**self).init(api)
    }

    fn step(&mut self, api: &mut BotApi) -> Result<StepDecision> {
        (**self).step(api)
    }
}

/// A [`Bot`] made of two closures
pub struct FnBot<I, S> {
    init: I,
    step: S,
}

impl<I, S> FnBot<I, S>
where
    I: FnMut(&mut BotApi) -> Result<bool>,
    S: FnMut(&mut BotApi) -> Result<StepDecision>,
{
    pub fn new(init: I, step: S) -> Self {
        Self { init, step }
    }
}

impl<I, S> Bot for FnBot<I, S>
where
    I: FnMut(&mut BotApi) -> Result<bool>,
    S: FnMut(&mut BotApi) -> Result<StepDecision>,
{
    fn init(&mut self, api: &mut BotApi) -> Result<bool> {
        (self.init)(api)
    }

    fn step(&mut self, api: &mut BotApi) -> Result<StepDecision> {
        (self.step)(api)
    }
}
