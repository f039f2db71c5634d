//! Command and response frames exchanged on the control channel
//!
//! Request (server → bot), 4 bytes:
//!
//! ```text
//! ┌──────────────────┐
//! │ command u32 (LE) │  0 = init, 1 = step
//! └──────────────────┘
//! ```
//!
//! Response (bot → server), 12 bytes:
//!
//! ```text
//! ┌──────────────────┬────────────────┬──────────┬─────────┐
//! │ failed u32 (LE)  │ angle f32 (LE) │ boost u8 │ 3 × pad │
//! └──────────────────┴────────────────┴──────────┴─────────┘
//! ```

use crate::error::{BotError, Result};

/// Size of a command frame
pub const REQUEST_BYTES: usize = 4;

/// Size of a response frame
pub const RESPONSE_BYTES: usize = 12;

/// A decoded command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Sent once after startup
    Init,
    /// Sent every frame
    Step,
    /// Any other code; answered without invoking the bot
    Unknown(u32),
}

impl Command {
    pub const INIT_CODE: u32 = 0;
    pub const STEP_CODE: u32 = 1;

    pub fn from_code(code: u32) -> Self {
        match code {
            Self::INIT_CODE => Command::Init,
            Self::STEP_CODE => Command::Step,
            other => Command::Unknown(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Command::Init => Self::INIT_CODE,
            Command::Step => Self::STEP_CODE,
            Command::Unknown(code) => *code,
        }
    }

    /// Decode a received frame; `None` if it is shorter than a command
    pub fn decode(frame: &[u8]) -> Option<Self> {
        let code: [u8; REQUEST_BYTES] = frame.get(..REQUEST_BYTES)?.try_into().ok()?;
        Some(Self::from_code(u32::from_le_bytes(code)))
    }

    pub fn encode(&self) -> [u8; REQUEST_BYTES] {
        self.code().to_le_bytes()
    }
}

/// The bot's answer to one command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResponse {
    pub success: bool,
    /// Heading change in radians
    pub angle: f32,
    pub boost: bool,
}

impl StepResponse {
    /// State before any command has been answered
    pub const INITIAL: StepResponse = StepResponse {
        success: false,
        angle: 0.0,
        boost: false,
    };

    /// Encode; the wire carries a failure flag, so success maps to 0
    pub fn encode(&self) -> [u8; RESPONSE_BYTES] {
        let mut frame = [0u8; RESPONSE_BYTES];
        let failed: u32 = if self.success { 0 } else { 1 };
        frame[0..4].copy_from_slice(&failed.to_le_bytes());
        frame[4..8].copy_from_slice(&self.angle.to_le_bytes());
        frame[8] = self.boost as u8;
        frame
    }

    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < RESPONSE_BYTES {
            return Err(BotError::invalid_parameter(
                "frame",
                format!("response needs {} bytes, got {}", RESPONSE_BYTES, frame.len()),
            ));
        }
        let failed = u32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let angle = f32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
        Ok(Self {
            success: failed == 0,
            angle,
            boost: frame[8] != 0,
        })
    }
}

impl Default for StepResponse {
    fn default() -> Self {
        Self::INITIAL
    }
}
