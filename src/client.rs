//! Wiring a bot to a running game server

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    api::BotApi,
    config::{DEFAULT_SHM_PATH, DEFAULT_SOCKET_PATH},
    control::{Bot, ControlLoop, LoopStats, SeqPacketChannel},
    error::Result,
    memory::SharedMemoryRegion,
};

/// Where to find the server's shared region and control socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub shm_path: PathBuf,
    pub socket_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            shm_path: PathBuf::from(DEFAULT_SHM_PATH),
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

impl ClientConfig {
    pub fn with_shm_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.shm_path = path.into();
        self
    }

    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = path.into();
        self
    }
}

/// Map the shared region, connect, and serve commands until the server
/// closes the socket.
///
/// Blocks for the lifetime of the connection.
pub fn run<B: Bot>(config: &ClientConfig, bot: B) -> Result<LoopStats> {
    let region = Arc::new(SharedMemoryRegion::open(&config.shm_path)?);
    let api = BotApi::new(region)?;
    let channel = SeqPacketChannel::connect(&config.socket_path)?;
    ControlLoop::new(channel, bot, api).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{control::FnBot, control::StepDecision, error::BotError};

    #[test]
    fn test_default_paths() {
        let config = ClientConfig::default();
        assert_eq!(config.shm_path, PathBuf::from("/spnshm/shm"));
        assert_eq!(config.socket_path, PathBuf::from("/spnshm/socket"));
    }

    #[test]
    fn test_missing_region_fails_before_connecting() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ClientConfig::default()
            .with_shm_path(dir.path().join("shm"))
            .with_socket_path(dir.path().join("socket"));
        let bot = FnBot::new(
            |_: &mut BotApi| Ok(true),
            |_: &mut BotApi| Ok(StepDecision::steer(0.0)),
        );

        let err = run(&config, bot).unwrap_err();
        assert!(matches!(err, BotError::Io { .. }));
    }
}
