//! The request/response loop driving a bot

use std::{
    io,
    panic::{self, AssertUnwindSafe},
};

use crate::{
    api::BotApi,
    error::{BotError, Result},
};

use super::{
    bot::Bot,
    channel::ControlChannel,
    fault::{self, CallbackFault, CallbackKind},
    protocol::{Command, StepResponse, REQUEST_BYTES},
};

/// Receive buffer; larger than a command so oversized frames are not split
const RECV_BUFFER_BYTES: usize = 64;

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Blocked on the next command
    AwaitingCommand,
    /// A command is being handled
    Dispatching,
    /// The server hung up
    Closed,
}

/// Counters kept over the life of a loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub commands: u64,
    pub init_calls: u64,
    pub step_calls: u64,
    pub unknown_commands: u64,
    pub malformed_frames: u64,
    pub faults: u64,
}

/// Serves commands from `channel` by calling into `bot`.
///
/// Exactly one response goes out per command received. The response always
/// carries the most recent decision; a fault only clears its success flag.
pub struct ControlLoop<C: ControlChannel, B: Bot> {
    channel: C,
    bot: B,
    api: BotApi,
    last: StepResponse,
    phase: LoopPhase,
    stats: LoopStats,
}

impl<C: ControlChannel, B: Bot> ControlLoop<C, B> {
    pub fn new(channel: C, bot: B, api: BotApi) -> Self {
        fault::install_panic_hook();
        Self {
            channel,
            bot,
            api,
            last: StepResponse::INITIAL,
            phase: LoopPhase::AwaitingCommand,
            stats: LoopStats::default(),
        }
    }

    /// Serve until the server closes the channel
    pub fn run(&mut self) -> Result<LoopStats> {
        log::info!("control loop started");
        while self.run_once()? != LoopPhase::Closed {}
        log::info!(
            "control loop finished after {} commands ({} faults)",
            self.stats.commands,
            self.stats.faults
        );
        Ok(self.stats)
    }

    /// Handle a single command; returns the phase afterwards
    pub fn run_once(&mut self) -> Result<LoopPhase> {
        if self.phase == LoopPhase::Closed {
            return Ok(LoopPhase::Closed);
        }

        let mut buf = [0u8; RECV_BUFFER_BYTES];
        let received = match self.receive(&mut buf)? {
            Some(received) => received,
            None => {
                self.phase = LoopPhase::Closed;
                return Ok(self.phase);
            }
        };

        self.phase = LoopPhase::Dispatching;
        self.stats.commands += 1;
        self.dispatch(&buf[..received]);

        match self.channel.send(&self.last.encode()) {
            Ok(()) => self.phase = LoopPhase::AwaitingCommand,
            Err(e) if is_disconnect(&e) => {
                log::info!("control channel closed while sending: {}", e);
                self.phase = LoopPhase::Closed;
            }
            Err(e) => {
                log::error!("failed to send response: {}", e);
                return Err(BotError::from_io(e, "Failed to send response"));
            }
        }

        Ok(self.phase)
    }

    /// `None` once the peer has closed the channel
    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        loop {
            match self.channel.recv(buf) {
                Ok(0) => {
                    log::info!("control channel closed by server");
                    return Ok(None);
                }
                Ok(n) => return Ok(Some(n)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_disconnect(&e) => {
                    log::info!("control channel reset: {}", e);
                    return Ok(None);
                }
                Err(e) => {
                    log::error!("failed to receive command: {}", e);
                    return Err(BotError::from_io(e, "Failed to receive command"));
                }
            }
        }
    }

    fn dispatch(&mut self, frame: &[u8]) {
        let command = match Command::decode(frame) {
            Some(command) => command,
            None => {
                self.stats.malformed_frames += 1;
                log::warn!(
                    "ignoring {}-byte frame, commands are {} bytes",
                    frame.len(),
                    REQUEST_BYTES
                );
                return;
            }
        };

        log::debug!("command {:?}", command);
        match command {
            Command::Init => {
                self.stats.init_calls += 1;
                let bot = &mut self.bot;
                match invoke(CallbackKind::Init, &mut self.api, |api| bot.init(api)) {
                    Ok(started) => {
                        log::debug!("init returned {}", started);
                        self.last = StepResponse {
                            success: started,
                            angle: 0.0,
                            boost: false,
                        };
                    }
                    Err(fault) => self.record_fault(fault),
                }
            }
            Command::Step => {
                self.stats.step_calls += 1;
                let bot = &mut self.bot;
                match invoke(CallbackKind::Step, &mut self.api, |api| bot.step(api)) {
                    Ok(decision) => self.last = decision.into(),
                    Err(fault) => self.record_fault(fault),
                }
            }
            Command::Unknown(code) => {
                self.stats.unknown_commands += 1;
                log::warn!("unknown command {}, repeating last response", code);
            }
        }
    }

    fn record_fault(&mut self, fault: CallbackFault) {
        self.stats.faults += 1;
        log::warn!("{}", fault);
        self.api.log(fault.log_message());
        self.last.success = false;
    }

    pub fn api(&self) -> &BotApi {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut BotApi {
        &mut self.api
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// The response sent for the most recent command
    pub fn last_response(&self) -> StepResponse {
        self.last
    }

    pub fn into_parts(self) -> (C, B, BotApi) {
        (self.channel, self.bot, self.api)
    }
}

/// Run one callback, turning errors and panics into a fault report
fn invoke<T, F>(
    callback: CallbackKind,
    api: &mut BotApi,
    f: F,
) -> std::result::Result<T, CallbackFault>
where
    F: FnOnce(&mut BotApi) -> Result<T>,
{
    fault::clear_panic_location();
    match panic::catch_unwind(AssertUnwindSafe(|| f(api))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(CallbackFault::from_error(callback, &err)),
        Err(payload) => Err(CallbackFault::from_panic(
            callback,
            payload.as_ref(),
            fault::take_panic_location(),
        )),
    }
}

fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe
    )
}
