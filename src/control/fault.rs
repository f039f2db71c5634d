//! Structured reports of failed bot callbacks

use std::{any::Any, cell::RefCell, fmt, panic, sync::Once};

use crate::{error::BotError, layout::LOG_MAX_BYTES};

/// Which callback failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Init,
    Step,
}

impl CallbackKind {
    pub fn name(&self) -> &'static str {
        match self {
            CallbackKind::Init => "init",
            CallbackKind::Step => "step",
        }
    }
}

/// How a callback failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The callback returned an error
    Error(&'static str),
    /// The callback panicked
    Panic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Error(kind) => write!(f, "{}", kind),
            FaultKind::Panic => write!(f, "panic"),
        }
    }
}

/// A contained callback failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFault {
    pub callback: CallbackKind,
    pub kind: FaultKind,
    pub message: String,
    /// `file:line:column` of a panic, when known
    pub location: Option<String>,
}

impl CallbackFault {
    pub fn from_error(callback: CallbackKind, err: &BotError) -> Self {
        Self {
            callback,
            kind: FaultKind::Error(err.kind()),
            message: err.to_string(),
            location: None,
        }
    }

    pub fn from_panic(
        callback: CallbackKind,
        payload: &(dyn Any + Send),
        location: Option<String>,
    ) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self {
            callback,
            kind: FaultKind::Panic,
            message,
            location,
        }
    }

    /// The report cut to fit the log slot with its NUL terminator
    pub fn log_message(&self) -> String {
        let mut text = self.to_string();
        truncate_on_char_boundary(&mut text, LOG_MAX_BYTES - 1);
        text
    }
}

impl fmt::Display for CallbackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({})", self.callback.name(), self.kind)?;
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        write!(f, ": {}", self.message)
    }
}

fn truncate_on_char_boundary(text: &mut String, max_bytes: usize) {
    if text.len() <= max_bytes {
        return;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

thread_local! {
    static LAST_PANIC_LOCATION: RefCell<Option<String>> = RefCell::new(None);
}

static INSTALL_HOOK: Once = Once::new();

/// Record panic locations per thread, then defer to the previous hook
pub(crate) fn install_panic_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if let Some(location) = info.location() {
                let text = format!("{}:{}:{}", location.file(), location.line(), location.column());
                LAST_PANIC_LOCATION.with(|slot| *slot.borrow_mut() = Some(text));
            }
            previous(info);
        }));
    });
}

pub(crate) fn clear_panic_location() {
    LAST_PANIC_LOCATION.with(|slot| slot.borrow_mut().take());
}

pub(crate) fn take_panic_location() -> Option<String> {
    LAST_PANIC_LOCATION.with(|slot| slot.borrow_mut().take())
}
