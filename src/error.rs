//! Error types and handling for spnbot

/// Result type alias for spnbot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Error types for region access, the control channel and bot callbacks
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// I/O related errors (file operations, mmap, socket traffic)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Record index at or beyond the live length of an array
    #[error("Index out of range: index {index}, length {length}")]
    OutOfRange { index: usize, length: usize },

    /// Byte window extends past the end of a fixed-size store
    #[error("Out of bounds: offset {offset} + length {length} > capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        length: usize,
        capacity: usize,
    },

    /// Mapped region cannot hold the shared memory layout
    #[error("Region too small: {required} bytes required, {actual} mapped")]
    RegionTooSmall { required: usize, actual: usize },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Insufficient space for a stored value
    #[error("Insufficient space: requested {requested}, available {available}")]
    InsufficientSpace { requested: usize, available: usize },

    /// Stored data does not match its checksum
    #[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Checksum { expected: u32, actual: u32 },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Platform-specific errors
    #[error("Platform error: {message}")]
    Platform { message: String },

    /// Failure reported by bot code
    #[error("Bot error: {message}")]
    Callback { message: String },
}

impl BotError {
    /// Create an I/O error from a standard I/O error
    pub fn from_io(source: std::io::Error, context: &str) -> Self {
        Self::Io {
            message: format!("{}: {}", context, source),
            source: Some(source),
        }
    }

    /// Create an out-of-range error
    pub fn out_of_range(index: usize, length: usize) -> Self {
        Self::OutOfRange { index, length }
    }

    /// Create an out-of-bounds error
    pub fn out_of_bounds(offset: usize, length: usize, capacity: usize) -> Self {
        Self::OutOfBounds {
            offset,
            length,
            capacity,
        }
    }

    /// Create a region-too-small error
    pub fn region_too_small(required: usize, actual: usize) -> Self {
        Self::RegionTooSmall { required, actual }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an insufficient space error
    pub fn insufficient_space(requested: usize, available: usize) -> Self {
        Self::InsufficientSpace {
            requested,
            available,
        }
    }

    /// Create a checksum error
    pub fn checksum(expected: u32, actual: u32) -> Self {
        Self::Checksum { expected, actual }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a platform error
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Create an error on behalf of bot code
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }

    /// Short name of the error kind, used in fault reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::OutOfRange { .. } => "out of range",
            Self::OutOfBounds { .. } => "out of bounds",
            Self::RegionTooSmall { .. } => "region too small",
            Self::InvalidParameter { .. } => "invalid parameter",
            Self::InsufficientSpace { .. } => "insufficient space",
            Self::Checksum { .. } => "checksum",
            Self::Serialization { .. } => "serialization",
            Self::Platform { .. } => "platform",
            Self::Callback { .. } => "bot error",
        }
    }
}

// Convert from common error types
impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io(err, "I/O operation failed")
    }
}

impl From<nix::Error> for BotError {
    fn from(err: nix::Error) -> Self {
        Self::from_io(std::io::Error::from(err), "System call failed")
    }
}

impl From<bincode::Error> for BotError {
    fn from(err: bincode::Error) -> Self {
        Self::serialization(format!("Bincode error: {}", err))
    }
}
