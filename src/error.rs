//! Error types for ramped_dsp.

use thiserror::Error;

use crate::nodes::ParameterAddress;

/// Error type for node lifecycle, parameter and descriptor operations.
///
/// Nothing in here is ever produced from inside a per-sample loop. Numeric
/// trouble during rendering is clamped, not reported.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown parameter address: {address}")]
    UnknownParameter { address: ParameterAddress },

    #[error("Node is not initialized")]
    NotInitialized,

    #[error("Parameter queue full, dropped change for address {address}")]
    QueueFull { address: ParameterAddress },

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[cfg(feature = "serde")]
    #[error("Preset error: {0}")]
    Preset(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
