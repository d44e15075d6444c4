//! Channel Error Types

use thiserror::Error;

/// Errors that can occur on the command/response channel
#[derive(Debug, Error)]
pub enum LinkError {
    /// Serial port could not be opened
    #[error("failed to open {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: serialport::Error,
    },

    /// I/O error while talking to the device
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device did not finish its response within the configured timeout
    #[error("timed out waiting for response to `{0}`")]
    Timeout(String),

    /// Device produced no response for the command
    #[error("no response for `{0}`")]
    NoResponse(String),
}
