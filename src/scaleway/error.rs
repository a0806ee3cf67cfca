//! Error types for the Scaleway volume client.

use thiserror::Error;

/// Errors raised by primitive Scaleway API calls.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScalewayApiError {
    /// Raised when the client configuration fails validation.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the HTTP request could not be completed.
    #[error("transport error during {operation}: {message}")]
    Transport {
        /// Operation being performed.
        operation: String,
        /// Message from the HTTP client.
        message: String,
    },
    /// Raised when the API answers with a non-success status.
    #[error("scaleway api returned status {status} for {operation}: {body}")]
    Api {
        /// Operation being performed.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the API.
        body: String,
    },
    /// Raised when a success response cannot be decoded.
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        /// Operation being performed.
        operation: String,
        /// Parser error message.
        message: String,
    },
    /// Raised when an attach targets a volume-map slot that is already
    /// populated on the server.
    #[error("volume slot {device} already occupied on server {server_id}")]
    DeviceSlotOccupied {
        /// Requested slot key.
        device: String,
        /// Server whose volume map was inspected.
        server_id: String,
    },
}
