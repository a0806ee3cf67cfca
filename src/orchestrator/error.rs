//! Error taxonomy for orchestrator operations.

use thiserror::Error;

use crate::api::VolumeStatus;

/// Errors raised by [`VolumeOrchestrator`](super::VolumeOrchestrator)
/// operations.
///
/// The taxonomy is closed so callers can branch on kind without parsing
/// messages: validation failures are never retried, timeouts may be re-polled
/// with a fresh deadline, and the two state variants signal non-recoverable
/// relationships.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StorageError {
    /// Malformed input rejected before any remote call was issued.
    #[error("invalid request: {reason}")]
    Validation {
        /// Description of the rejected input.
        reason: String,
    },
    /// A bounded wait elapsed without observing the target status.
    #[error("timed out waiting for volume {volume_id} to reach status {target}")]
    Timeout {
        /// Volume whose status was being awaited.
        volume_id: String,
        /// Status that was never observed.
        target: VolumeStatus,
    },
    /// No compute node in the managed fleet carries the queried address.
    #[error("no compute node found with address {address}")]
    NodeNotFound {
        /// Address that matched no node.
        address: String,
    },
    /// The volume is not in the attachment set of the resolved node.
    #[error("volume {volume_id} is not attached to the node at {address}")]
    VolumeNotAttached {
        /// Volume identifier that was absent.
        volume_id: String,
        /// Address of the node that was inspected.
        address: String,
    },
    /// Any other failure from the underlying provider, carrying enough
    /// context to diagnose without re-running.
    #[error("{operation} failed for {resource}: {message}")]
    Provisioning {
        /// Operation that failed (for example `create volume`).
        operation: String,
        /// Resource or request context (identifier, or size/zone for
        /// creation failures).
        resource: String,
        /// Message from the underlying cause.
        message: String,
    },
}

impl StorageError {
    /// Builds a [`StorageError::Provisioning`] from an underlying cause.
    pub(crate) fn provisioning(
        operation: &str,
        resource: impl Into<String>,
        cause: &dyn std::fmt::Display,
    ) -> Self {
        Self::Provisioning {
            operation: operation.to_owned(),
            resource: resource.into(),
            message: cause.to_string(),
        }
    }
}
