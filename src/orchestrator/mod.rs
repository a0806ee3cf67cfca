//! Volume lifecycle orchestrator.
//!
//! Turns the primitive, eventually-consistent calls of a
//! [`CloudVolumeApi`] into synchronous, deadline-bounded operations:
//! every mutating call converts its caller-supplied timeout into an
//! absolute deadline at entry, polls for state convergence, and cleans up
//! partially provisioned resources before surfacing a failure.

mod attach;
mod create;
mod delete;
mod detach;
mod error;
mod list;
mod node;
mod wait;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::time::Duration;

use crate::api::CloudVolumeApi;
use crate::config::VolumeTemplate;

pub use error::StorageError;
pub use node::attached_volume_ids;

/// Smallest volume size accepted at creation, in gigabytes.
pub const MIN_VOLUME_SIZE: u32 = 1;
/// Largest volume size accepted at creation, in gigabytes.
pub const MAX_VOLUME_SIZE: u32 = 1024;
/// Tag key under which a volume's human-readable name is stored.
pub const NAME_TAG_KEY: &str = "Name";

const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Caller-facing record describing one volume, enriched with its resolved
/// name tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeDetails {
    /// Provider-assigned volume identifier.
    pub id: String,
    /// Capacity in whole gigabytes.
    pub size_gb: u32,
    /// Availability zone the volume is bound to.
    pub location: String,
    /// Name resolved from the `Name` tag; empty when the volume is untagged.
    pub name: String,
}

/// Sequences primitive cloud calls into bounded-time lifecycle operations.
///
/// The orchestrator holds no mutable state: each operation is an independent
/// sequential call chain whose only suspension points are the poll-interval
/// sleeps and the provider calls themselves. Concurrent operations on the
/// same volume are not serialised here; the provider's own concurrency
/// semantics apply.
pub struct VolumeOrchestrator<C> {
    cloud: C,
    templates: HashMap<String, VolumeTemplate>,
    poll_interval: Duration,
}

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Creates an orchestrator over the given provider client and volume
    /// template definitions.
    pub const fn new(cloud: C, templates: HashMap<String, VolumeTemplate>) -> Self {
        Self {
            cloud,
            templates,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Overrides the status poll interval. Tests use this to keep wait loops
    /// fast; production callers keep the default.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub(crate) fn template(&self, name: &str) -> Result<&VolumeTemplate, StorageError> {
        self.templates
            .get(name)
            .ok_or_else(|| StorageError::Validation {
                reason: format!("unknown volume template '{name}'"),
            })
    }

    pub(crate) const fn cloud(&self) -> &C {
        &self.cloud
    }
}
