//! Deadline-bounded lifecycle orchestration for detachable block-storage
//! volumes.
//!
//! The crate exposes a cloud volume API seam ([`CloudVolumeApi`]), a
//! Scaleway implementation of it, and the [`VolumeOrchestrator`] that turns
//! the provider's eventually-consistent primitives into synchronous,
//! bounded-time operations (create → wait for available → tag, attach,
//! detach, delete) with compensating cleanup on partial failure.

pub mod api;
pub mod config;
pub mod orchestrator;
pub mod scaleway;
pub mod test_support;

pub use api::{
    ApiFuture, CloudVolumeApi, ComputeNode, HardwareDevice, NodeRef, Tag, Volume, VolumeStatus,
};
pub use config::{ConfigError, ScalewayConfig, StorageConfig, VolumeTemplate};
pub use orchestrator::{
    MAX_VOLUME_SIZE, MIN_VOLUME_SIZE, NAME_TAG_KEY, StorageError, VolumeDetails,
    VolumeOrchestrator, attached_volume_ids,
};
pub use scaleway::{ScalewayApiError, ScalewayVolumeApi};
