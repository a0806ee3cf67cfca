//! Cloud volume API seam consumed by the orchestrator.
//!
//! The trait models the primitive, non-blocking provider surface: calls
//! return the current state immediately and convergence to a target state is
//! eventual. All orchestration (deadlines, polling, compensation) lives above
//! this boundary.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Future returned by cloud API operations.
pub type ApiFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Lifecycle status classes of a block-storage volume.
///
/// Providers use varying vocabularies; unrecognised states are carried
/// through as [`VolumeStatus::Unknown`] rather than dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VolumeStatus {
    /// The volume is being provisioned and is not yet usable.
    Creating,
    /// The volume is provisioned and free for attachment.
    Available,
    /// The volume is attached to a compute node.
    InUse,
    /// The volume is being detached from a compute node.
    Detaching,
    /// The volume is being removed.
    Deleting,
    /// The volume has been removed.
    Deleted,
    /// The provider reports the volume as faulted.
    Error,
    /// A provider-specific state outside the common vocabulary.
    Unknown(String),
}

impl VolumeStatus {
    /// Maps a provider state string onto the common vocabulary.
    #[must_use]
    pub fn from_provider(state: &str) -> Self {
        match state {
            "creating" => Self::Creating,
            "available" => Self::Available,
            "in_use" => Self::InUse,
            "detaching" => Self::Detaching,
            "deleting" => Self::Deleting,
            "deleted" => Self::Deleted,
            "error" => Self::Error,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for VolumeStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => formatter.write_str("creating"),
            Self::Available => formatter.write_str("available"),
            Self::InUse => formatter.write_str("in_use"),
            Self::Detaching => formatter.write_str("detaching"),
            Self::Deleting => formatter.write_str("deleting"),
            Self::Deleted => formatter.write_str("deleted"),
            Self::Error => formatter.write_str("error"),
            Self::Unknown(state) => formatter.write_str(state),
        }
    }
}

/// A block-storage volume as reported by the provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Volume {
    /// Opaque provider-assigned identifier, immutable once created.
    pub id: String,
    /// Capacity in whole gigabytes.
    pub size_gb: u32,
    /// Availability zone the volume is bound to for its lifetime.
    pub zone: String,
    /// Current lifecycle status.
    pub status: VolumeStatus,
}

/// Lightweight reference to a compute node, resolved to full metadata via
/// [`CloudVolumeApi::node_metadata`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeRef {
    /// Opaque provider identifier of the node.
    pub id: String,
}

/// A storage device reported in a node's hardware description.
///
/// Ephemeral or instance-store devices carry no addressable identifier and
/// are represented with `volume_id: None`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HardwareDevice {
    /// Identifier of the backing volume, when one exists.
    pub volume_id: Option<String>,
}

/// Full metadata for a running compute node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComputeNode {
    /// Opaque provider identifier used in attach/detach calls.
    pub provider_id: String,
    /// Private network addresses assigned to the node.
    pub private_addresses: Vec<String>,
    /// Public network addresses assigned to the node.
    pub public_addresses: Vec<String>,
    /// Storage devices in the node's hardware description.
    pub devices: Vec<HardwareDevice>,
}

/// A key/value tag applied to a provider resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// Primitive volume and node operations exposed by a cloud provider.
///
/// Implementations are scoped to a single provider/zone context. Mutating
/// calls return as soon as the provider accepts them; the reported status
/// converges eventually and callers poll for it.
pub trait CloudVolumeApi: Send + Sync {
    /// Provider-specific error type returned by primitive calls.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a volume of `size_gb` gigabytes in `zone` and returns it with
    /// its provisional status.
    fn create_volume_in_zone<'a>(
        &'a self,
        zone: &'a str,
        size_gb: u32,
    ) -> ApiFuture<'a, Volume, Self::Error>;

    /// Describes the volumes with the given identifiers, or every volume in
    /// the active zone when `ids` is `None`.
    fn describe_volumes<'a>(
        &'a self,
        ids: Option<&'a [String]>,
    ) -> ApiFuture<'a, Vec<Volume>, Self::Error>;

    /// Attaches a volume to the node with the given provider identifier.
    ///
    /// `device` names the attachment point; providers that address
    /// attachments by slot rather than device path interpret it as the slot
    /// key.
    fn attach_volume<'a>(
        &'a self,
        volume_id: &'a str,
        instance_id: &'a str,
        device: &'a str,
    ) -> ApiFuture<'a, (), Self::Error>;

    /// Detaches a volume from the node with the given provider identifier.
    /// `force` requests detachment even when the guest has not released the
    /// device; providers without the distinction may ignore it.
    fn detach_volume<'a>(
        &'a self,
        volume_id: &'a str,
        force: bool,
        instance_id: &'a str,
    ) -> ApiFuture<'a, (), Self::Error>;

    /// Deletes a volume.
    fn delete_volume<'a>(&'a self, volume_id: &'a str) -> ApiFuture<'a, (), Self::Error>;

    /// Enumerates the compute nodes visible in the active account scope.
    fn list_nodes(&self) -> ApiFuture<'_, Vec<NodeRef>, Self::Error>;

    /// Fetches full metadata for one node.
    fn node_metadata<'a>(&'a self, node: &'a NodeRef) -> ApiFuture<'a, ComputeNode, Self::Error>;

    /// Applies the given tags to each listed resource, merging with any tags
    /// already present.
    fn apply_tags<'a>(
        &'a self,
        resource_ids: &'a [String],
        tags: &'a [Tag],
    ) -> ApiFuture<'a, (), Self::Error>;

    /// Returns the tags applied to one resource.
    fn query_tags<'a>(&'a self, resource_id: &'a str) -> ApiFuture<'a, Vec<Tag>, Self::Error>;
}
