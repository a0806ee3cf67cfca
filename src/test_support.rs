//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::api::{ApiFuture, CloudVolumeApi, ComputeNode, NodeRef, Tag, Volume};

/// Error type produced by [`ScriptedCloud`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScriptedCloudError {
    /// A scripted failure queued by a test.
    #[error("scripted failure: {0}")]
    Scripted(String),
    /// The call had no queued response and no safe default.
    #[error("no scripted response for {operation}")]
    Unscripted {
        /// Operation that was invoked.
        operation: String,
    },
    /// A metadata fetch referenced a node the script does not know.
    #[error("no scripted node with id {node_id}")]
    UnknownNode {
        /// Node identifier that was requested.
        node_id: String,
    },
}

/// Records a single call made through [`ScriptedCloud`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CloudCall {
    /// `create_volume_in_zone` with the requested zone and size.
    Create {
        /// Requested availability zone.
        zone: String,
        /// Requested size in gigabytes.
        size_gb: u32,
    },
    /// `describe_volumes` with the requested ids (`None` for describe-all).
    Describe {
        /// Identifiers passed by the caller.
        ids: Option<Vec<String>>,
    },
    /// `attach_volume`.
    Attach {
        /// Volume being attached.
        volume_id: String,
        /// Target instance.
        instance_id: String,
        /// Attachment device or slot.
        device: String,
    },
    /// `detach_volume`.
    Detach {
        /// Volume being detached.
        volume_id: String,
        /// Whether force semantics were requested.
        force: bool,
        /// Source instance.
        instance_id: String,
    },
    /// `delete_volume`.
    Delete {
        /// Volume being deleted.
        volume_id: String,
    },
    /// `list_nodes`.
    ListNodes,
    /// `node_metadata`.
    NodeMetadata {
        /// Node identifier that was fetched.
        node_id: String,
    },
    /// `apply_tags`.
    ApplyTags {
        /// Resources the tags were applied to.
        resource_ids: Vec<String>,
        /// Tags that were applied.
        tags: Vec<Tag>,
    },
    /// `query_tags`.
    QueryTags {
        /// Resource whose tags were queried.
        resource_id: String,
    },
}

#[derive(Debug, Default)]
struct ScriptState {
    create: VecDeque<Result<Volume, ScriptedCloudError>>,
    describe: VecDeque<Result<Vec<Volume>, ScriptedCloudError>>,
    attach: VecDeque<Result<(), ScriptedCloudError>>,
    detach: VecDeque<Result<(), ScriptedCloudError>>,
    delete: VecDeque<Result<(), ScriptedCloudError>>,
    apply_tags: VecDeque<Result<(), ScriptedCloudError>>,
    query_tags: VecDeque<Result<Vec<Tag>, ScriptedCloudError>>,
    nodes: Vec<ComputeNode>,
    calls: Vec<CloudCall>,
}

/// Scripted cloud client that returns pre-seeded responses in FIFO order
/// and records every call for assertions.
///
/// Unscripted calls fall back to benign defaults where one exists (empty
/// tag list, successful attach/detach/delete/tag application) and fail with
/// [`ScriptedCloudError::Unscripted`] otherwise, so a test that forgets to
/// seed a create or describe response fails loudly instead of hanging a
/// poll loop.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCloud {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedCloud {
    /// Creates a double with no queued responses and no nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the fleet visible to `list_nodes`/`node_metadata`.
    pub fn set_nodes(&self, nodes: Vec<ComputeNode>) {
        self.lock().nodes = nodes;
    }

    /// Queues a `create_volume_in_zone` response.
    pub fn push_create(&self, response: Result<Volume, ScriptedCloudError>) {
        self.lock().create.push_back(response);
    }

    /// Queues a `describe_volumes` response.
    pub fn push_describe(&self, response: Result<Vec<Volume>, ScriptedCloudError>) {
        self.lock().describe.push_back(response);
    }

    /// Queues an `attach_volume` response.
    pub fn push_attach(&self, response: Result<(), ScriptedCloudError>) {
        self.lock().attach.push_back(response);
    }

    /// Queues a `detach_volume` response.
    pub fn push_detach(&self, response: Result<(), ScriptedCloudError>) {
        self.lock().detach.push_back(response);
    }

    /// Queues a `delete_volume` response.
    pub fn push_delete(&self, response: Result<(), ScriptedCloudError>) {
        self.lock().delete.push_back(response);
    }

    /// Queues an `apply_tags` response.
    pub fn push_apply_tags(&self, response: Result<(), ScriptedCloudError>) {
        self.lock().apply_tags.push_back(response);
    }

    /// Queues a `query_tags` response.
    pub fn push_query_tags(&self, response: Result<Vec<Tag>, ScriptedCloudError>) {
        self.lock().query_tags.push_back(response);
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<CloudCall> {
        self.lock().calls.clone()
    }

    /// Counts the recorded `delete_volume` calls for one volume.
    #[must_use]
    pub fn delete_count(&self, volume_id: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, CloudCall::Delete { volume_id: id } if id == volume_id))
            .count()
    }

    fn record(&self, call: CloudCall) {
        self.lock().calls.push(call);
    }

    fn unscripted(operation: &str) -> ScriptedCloudError {
        ScriptedCloudError::Unscripted {
            operation: operation.to_owned(),
        }
    }
}

impl CloudVolumeApi for ScriptedCloud {
    type Error = ScriptedCloudError;

    fn create_volume_in_zone<'a>(
        &'a self,
        zone: &'a str,
        size_gb: u32,
    ) -> ApiFuture<'a, Volume, Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::Create {
                zone: zone.to_owned(),
                size_gb,
            });
            self.lock()
                .create
                .pop_front()
                .unwrap_or_else(|| Err(Self::unscripted("create_volume_in_zone")))
        })
    }

    fn describe_volumes<'a>(
        &'a self,
        ids: Option<&'a [String]>,
    ) -> ApiFuture<'a, Vec<Volume>, Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::Describe {
                ids: ids.map(<[String]>::to_vec),
            });
            self.lock()
                .describe
                .pop_front()
                .unwrap_or_else(|| Err(Self::unscripted("describe_volumes")))
        })
    }

    fn attach_volume<'a>(
        &'a self,
        volume_id: &'a str,
        instance_id: &'a str,
        device: &'a str,
    ) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::Attach {
                volume_id: volume_id.to_owned(),
                instance_id: instance_id.to_owned(),
                device: device.to_owned(),
            });
            self.lock().attach.pop_front().unwrap_or(Ok(()))
        })
    }

    fn detach_volume<'a>(
        &'a self,
        volume_id: &'a str,
        force: bool,
        instance_id: &'a str,
    ) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::Detach {
                volume_id: volume_id.to_owned(),
                force,
                instance_id: instance_id.to_owned(),
            });
            self.lock().detach.pop_front().unwrap_or(Ok(()))
        })
    }

    fn delete_volume<'a>(&'a self, volume_id: &'a str) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::Delete {
                volume_id: volume_id.to_owned(),
            });
            self.lock().delete.pop_front().unwrap_or(Ok(()))
        })
    }

    fn list_nodes(&self) -> ApiFuture<'_, Vec<NodeRef>, Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::ListNodes);
            Ok(self
                .lock()
                .nodes
                .iter()
                .map(|node| NodeRef {
                    id: node.provider_id.clone(),
                })
                .collect())
        })
    }

    fn node_metadata<'a>(&'a self, node: &'a NodeRef) -> ApiFuture<'a, ComputeNode, Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::NodeMetadata {
                node_id: node.id.clone(),
            });
            self.lock()
                .nodes
                .iter()
                .find(|candidate| candidate.provider_id == node.id)
                .cloned()
                .ok_or_else(|| ScriptedCloudError::UnknownNode {
                    node_id: node.id.clone(),
                })
        })
    }

    fn apply_tags<'a>(
        &'a self,
        resource_ids: &'a [String],
        tags: &'a [Tag],
    ) -> ApiFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::ApplyTags {
                resource_ids: resource_ids.to_vec(),
                tags: tags.to_vec(),
            });
            self.lock().apply_tags.pop_front().unwrap_or(Ok(()))
        })
    }

    fn query_tags<'a>(&'a self, resource_id: &'a str) -> ApiFuture<'a, Vec<Tag>, Self::Error> {
        Box::pin(async move {
            self.record(CloudCall::QueryTags {
                resource_id: resource_id.to_owned(),
            });
            self.lock().query_tags.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        })
    }
}

/// Builds a volume record for scripting describe responses.
#[must_use]
pub fn volume(id: &str, size_gb: u32, zone: &str, status: crate::api::VolumeStatus) -> Volume {
    Volume {
        id: id.to_owned(),
        size_gb,
        zone: zone.to_owned(),
        status,
    }
}

/// Builds a compute node with the given attached volume ids; `None` entries
/// model ephemeral devices without an identifier.
#[must_use]
pub fn node(provider_id: &str, address: &str, device_ids: &[Option<&str>]) -> ComputeNode {
    ComputeNode {
        provider_id: provider_id.to_owned(),
        private_addresses: vec![address.to_owned()],
        public_addresses: Vec::new(),
        devices: device_ids
            .iter()
            .map(|id| crate::api::HardwareDevice {
                volume_id: id.map(ToOwned::to_owned),
            })
            .collect(),
    }
}
