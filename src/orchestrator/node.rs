//! Node resolution by network address.

use std::collections::HashSet;

use crate::api::{CloudVolumeApi, ComputeNode};

use super::{StorageError, VolumeOrchestrator};

/// Returns the identifiers of the volumes attached to the node.
///
/// Devices without an identifier are ephemeral or instance-store storage
/// and are excluded.
#[must_use]
pub fn attached_volume_ids(node: &ComputeNode) -> HashSet<String> {
    node.devices
        .iter()
        .filter_map(|device| device.volume_id.clone())
        .filter(|id| !id.is_empty())
        .collect()
}

impl<C: CloudVolumeApi> VolumeOrchestrator<C> {
    /// Resolves the compute node carrying `address` in its private or public
    /// address set.
    ///
    /// Enumerates the whole fleet with one metadata fetch per node. There is
    /// deliberately no caching across calls: attachment reads must always be
    /// fresh, and the O(n) scan cost is accepted for that guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] when no node matches, which
    /// callers treat as a non-recoverable state error, and
    /// [`StorageError::Provisioning`] when enumeration or a metadata fetch
    /// fails.
    pub async fn find_node_by_address(&self, address: &str) -> Result<ComputeNode, StorageError> {
        let nodes = self
            .cloud()
            .list_nodes()
            .await
            .map_err(|err| StorageError::provisioning("list compute nodes", address, &err))?;

        for node in &nodes {
            let metadata = self
                .cloud()
                .node_metadata(node)
                .await
                .map_err(|err| StorageError::provisioning("fetch node metadata", &node.id, &err))?;
            if metadata.private_addresses.iter().any(|a| a == address)
                || metadata.public_addresses.iter().any(|a| a == address)
            {
                return Ok(metadata);
            }
        }

        Err(StorageError::NodeNotFound {
            address: address.to_owned(),
        })
    }

    /// Returns the volume identifiers attached to the machine at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NodeNotFound`] when no node carries the
    /// address and [`StorageError::Provisioning`] on enumeration failures.
    pub async fn machine_volume_ids(&self, address: &str) -> Result<HashSet<String>, StorageError> {
        let node = self.find_node_by_address(address).await?;
        Ok(attached_volume_ids(&node))
    }
}
