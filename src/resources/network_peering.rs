//! VPC network peerings. Peerings have no list endpoint of their own; they are discovered by
//! walking every network's `peerings` field, and removed via a `removePeering` call against
//! the parent network rather than a delete of the peering itself. Like firewalls, deletion
//! waits on both instance group kinds.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct NetworkPeeringHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    inventory: Inventory,
}

impl NetworkPeeringHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String) -> Self {
        Self {
            client,
            project,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for NetworkPeeringHandler {
    fn name(&self) -> &'static str {
        "compute_network_peering"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["compute_instance_group_zone", "compute_instance_group_region"]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let entries = self.client.list_network_peerings(&self.project)?;
            self.inventory.replace(entries.into_iter().map(|entry| {
                (
                    entry.peering_name,
                    ItemLocality::Peering {
                        parent_network: entry.network_name,
                    },
                )
            }));
        }
        Ok(self.inventory.sorted_identifiers())
    }

    fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    fn snapshot(&self) -> Vec<(String, ItemLocality)> {
        self.inventory.snapshot()
    }

    fn delete_item(
        &self,
        identifier: &str,
        locality: &ItemLocality,
    ) -> Result<DeleteOutcome, PlatformError> {
        let parent_network = match locality {
            ItemLocality::Peering { parent_network } => parent_network,
            other => unreachable!("network peering has non-peering locality: {other:?}"),
        };
        let operation =
            self.client
                .remove_network_peering(&self.project, parent_network, identifier)?;
        Ok(DeleteOutcome::Pending(operation))
    }

    fn poll_operation(
        &self,
        operation: &Operation,
        _locality: &ItemLocality,
    ) -> Result<OperationStatus, PlatformError> {
        self.client
            .get_global_operation(&self.project, &operation.name)
    }

    fn forget(&self, identifier: &str) {
        self.inventory.remove(identifier);
    }
}
