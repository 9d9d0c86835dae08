//! VPC networks: the root of the dependency graph. A network cannot be deleted while a
//! firewall, peering, or subnetwork still references it.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct NetworkHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    inventory: Inventory,
}

impl NetworkHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String) -> Self {
        Self {
            client,
            project,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for NetworkHandler {
    fn name(&self) -> &'static str {
        "compute_network"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["compute_firewall", "compute_network_peering", "compute_subnetwork"]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let items = self.client.list_networks(&self.project)?;
            self.inventory
                .replace(items.into_iter().map(|i| (i.name, ItemLocality::Global)));
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
        _locality: &ItemLocality,
    ) -> Result<DeleteOutcome, PlatformError> {
        let operation = self.client.delete_network(&self.project, identifier)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_on_firewalls_peerings_and_subnetworks() {
        let handler =
            NetworkHandler::new(Arc::new(crate::platform::MockGcpClient::new()), "p".to_string());
        assert_eq!(
            handler.dependencies(),
            &["compute_firewall", "compute_network_peering", "compute_subnetwork"]
        );
    }
}
