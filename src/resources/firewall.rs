//! Global firewall rules: a flat, project-scoped list. Deletion waits on both instance group
//! kinds (a rule can still be blocking a running instance); networks in turn cannot be
//! deleted while a firewall referencing them still exists.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct FirewallHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    inventory: Inventory,
}

impl FirewallHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String) -> Self {
        Self {
            client,
            project,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for FirewallHandler {
    fn name(&self) -> &'static str {
        "compute_firewall"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["compute_instance_group_zone", "compute_instance_group_region"]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let items = self.client.list_firewalls(&self.project)?;
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
        let operation = self.client.delete_firewall(&self.project, identifier)?;
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
    use crate::platform::MockGcpClient;
    use crate::platform::types::ComputeItem;

    #[test]
    fn list_populates_inventory_as_global() {
        let mut mock = MockGcpClient::new();
        mock.expect_list_firewalls().returning(|_| {
            Ok(vec![
                ComputeItem { name: "allow-ssh".to_string() },
                ComputeItem { name: "allow-internal".to_string() },
            ])
        });
        let handler = FirewallHandler::new(Arc::new(mock), "proj".to_string());

        let identifiers = handler.list(true).unwrap();

        assert_eq!(
            identifiers,
            vec!["allow-internal".to_string(), "allow-ssh".to_string()]
        );
        assert_eq!(
            handler.snapshot(),
            vec![
                ("allow-internal".to_string(), ItemLocality::Global),
                ("allow-ssh".to_string(), ItemLocality::Global),
            ]
        );
    }

    #[test]
    fn delete_then_poll_forgets_on_completion() {
        let mut mock = MockGcpClient::new();
        mock.expect_delete_firewall()
            .returning(|_, _| Ok(Operation { name: "op-1".to_string() }));
        mock.expect_get_global_operation()
            .returning(|_, _| Ok(OperationStatus("DONE".to_string())));
        let handler = FirewallHandler::new(Arc::new(mock), "proj".to_string());
        handler
            .inventory
            .replace([("allow-ssh".to_string(), ItemLocality::Global)]);

        let outcome = handler.delete_item("allow-ssh", &ItemLocality::Global).unwrap();
        let operation = match outcome {
            DeleteOutcome::Pending(op) => op,
            DeleteOutcome::Done => panic!("expected a pending operation"),
        };
        let status = handler
            .poll_operation(&operation, &ItemLocality::Global)
            .unwrap();
        assert!(status.is_done());

        handler.forget("allow-ssh");
        assert!(handler.is_empty());
    }
}
