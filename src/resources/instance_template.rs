//! Global instance templates. Templates can only be deleted once no managed instance group
//! still references them, so this kind depends on both instance group kinds.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct InstanceTemplateHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    inventory: Inventory,
}

impl InstanceTemplateHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String) -> Self {
        Self {
            client,
            project,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for InstanceTemplateHandler {
    fn name(&self) -> &'static str {
        "compute_instance_template"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["compute_instance_group_zone", "compute_instance_group_region"]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let items = self.client.list_instance_templates(&self.project)?;
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
        let operation = self
            .client
            .delete_instance_template(&self.project, identifier)?;
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
    fn depends_on_both_instance_group_kinds() {
        let handler =
            InstanceTemplateHandler::new(Arc::new(crate::platform::MockGcpClient::new()), "p".to_string());
        assert_eq!(
            handler.dependencies(),
            &["compute_instance_group_zone", "compute_instance_group_region"]
        );
    }
}
