//! Region-scoped managed instance groups. Mirrors [`super::instance_group_zone`] with
//! region in place of zone.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct InstanceGroupRegionHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    regions: Vec<String>,
    inventory: Inventory,
}

impl InstanceGroupRegionHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String, regions: Vec<String>) -> Self {
        Self {
            client,
            project,
            regions,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for InstanceGroupRegionHandler {
    fn name(&self) -> &'static str {
        "compute_instance_group_region"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let mut items = Vec::new();
            for region in &self.regions {
                let found = self
                    .client
                    .list_instance_groups_region(&self.project, region)?;
                items.extend(
                    found
                        .into_iter()
                        .map(|i| (i.name, ItemLocality::Regional(region.clone()))),
                );
            }
            self.inventory.replace(items);
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
        let region = match locality {
            ItemLocality::Regional(region) => region,
            other => unreachable!("regional instance group has non-regional locality: {other:?}"),
        };
        let operation = self
            .client
            .delete_instance_group_region(&self.project, region, identifier)?;
        Ok(DeleteOutcome::Pending(operation))
    }

    fn poll_operation(
        &self,
        operation: &Operation,
        locality: &ItemLocality,
    ) -> Result<OperationStatus, PlatformError> {
        let region = match locality {
            ItemLocality::Regional(region) => region,
            other => unreachable!("regional instance group has non-regional locality: {other:?}"),
        };
        self.client
            .get_regional_operation(&self.project, region, &operation.name)
    }

    fn forget(&self, identifier: &str) {
        self.inventory.remove(identifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockGcpClient;

    #[test]
    fn poll_uses_the_regional_operation_scope() {
        let mut mock = MockGcpClient::new();
        mock.expect_get_regional_operation()
            .withf(|_, region, name| region == "us-central1" && name == "op-1")
            .returning(|_, _, _| Ok(OperationStatus("DONE".to_string())));
        let handler = InstanceGroupRegionHandler::new(
            Arc::new(mock),
            "proj".to_string(),
            vec!["us-central1".to_string()],
        );

        let status = handler
            .poll_operation(
                &Operation { name: "op-1".to_string() },
                &ItemLocality::Regional("us-central1".to_string()),
            )
            .unwrap();

        assert!(status.is_done());
    }
}
