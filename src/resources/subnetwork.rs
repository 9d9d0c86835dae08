//! Regional subnetworks: one list call per configured region, unioned into a single
//! inventory. Instance groups reference subnetworks, so this kind waits for both instance
//! group kinds to drain first.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct SubnetworkHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    regions: Vec<String>,
    inventory: Inventory,
}

impl SubnetworkHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String, regions: Vec<String>) -> Self {
        Self {
            client,
            project,
            regions,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for SubnetworkHandler {
    fn name(&self) -> &'static str {
        "compute_subnetwork"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["compute_instance_group_zone", "compute_instance_group_region"]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let mut items = Vec::new();
            for region in &self.regions {
                let found = self.client.list_subnetworks(&self.project, region)?;
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
            other => unreachable!("subnetwork has non-regional locality: {other:?}"),
        };
        let operation = self
            .client
            .delete_subnetwork(&self.project, region, identifier)?;
        Ok(DeleteOutcome::Pending(operation))
    }

    fn poll_operation(
        &self,
        operation: &Operation,
        locality: &ItemLocality,
    ) -> Result<OperationStatus, PlatformError> {
        let region = match locality {
            ItemLocality::Regional(region) => region,
            other => unreachable!("subnetwork has non-regional locality: {other:?}"),
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
    use crate::platform::types::ComputeItem;

    #[test]
    fn list_unions_across_all_configured_regions() {
        let mut mock = MockGcpClient::new();
        mock.expect_list_subnetworks()
            .withf(|_, region| region == "us-central1")
            .returning(|_, _| Ok(vec![ComputeItem { name: "subnet-a".to_string() }]));
        mock.expect_list_subnetworks()
            .withf(|_, region| region == "europe-west1")
            .returning(|_, _| Ok(vec![ComputeItem { name: "subnet-b".to_string() }]));
        let handler = SubnetworkHandler::new(
            Arc::new(mock),
            "proj".to_string(),
            vec!["us-central1".to_string(), "europe-west1".to_string()],
        );

        let identifiers = handler.list(true).unwrap();

        assert_eq!(identifiers, vec!["subnet-a".to_string(), "subnet-b".to_string()]);
    }
}
