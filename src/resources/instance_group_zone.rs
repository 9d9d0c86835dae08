//! Zone-scoped managed instance groups. Mirrors [`super::instance_group_region`] with zone
//! in place of region: one list call per zone the run is scoped to, unioned into a single
//! inventory keyed by instance group name.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct InstanceGroupZoneHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    zones: Vec<String>,
    inventory: Inventory,
}

impl InstanceGroupZoneHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String, zones: Vec<String>) -> Self {
        Self {
            client,
            project,
            zones,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for InstanceGroupZoneHandler {
    fn name(&self) -> &'static str {
        "compute_instance_group_zone"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let mut items = Vec::new();
            for zone in &self.zones {
                let found = self.client.list_instance_groups_zone(&self.project, zone)?;
                items.extend(
                    found
                        .into_iter()
                        .map(|i| (i.name, ItemLocality::Zonal(zone.clone()))),
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
        let zone = match locality {
            ItemLocality::Zonal(zone) => zone,
            other => unreachable!("zonal instance group has non-zonal locality: {other:?}"),
        };
        let operation = self
            .client
            .delete_instance_group_zone(&self.project, zone, identifier)?;
        Ok(DeleteOutcome::Pending(operation))
    }

    fn poll_operation(
        &self,
        operation: &Operation,
        locality: &ItemLocality,
    ) -> Result<OperationStatus, PlatformError> {
        let zone = match locality {
            ItemLocality::Zonal(zone) => zone,
            other => unreachable!("zonal instance group has non-zonal locality: {other:?}"),
        };
        self.client
            .get_zonal_operation(&self.project, zone, &operation.name)
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
    fn list_unions_across_all_configured_zones() {
        let mut mock = MockGcpClient::new();
        mock.expect_list_instance_groups_zone()
            .withf(|_, zone| zone == "us-central1-a")
            .returning(|_, _| Ok(vec![ComputeItem { name: "mig-a".to_string() }]));
        mock.expect_list_instance_groups_zone()
            .withf(|_, zone| zone == "us-central1-b")
            .returning(|_, _| Ok(vec![ComputeItem { name: "mig-b".to_string() }]));
        let handler = InstanceGroupZoneHandler::new(
            Arc::new(mock),
            "proj".to_string(),
            vec!["us-central1-a".to_string(), "us-central1-b".to_string()],
        );

        let identifiers = handler.list(true).unwrap();

        assert_eq!(identifiers, vec!["mig-a".to_string(), "mig-b".to_string()]);
    }
}
