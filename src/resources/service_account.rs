//! IAM service accounts: listed project-wide, filtered down to accounts whose email contains
//! the project id (accounts belonging to other projects can show up in a shared listing),
//! displayed by `display_name` but deleted by `email`. Deletion has no long-running
//! operation.

use std::sync::Arc;

use crate::inventory::{Inventory, ItemLocality};
use crate::platform::types::{Operation, OperationStatus};
use crate::platform::{GcpClient, PlatformError};
use crate::registry::{DeleteOutcome, ResourceHandler};

pub struct ServiceAccountHandler {
    client: Arc<dyn GcpClient>,
    project: String,
    inventory: Inventory,
}

impl ServiceAccountHandler {
    pub fn new(client: Arc<dyn GcpClient>, project: String) -> Self {
        Self {
            client,
            project,
            inventory: Inventory::new(),
        }
    }
}

impl ResourceHandler for ServiceAccountHandler {
    fn name(&self) -> &'static str {
        "iam_service_account"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError> {
        if refresh {
            let entries = self.client.list_service_accounts(&self.project)?;
            self.inventory.replace(
                entries
                    .into_iter()
                    .filter(|entry| entry.email.contains(&self.project))
                    .map(|entry| (entry.display_name, ItemLocality::ServiceAccount { email: entry.email })),
            );
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
        _identifier: &str,
        locality: &ItemLocality,
    ) -> Result<DeleteOutcome, PlatformError> {
        let email = match locality {
            ItemLocality::ServiceAccount { email } => email,
            other => unreachable!("service account has non-service-account locality: {other:?}"),
        };
        self.client.delete_service_account(&self.project, email)?;
        Ok(DeleteOutcome::Done)
    }

    fn poll_operation(
        &self,
        _operation: &Operation,
        _locality: &ItemLocality,
    ) -> Result<OperationStatus, PlatformError> {
        unreachable!("service account deletion never returns a pending operation")
    }

    fn forget(&self, identifier: &str) {
        self.inventory.remove(identifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockGcpClient;
    use crate::platform::types::ServiceAccountEntry;

    #[test]
    fn list_filters_to_accounts_whose_email_contains_the_project_id_and_keys_by_display_name() {
        let mut mock = MockGcpClient::new();
        mock.expect_list_service_accounts().returning(|_| {
            Ok(vec![
                ServiceAccountEntry {
                    display_name: "mine".to_string(),
                    email: "sa@my-project.iam.gserviceaccount.com".to_string(),
                },
                ServiceAccountEntry {
                    display_name: "someone-elses".to_string(),
                    email: "sa@other-project.iam.gserviceaccount.com".to_string(),
                },
            ])
        });
        let handler = ServiceAccountHandler::new(Arc::new(mock), "my-project".to_string());

        let identifiers = handler.list(true).unwrap();

        assert_eq!(identifiers, vec!["mine".to_string()]);
        assert_eq!(
            handler.snapshot(),
            vec![(
                "mine".to_string(),
                ItemLocality::ServiceAccount {
                    email: "sa@my-project.iam.gserviceaccount.com".to_string()
                }
            )]
        );
    }

    #[test]
    fn delete_uses_the_email_from_locality_not_the_display_name_identifier() {
        let mut mock = MockGcpClient::new();
        mock.expect_delete_service_account()
            .withf(|_, email| email == "sa@my-project.iam.gserviceaccount.com")
            .returning(|_, _| Ok(()));
        let handler = ServiceAccountHandler::new(Arc::new(mock), "my-project".to_string());

        let locality = ItemLocality::ServiceAccount {
            email: "sa@my-project.iam.gserviceaccount.com".to_string(),
        };
        let outcome = handler.delete_item("mine", &locality).unwrap();

        assert!(matches!(outcome, DeleteOutcome::Done));
    }
}
