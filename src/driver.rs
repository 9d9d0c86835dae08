//! C4: the project driver. Computes which kinds are ready to run on each pass (every
//! declared dependency already empty), dispatches the C3 remover for the ready set in
//! parallel, and repeats until every kind is empty, the graph stalls, or the pass budget is
//! exhausted.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::registry::Registry;
use crate::remover::{remove_kind, RemoverError};

/// A belt-and-braces guard beyond stall detection: no real project should need this many
/// passes to drain, so hitting it points at a bug in the dependency graph rather than a slow
/// deletion.
const MAX_PASSES: usize = 64;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("removal of {kind} failed: {source}")]
    Remover {
        kind: &'static str,
        #[source]
        source: RemoverError,
    },

    #[error(
        "no progress could be made: {remaining:?} still have non-empty inventory but none are ready"
    )]
    Stall { remaining: Vec<&'static str> },

    #[error("exceeded {MAX_PASSES} passes without every kind reaching empty")]
    MaxPassesExceeded,
}

/// Runs every registered kind to completion, honoring the dependency graph.
pub async fn run(registry: &Registry, config: Arc<Config>) -> Result<(), DriverError> {
    for handler in registry.iter() {
        handler
            .list(true)
            .map_err(|source| DriverError::Remover {
                kind: handler.name(),
                source: RemoverError::Platform {
                    kind: handler.name(),
                    project: config.project.clone(),
                    identifier: "<initial listing>".to_string(),
                    source,
                },
            })?;
    }

    for pass in 0..MAX_PASSES {
        let empty: HashSet<&'static str> = registry
            .iter()
            .filter(|h| h.is_empty())
            .map(|h| h.name())
            .collect();

        if empty.len() == registry.len() {
            info!("all resource kinds drained");
            return Ok(());
        }

        let ready: Vec<_> = registry
            .iter()
            .filter(|h| !h.is_empty() && h.dependencies().iter().all(|d| empty.contains(d)))
            .cloned()
            .collect();

        if ready.is_empty() {
            let remaining: Vec<&'static str> = registry
                .iter()
                .filter(|h| !h.is_empty())
                .map(|h| h.name())
                .collect();
            return Err(DriverError::Stall { remaining });
        }

        info!(pass, kinds = ?ready.iter().map(|h| h.name()).collect::<Vec<_>>(), "starting pass");

        let mut tasks = Vec::with_capacity(ready.len());
        for handler in &ready {
            let handler = handler.clone();
            let config = config.clone();
            tasks.push(tokio::spawn(async move {
                let name = handler.name();
                let result = remove_kind(handler.clone(), config).await;
                (name, handler, result)
            }));
        }

        let mut first_error = None;
        for task in tasks {
            let (name, handler, result) = task.await.expect("driver worker task panicked");
            if let Err(source) = result {
                warn!(kind = name, %source, "pass failed for kind");
                if first_error.is_none() {
                    first_error = Some(DriverError::Remover { kind: name, source });
                }
                continue;
            }
            if let Err(source) = handler.list(true) {
                if first_error.is_none() {
                    first_error = Some(DriverError::Remover {
                        kind: name,
                        source: RemoverError::Platform {
                            kind: name,
                            project: config.project.clone(),
                            identifier: "<re-listing>".to_string(),
                            source,
                        },
                    });
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
    }

    Err(DriverError::MaxPassesExceeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::inventory::ItemLocality;
    use crate::platform::types::{Operation, OperationStatus};
    use crate::platform::PlatformError;
    use crate::registry::{DeleteOutcome, RegistryBuilder, ResourceHandler};
    use std::sync::Mutex;

    /// A handler whose inventory actually shrinks when the remover forgets an item, so
    /// dependency-ordering and stall behaviour can be observed across passes.
    struct DrainableHandler {
        name: &'static str,
        dependencies: &'static [&'static str],
        items: Mutex<Vec<(String, ItemLocality)>>,
    }

    impl DrainableHandler {
        fn new(name: &'static str, dependencies: &'static [&'static str], items: &[&str]) -> Self {
            Self {
                name,
                dependencies,
                items: Mutex::new(
                    items
                        .iter()
                        .map(|i| (i.to_string(), ItemLocality::Global))
                        .collect(),
                ),
            }
        }
    }

    impl ResourceHandler for DrainableHandler {
        fn name(&self) -> &'static str {
            self.name
        }
        fn dependencies(&self) -> &'static [&'static str] {
            self.dependencies
        }
        fn list(&self, _refresh: bool) -> Result<Vec<String>, PlatformError> {
            Ok(self.items.lock().unwrap().iter().map(|(i, _)| i.clone()).collect())
        }
        fn is_empty(&self) -> bool {
            self.items.lock().unwrap().is_empty()
        }
        fn snapshot(&self) -> Vec<(String, ItemLocality)> {
            self.items.lock().unwrap().clone()
        }
        fn delete_item(
            &self,
            _identifier: &str,
            _locality: &ItemLocality,
        ) -> Result<DeleteOutcome, PlatformError> {
            Ok(DeleteOutcome::Done)
        }
        fn poll_operation(
            &self,
            _operation: &Operation,
            _locality: &ItemLocality,
        ) -> Result<OperationStatus, PlatformError> {
            Ok(OperationStatus("DONE".to_string()))
        }
        fn forget(&self, identifier: &str) {
            self.items.lock().unwrap().retain(|(i, _)| i != identifier);
        }
    }

    fn config() -> Arc<Config> {
        Arc::new(crate::config::tests::test_config())
    }

    #[tokio::test]
    async fn dependency_kind_drains_before_its_dependent() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Arc::new(DrainableHandler::new(
                "compute_instance_group_zone",
                &[],
                &["ig"],
            )))
            .unwrap();
        builder
            .register(Arc::new(DrainableHandler::new(
                "compute_firewall",
                &["compute_instance_group_zone"],
                &["fw"],
            )))
            .unwrap();
        let config = config();
        let registry = builder.build(&config).unwrap();

        let result = run(&registry, config).await;

        assert!(result.is_ok());
        assert!(registry.get("compute_instance_group_zone").unwrap().is_empty());
        assert!(registry.get("compute_firewall").unwrap().is_empty());
    }

    #[tokio::test]
    async fn mutually_dependent_kinds_with_stuck_items_stall() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Arc::new(DrainableHandler::new("kind_a", &["kind_b"], &["a-1"])))
            .unwrap();
        builder
            .register(Arc::new(DrainableHandler::new("kind_b", &["kind_a"], &["b-1"])))
            .unwrap();
        let config = config();
        let registry = builder.build(&config).unwrap();

        let result = run(&registry, config).await;

        assert_matches!(result, Err(DriverError::Stall { .. }));
    }

    #[tokio::test]
    async fn already_empty_registry_is_an_immediate_success() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Arc::new(DrainableHandler::new("compute_firewall", &[], &[])))
            .unwrap();
        let config = config();
        let registry = builder.build(&config).unwrap();

        let result = run(&registry, config).await;

        assert!(result.is_ok());
    }
}
