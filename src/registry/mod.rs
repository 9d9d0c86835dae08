//! C1/C2: the resource type handler contract and the process-wide registry of handlers.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::inventory::ItemLocality;
use crate::platform::PlatformError;

/// Outcome of issuing a delete call for one item. Most Compute Engine calls return a
/// long-running operation that must be polled; IAM service account deletion completes
/// synchronously.
pub enum DeleteOutcome {
    Pending(crate::platform::types::Operation),
    Done,
}

/// The fixed capability set every resource kind implements: name / dependencies / list /
/// delete-one-item / poll-one-operation / drop-from-inventory. Selected by registry lookup
/// and driven generically by the C3 remover (see [`crate::remover::remove_kind`]) so that
/// the parallel delete-then-poll loop is written exactly once.
pub trait ResourceHandler: Send + Sync {
    /// Stable identity; used as a dependency key and for logging. Must be unique across the
    /// registry.
    fn name(&self) -> &'static str;

    /// Static set of kind names that must reach empty inventory before this kind may
    /// proceed. Must be stable across calls.
    fn dependencies(&self) -> &'static [&'static str];

    /// Returns the current inventory as a deterministically sorted list of identifiers.
    /// When `refresh` is true, re-queries the platform and replaces the inventory
    /// wholesale; when false, returns the cached slice.
    fn list(&self, refresh: bool) -> Result<Vec<String>, PlatformError>;

    /// True if the most recently listed inventory is empty.
    fn is_empty(&self) -> bool;

    /// A snapshot of (identifier, locality) pairs for the remover to iterate.
    fn snapshot(&self) -> Vec<(String, ItemLocality)>;

    /// Issues the delete call for one item, given its locality.
    fn delete_item(&self, identifier: &str, locality: &ItemLocality) -> Result<DeleteOutcome, PlatformError>;

    /// Polls a pending operation for the given locality's scope.
    fn poll_operation(
        &self,
        operation: &crate::platform::types::Operation,
        locality: &ItemLocality,
    ) -> Result<crate::platform::types::OperationStatus, PlatformError>;

    /// Removes `identifier` from the in-memory inventory after a confirmed delete.
    fn forget(&self, identifier: &str);
}

/// Fatal startup conditions: duplicate registration, or a handler whose declared
/// dependency does not resolve in the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a resource handler named `{0}` is already registered")]
    DuplicateName(&'static str),

    #[error("resource handler `{handler}` depends on unknown kind `{dependency}`")]
    UnknownDependency {
        handler: &'static str,
        dependency: &'static str,
    },
}

/// Populated once at startup, then frozen into a read-only [`Registry`]. The explicit
/// builder is the language-neutral alternative to init-time global registration: it keeps
/// "populated once, read-only thereafter" without relying on module-load side effects.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<&'static str, Arc<dyn ResourceHandler>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. Fatal (returns [`RegistryError::DuplicateName`]) if its name is
    /// already taken.
    pub fn register(
        &mut self,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<&mut Self, RegistryError> {
        let name = handler.name();
        if self.handlers.insert(name, handler).is_some() {
            return Err(RegistryError::DuplicateName(name));
        }
        Ok(self)
    }

    /// Validates that every declared dependency resolves, then freezes the builder into a
    /// [`Registry`]. `config` is not otherwise consulted here — handlers are constructed
    /// already bound to their platform client and project; this method only validates the
    /// dependency graph.
    pub fn build(self, _config: &Config) -> Result<Registry, RegistryError> {
        for handler in self.handlers.values() {
            for dependency in handler.dependencies() {
                if !self.handlers.contains_key(dependency) {
                    return Err(RegistryError::UnknownDependency {
                        handler: handler.name(),
                        dependency,
                    });
                }
            }
        }
        Ok(Registry {
            handlers: Arc::new(self.handlers),
        })
    }
}

/// Process-wide, read-only catalogue of handlers by stable name.
#[derive(Clone)]
pub struct Registry {
    handlers: Arc<HashMap<&'static str, Arc<dyn ResourceHandler>>>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ResourceHandler>> {
        self.handlers.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ResourceHandler>> {
        self.handlers.values()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::inventory::ItemLocality;
    use crate::platform::types::{Operation, OperationStatus};

    struct StubHandler {
        name: &'static str,
        dependencies: &'static [&'static str],
    }

    impl ResourceHandler for StubHandler {
        fn name(&self) -> &'static str {
            self.name
        }
        fn dependencies(&self) -> &'static [&'static str] {
            self.dependencies
        }
        fn list(&self, _refresh: bool) -> Result<Vec<String>, PlatformError> {
            Ok(vec![])
        }
        fn is_empty(&self) -> bool {
            true
        }
        fn snapshot(&self) -> Vec<(String, ItemLocality)> {
            vec![]
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
        fn forget(&self, _identifier: &str) {}
    }

    fn stub(name: &'static str, dependencies: &'static [&'static str]) -> Arc<dyn ResourceHandler> {
        Arc::new(StubHandler { name, dependencies })
    }

    #[test]
    fn duplicate_registration_is_fatal() {
        let mut builder = RegistryBuilder::new();
        builder.register(stub("a", &[])).unwrap();
        let err = builder.register(stub("a", &[])).unwrap_err();
        assert_matches!(err, RegistryError::DuplicateName("a"));
    }

    #[test]
    fn dangling_dependency_is_fatal() {
        let mut builder = RegistryBuilder::new();
        builder.register(stub("a", &["b"])).unwrap();
        let config = crate::config::tests::test_config();
        let err = builder.build(&config).unwrap_err();
        assert_matches!(
            err,
            RegistryError::UnknownDependency {
                handler: "a",
                dependency: "b"
            }
        );
    }

    #[test]
    fn resolved_dependencies_build_successfully() {
        let mut builder = RegistryBuilder::new();
        builder.register(stub("b", &[])).unwrap();
        builder.register(stub("a", &["b"])).unwrap();
        let config = crate::config::tests::test_config();
        let registry = builder.build(&config).unwrap();
        assert_eq!(registry.len(), 2);
    }
}
