//! Immutable run configuration: a single plain config struct assembled at startup and
//! handed down as `Arc<Config>`.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::platform::GcpClient;

/// Errors that can occur while assembling a [`Config`]. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("exclusions config file not found at `{path}`: `{source}`")]
    ExclusionsUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exclusions config file at `{path}` could not be parsed: `{source}`")]
    ExclusionsUnparseable {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-kind sets of identifiers that must never be deleted. Matched as an exact-string
/// membership test against the identifier used as the Inventory key for that kind.
///
/// Unknown keys in the source document are ignored: the document is not required to know
/// every kind this binary registers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Exclusions(HashMap<String, HashSet<String>>);

impl Exclusions {
    /// Parses an exclusions document from its on-disk JSON representation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ExclusionsUnreadable {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ExclusionsUnparseable {
            path: path.display().to_string(),
            source,
        })
    }

    /// True if `identifier` is excluded from deletion for `kind`.
    pub fn contains(&self, kind: &str, identifier: &str) -> bool {
        self.0
            .get(kind)
            .map(|set| set.contains(identifier))
            .unwrap_or(false)
    }
}

/// Immutable for the lifetime of a run. Threaded into every handler and into the driver,
/// remover, and dry-run reporter.
pub struct Config {
    pub project: String,
    pub zones: Vec<String>,
    pub regions: Vec<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub dry_run: bool,
    pub cancellation: CancellationToken,
    pub exclusions: Exclusions,
    pub client: Arc<dyn GcpClient>,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project: String,
        zones: Vec<String>,
        regions: Vec<String>,
        timeout: Duration,
        poll_interval: Duration,
        dry_run: bool,
        exclusions: Exclusions,
        client: Arc<dyn GcpClient>,
    ) -> Self {
        Self {
            project,
            zones,
            regions,
            timeout,
            poll_interval,
            dry_run,
            cancellation: CancellationToken::new(),
            exclusions,
            client,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::platform::MockGcpClient;
    use std::io::Write;

    /// A minimal [`Config`] for tests that only need one to exist (e.g. registry
    /// validation), backed by a [`MockGcpClient`] with no expectations set.
    pub(crate) fn test_config() -> Config {
        Config::new(
            "test-project".to_string(),
            vec!["us-central1-a".to_string()],
            vec!["us-central1".to_string()],
            Duration::from_secs(400),
            Duration::from_secs(10),
            false,
            Exclusions::default(),
            Arc::new(MockGcpClient::new()),
        )
    }

    #[test]
    fn loads_and_ignores_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"compute_firewall": ["prod-allow-ssh"], "something_unregistered": ["x"]}}"#
        )
        .unwrap();

        let exclusions = Exclusions::load(file.path()).unwrap();
        assert!(exclusions.contains("compute_firewall", "prod-allow-ssh"));
        assert!(!exclusions.contains("compute_firewall", "other"));
        assert!(!exclusions.contains("something_unregistered", "x"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Exclusions::load(Path::new("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ExclusionsUnreadable { .. }));
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Exclusions::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ExclusionsUnparseable { .. }));
    }
}
