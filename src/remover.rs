//! C3: the per-type remover. Generic over [`ResourceHandler`] so the parallel
//! delete-then-poll loop, exclusion filtering, and timeout bound are written once and
//! reused by every resource kind.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::inventory::ItemLocality;
use crate::platform::PlatformError;
use crate::registry::{DeleteOutcome, ResourceHandler};

/// Errors a single worker, or the remover as a whole, can return. Per the propagation
/// policy, only the first one observed across a kind's worker group is surfaced.
#[derive(Debug, Error)]
pub enum RemoverError {
    #[error("{kind}/{identifier} [project: {project}]: {source}")]
    Platform {
        kind: &'static str,
        project: String,
        identifier: String,
        #[source]
        source: PlatformError,
    },

    #[error(
        "resource deletion timed out for {identifier} [type: {kind} project: {project}] ({timeout_secs} seconds)"
    )]
    Timeout {
        kind: &'static str,
        project: String,
        identifier: String,
        timeout_secs: u64,
    },

    #[error("deletion of {kind}/{identifier} was cancelled")]
    Cancelled {
        kind: &'static str,
        identifier: String,
    },
}

/// Runs the C3 algorithm against `handler`'s current inventory: spawns one task per
/// non-excluded item, each issuing a delete and then polling to completion, and returns the
/// first error observed across the group (or `Ok(())` if every item succeeded or was
/// excluded).
///
/// Exclusion of one item never aborts scheduling of the rest — iteration always continues
/// to the end of the snapshot, regardless of how many items are excluded along the way.
#[instrument(skip_all, fields(kind = handler.name()))]
pub async fn remove_kind(
    handler: Arc<dyn ResourceHandler>,
    config: Arc<Config>,
) -> Result<(), RemoverError> {
    let kind = handler.name();
    let mut workers: JoinSet<Result<(), RemoverError>> = JoinSet::new();

    for (identifier, locality) in handler.snapshot() {
        let exclusion_key = locality.exclusion_key(&identifier).to_string();
        if config.exclusions.contains(kind, &exclusion_key) {
            info!(key = %exclusion_key, "excluded resource, skipping");
            continue;
        }

        let handler = handler.clone();
        let config = config.clone();
        workers.spawn(async move {
            remove_one(handler.as_ref(), &config, &identifier, locality).await
        });
    }

    let mut first_error = None;
    while let Some(joined) = workers.join_next().await {
        let result = joined.expect("remover worker task panicked");
        if let Err(err) = result {
            warn!(%err, "resource removal failed");
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn remove_one(
    handler: &dyn ResourceHandler,
    config: &Config,
    identifier: &str,
    locality: ItemLocality,
) -> Result<(), RemoverError> {
    let kind = handler.name();
    let project = config.project.clone();
    let log_key = locality.exclusion_key(identifier).to_string();

    let outcome = handler
        .delete_item(identifier, &locality)
        .map_err(|source| RemoverError::Platform {
            kind,
            project: project.clone(),
            identifier: identifier.to_string(),
            source,
        })?;

    let operation = match outcome {
        DeleteOutcome::Done => {
            handler.forget(identifier);
            info!(key = %log_key, "resource deleted");
            return Ok(());
        }
        DeleteOutcome::Pending(operation) => operation,
    };

    let started = Instant::now();
    loop {
        if config.cancellation.is_cancelled() {
            return Err(RemoverError::Cancelled {
                kind,
                identifier: identifier.to_string(),
            });
        }

        let status = handler
            .poll_operation(&operation, &locality)
            .map_err(|source| RemoverError::Platform {
                kind,
                project: project.clone(),
                identifier: identifier.to_string(),
                source,
            })?;

        if status.is_done() {
            handler.forget(identifier);
            info!(
                key = %log_key,
                elapsed_secs = started.elapsed().as_secs(),
                "resource deleted"
            );
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            return Err(RemoverError::Timeout {
                kind,
                project,
                identifier: identifier.to_string(),
                timeout_secs: config.timeout.as_secs(),
            });
        }

        info!(
            %identifier,
            elapsed_secs = elapsed.as_secs(),
            "resource currently being deleted"
        );
        sleep_or_cancel(config.poll_interval, &config.cancellation).await;
    }
}

async fn sleep_or_cancel(duration: Duration, cancellation: &tokio_util::sync::CancellationToken) {
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = cancellation.cancelled() => {}
    }
}
