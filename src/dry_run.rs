//! C5: the dry-run reporter. A single pass over every registered kind that lists inventory
//! and logs what would be destroyed, without consulting exclusions and without issuing a
//! single delete call.

use crate::registry::Registry;

/// Lists every registered kind's current inventory and logs it. Exclusions are deliberately
/// not applied here: a dry run reports everything found in the project so an operator can
/// decide what to exclude, rather than hiding items that a later real run would skip anyway.
pub fn report(registry: &Registry) -> Result<(), crate::platform::PlatformError> {
    let mut anything_found = false;

    for handler in registry.iter() {
        let identifiers = handler.list(true)?;
        if identifiers.is_empty() {
            tracing::info!(kind = handler.name(), "nothing to destroy");
            continue;
        }
        anything_found = true;
        tracing::info!(
            kind = handler.name(),
            count = identifiers.len(),
            "would destroy {:?}",
            identifiers
        );
    }

    if !anything_found {
        tracing::info!("project is already empty of everything this binary manages");
    }

    Ok(())
}
