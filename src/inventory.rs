//! C6: the per-handler inventory cache. Backed by [`DashMap`] so that many C3 workers can
//! read and delete-on-success concurrently without an explicit lock, per the "concurrent
//! map" design note.

use dashmap::DashMap;

/// Where an item lives, as needed to issue its delete call and poll the right operation
/// scope. Peerings are keyed by parent network rather than zone/region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLocality {
    Global,
    Regional(String),
    Zonal(String),
    Peering { parent_network: String },
    /// Service accounts are listed and displayed by display name, but every delete call
    /// takes an email address, so the email travels alongside the identifier instead of
    /// being derivable from it.
    ServiceAccount { email: String },
}

impl ItemLocality {
    /// The key exclusions and completion logs should match against. For every kind but
    /// peerings this is just `identifier`; peerings are excluded and logged by their parent
    /// network, since that's the name an operator actually has on hand to exclude, not the
    /// peering's own name.
    pub fn exclusion_key<'a>(&'a self, identifier: &'a str) -> &'a str {
        match self {
            ItemLocality::Peering { parent_network } => parent_network,
            _ => identifier,
        }
    }
}

/// The live set of identifiers for one resource kind, each paired with its locality.
/// Order-insensitive; membership only. After a successful remove of item `i`, `i` is
/// absent.
#[derive(Default)]
pub struct Inventory {
    items: DashMap<String, ItemLocality>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the mapping wholesale, as `list(refresh=true)` requires.
    pub fn replace(&self, items: impl IntoIterator<Item = (String, ItemLocality)>) {
        self.items.clear();
        for (id, locality) in items {
            self.items.insert(id, locality);
        }
    }

    /// Returns the current identifiers, sorted ascending for reproducible logs.
    pub fn sorted_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.items.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// A snapshot of (identifier, locality) pairs, used by the remover to dispatch workers.
    pub fn snapshot(&self) -> Vec<(String, ItemLocality)> {
        self.items
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Removes `identifier` from the inventory after a successful delete.
    pub fn remove(&self, identifier: &str) {
        self.items.remove(identifier);
    }
}
