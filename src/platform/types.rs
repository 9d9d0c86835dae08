//! Wire-adjacent types shared by [`super::GcpClient`] implementations and resource
//! handlers. These are intentionally thin: handlers only need an identifier and, for
//! peerings and service accounts, one extra field.

use serde::Deserialize;

/// A single named Compute Engine resource as returned by a list call.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeItem {
    pub name: String,
}

/// One network peering, paired with the network that owns it. `removePeering` is issued
/// against `network_name`, not against the peering itself.
#[derive(Debug, Clone)]
pub struct PeeringEntry {
    pub peering_name: String,
    pub network_name: String,
}

/// An IAM service account as returned by the list call. Identifiers are displayed by
/// `display_name` but deleted by `email`.
#[derive(Debug, Clone)]
pub struct ServiceAccountEntry {
    pub display_name: String,
    pub email: String,
}

/// Handle to a long-running Compute Engine operation, returned by every delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
}

/// The status of a polled operation. The only terminal value the platform defines is
/// `"DONE"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus(pub String);

impl OperationStatus {
    pub fn is_done(&self) -> bool {
        self.0 == "DONE"
    }
}
