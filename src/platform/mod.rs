//! The platform boundary: a thin, mockable contract over the GCP Compute Engine and IAM
//! REST APIs. Resource handlers never talk to `reqwest` directly — they depend on
//! [`GcpClient`], so tests can swap in a [`MockGcpClient`](MockGcpClient) without a live
//! project.

pub mod http;
pub mod types;

use thiserror::Error;
use types::{ComputeItem, Operation, OperationStatus, PeeringEntry, ServiceAccountEntry};

/// Errors surfaced by a [`GcpClient`] implementation. These are the "transient remote" and
/// "configuration" errors from the error taxonomy, as seen from the platform boundary.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("request to `{endpoint}` failed: `{source}`")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{endpoint}` returned status {status}: `{body}`")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response from `{endpoint}`: `{source}`")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid bearer token: `{0}`")]
    InvalidCredentials(String),
}

/// Contract for the GCP Compute Engine and IAM primitives the resource handlers need: list,
/// delete (returning a long-running operation where the API has one), and operation
/// polling scoped by Global/Regional/Zonal, per the platform's own convention.
#[cfg_attr(test, mockall::automock)]
pub trait GcpClient: Send + Sync {
    /// Lists all firewalls in the project (global-scoped).
    fn list_firewalls(&self, project: &str) -> Result<Vec<ComputeItem>, PlatformError>;
    /// Issues deletion of a firewall, returning the long-running operation handle.
    fn delete_firewall(&self, project: &str, name: &str) -> Result<Operation, PlatformError>;

    /// Lists all VPC networks in the project (global-scoped).
    fn list_networks(&self, project: &str) -> Result<Vec<ComputeItem>, PlatformError>;
    /// Issues deletion of a VPC network.
    fn delete_network(&self, project: &str, name: &str) -> Result<Operation, PlatformError>;

    /// Lists the peerings of every network in the project, paired with their parent
    /// network's name.
    fn list_network_peerings(&self, project: &str) -> Result<Vec<PeeringEntry>, PlatformError>;
    /// Removes a peering from its parent network. This is a `removePeering` call on the
    /// network, not a delete of the peering resource itself.
    fn remove_network_peering(
        &self,
        project: &str,
        network: &str,
        peering_name: &str,
    ) -> Result<Operation, PlatformError>;

    /// Lists subnetworks in one region.
    fn list_subnetworks(
        &self,
        project: &str,
        region: &str,
    ) -> Result<Vec<ComputeItem>, PlatformError>;
    /// Issues deletion of a subnetwork.
    fn delete_subnetwork(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<Operation, PlatformError>;

    /// Lists instance templates in the project (global-scoped).
    fn list_instance_templates(&self, project: &str) -> Result<Vec<ComputeItem>, PlatformError>;
    /// Issues deletion of an instance template.
    fn delete_instance_template(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Operation, PlatformError>;

    /// Lists region-scoped managed instance groups in one region.
    fn list_instance_groups_region(
        &self,
        project: &str,
        region: &str,
    ) -> Result<Vec<ComputeItem>, PlatformError>;
    /// Issues deletion of a region-scoped managed instance group.
    fn delete_instance_group_region(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<Operation, PlatformError>;

    /// Lists zone-scoped managed instance groups in one zone.
    fn list_instance_groups_zone(
        &self,
        project: &str,
        zone: &str,
    ) -> Result<Vec<ComputeItem>, PlatformError>;
    /// Issues deletion of a zone-scoped managed instance group.
    fn delete_instance_group_zone(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Operation, PlatformError>;

    /// Lists IAM service accounts in the project, filtered by the caller to those whose
    /// email contains the project id.
    fn list_service_accounts(
        &self,
        project: &str,
    ) -> Result<Vec<ServiceAccountEntry>, PlatformError>;
    /// Deletes an IAM service account. The IAM API has no long-running operation for this
    /// call; it completes synchronously.
    fn delete_service_account(&self, project: &str, email: &str) -> Result<(), PlatformError>;

    /// Polls a global-scoped operation for completion status.
    fn get_global_operation(
        &self,
        project: &str,
        name: &str,
    ) -> Result<OperationStatus, PlatformError>;
    /// Polls a region-scoped operation for completion status.
    fn get_regional_operation(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus, PlatformError>;
    /// Polls a zone-scoped operation for completion status.
    fn get_zonal_operation(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationStatus, PlatformError>;

    /// Lists the zones available to the project, used when the CLI is not given an
    /// explicit `--zone` set.
    fn list_zones(&self, project: &str) -> Result<Vec<String>, PlatformError>;
    /// Lists the regions available to the project, used when the CLI is not given an
    /// explicit `--region` set.
    fn list_regions(&self, project: &str) -> Result<Vec<String>, PlatformError>;
}
