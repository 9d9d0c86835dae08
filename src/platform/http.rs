//! Blocking REST implementation of [`GcpClient`] against the Compute Engine v1 and IAM v1
//! APIs. Credential acquisition and refresh are out of scope; this client is handed a
//! bearer token up front and carries it on every request.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use super::types::{ComputeItem, Operation, OperationStatus, PeeringEntry, ServiceAccountEntry};
use super::{GcpClient, PlatformError};

const COMPUTE_BASE: &str = "https://compute.googleapis.com/compute/v1/projects";
const IAM_BASE: &str = "https://iam.googleapis.com/v1/projects";

/// Builds a [reqwest::blocking::Client] the way the rest of this crate's ecosystem does:
/// rustls backend, explicit connect/overall timeouts, no implicit retries.
pub fn build_http_client(timeout: Duration) -> Result<Client, PlatformError> {
    Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|source| PlatformError::Request {
            endpoint: "client builder".to_string(),
            source,
        })
}

/// Blocking REST client carrying a bearer token, implementing [`GcpClient`] against the
/// live Compute Engine and IAM APIs.
pub struct HttpGcpClient {
    http: Client,
    bearer_token: String,
}

impl HttpGcpClient {
    pub fn new(http: Client, bearer_token: String) -> Self {
        Self { http, bearer_token }
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, PlatformError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .map_err(|source| PlatformError::Request {
                endpoint: url.to_string(),
                source,
            })?;
        decode_ok(url, response)
    }

    fn delete(&self, url: &str) -> Result<Operation, PlatformError> {
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .map_err(|source| PlatformError::Request {
                endpoint: url.to_string(),
                source,
            })?;
        let body: OperationResponse = decode_ok(url, response)?;
        Ok(Operation { name: body.name })
    }

    fn post_empty(&self, url: &str) -> Result<Operation, PlatformError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .map_err(|source| PlatformError::Request {
                endpoint: url.to_string(),
                source,
            })?;
        let body: OperationResponse = decode_ok(url, response)?;
        Ok(Operation { name: body.name })
    }
}

fn decode_ok<T: for<'de> Deserialize<'de>>(
    endpoint: &str,
    response: Response,
) -> Result<T, PlatformError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(PlatformError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    response.json().map_err(|source| PlatformError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct NamedSelfLink {
    name: String,
}

#[derive(Debug, Deserialize)]
struct NetworkWithPeerings {
    name: String,
    #[serde(default)]
    peerings: Vec<NamedSelfLink>,
}

#[derive(Debug, Deserialize)]
struct ServiceAccountsResponse {
    #[serde(default)]
    accounts: Vec<RawServiceAccount>,
}

#[derive(Debug, Deserialize)]
struct RawServiceAccount {
    #[serde(rename = "displayName", default)]
    display_name: String,
    email: String,
}

impl GcpClient for HttpGcpClient {
    fn list_firewalls(&self, project: &str) -> Result<Vec<ComputeItem>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/global/firewalls");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items)
    }

    fn delete_firewall(&self, project: &str, name: &str) -> Result<Operation, PlatformError> {
        self.delete(&format!("{COMPUTE_BASE}/{project}/global/firewalls/{name}"))
    }

    fn list_networks(&self, project: &str) -> Result<Vec<ComputeItem>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/global/networks");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items)
    }

    fn delete_network(&self, project: &str, name: &str) -> Result<Operation, PlatformError> {
        self.delete(&format!("{COMPUTE_BASE}/{project}/global/networks/{name}"))
    }

    fn list_network_peerings(&self, project: &str) -> Result<Vec<PeeringEntry>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/global/networks");
        let resp: ListResponse<NetworkWithPeerings> = self.get(&url)?;
        Ok(resp
            .items
            .into_iter()
            .flat_map(|network| {
                network.peerings.into_iter().map(move |peering| PeeringEntry {
                    peering_name: peering.name,
                    network_name: network.name.clone(),
                })
            })
            .collect())
    }

    fn remove_network_peering(
        &self,
        project: &str,
        network: &str,
        peering_name: &str,
    ) -> Result<Operation, PlatformError> {
        let base = format!("{COMPUTE_BASE}/{project}/global/networks/{network}/removePeering");
        let mut url = url::Url::parse(&base)
            .expect("compute base URL plus project/network names is always a valid URL");
        url.query_pairs_mut().append_pair("name", peering_name);
        self.post_empty(url.as_str())
    }

    fn list_subnetworks(
        &self,
        project: &str,
        region: &str,
    ) -> Result<Vec<ComputeItem>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/regions/{region}/subnetworks");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items)
    }

    fn delete_subnetwork(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<Operation, PlatformError> {
        self.delete(&format!(
            "{COMPUTE_BASE}/{project}/regions/{region}/subnetworks/{name}"
        ))
    }

    fn list_instance_templates(&self, project: &str) -> Result<Vec<ComputeItem>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/global/instanceTemplates");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items)
    }

    fn delete_instance_template(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Operation, PlatformError> {
        self.delete(&format!(
            "{COMPUTE_BASE}/{project}/global/instanceTemplates/{name}"
        ))
    }

    fn list_instance_groups_region(
        &self,
        project: &str,
        region: &str,
    ) -> Result<Vec<ComputeItem>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/regions/{region}/instanceGroupManagers");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items)
    }

    fn delete_instance_group_region(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<Operation, PlatformError> {
        self.delete(&format!(
            "{COMPUTE_BASE}/{project}/regions/{region}/instanceGroupManagers/{name}"
        ))
    }

    fn list_instance_groups_zone(
        &self,
        project: &str,
        zone: &str,
    ) -> Result<Vec<ComputeItem>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/zones/{zone}/instanceGroupManagers");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items)
    }

    fn delete_instance_group_zone(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Operation, PlatformError> {
        self.delete(&format!(
            "{COMPUTE_BASE}/{project}/zones/{zone}/instanceGroupManagers/{name}"
        ))
    }

    fn list_service_accounts(
        &self,
        project: &str,
    ) -> Result<Vec<ServiceAccountEntry>, PlatformError> {
        let url = format!("{IAM_BASE}/{project}/serviceAccounts");
        let resp: ServiceAccountsResponse = self.get(&url)?;
        Ok(resp
            .accounts
            .into_iter()
            .map(|a| ServiceAccountEntry {
                display_name: a.display_name,
                email: a.email,
            })
            .collect())
    }

    fn delete_service_account(&self, project: &str, email: &str) -> Result<(), PlatformError> {
        let url = format!("{IAM_BASE}/{project}/serviceAccounts/{email}");
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .map_err(|source| PlatformError::Request {
                endpoint: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PlatformError::Status {
                endpoint: url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn get_global_operation(
        &self,
        project: &str,
        name: &str,
    ) -> Result<OperationStatus, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/global/operations/{name}");
        let resp: OperationStatusResponse = self.get(&url)?;
        Ok(OperationStatus(resp.status))
    }

    fn get_regional_operation(
        &self,
        project: &str,
        region: &str,
        name: &str,
    ) -> Result<OperationStatus, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/regions/{region}/operations/{name}");
        let resp: OperationStatusResponse = self.get(&url)?;
        Ok(OperationStatus(resp.status))
    }

    fn get_zonal_operation(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<OperationStatus, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/zones/{zone}/operations/{name}");
        let resp: OperationStatusResponse = self.get(&url)?;
        Ok(OperationStatus(resp.status))
    }

    fn list_zones(&self, project: &str) -> Result<Vec<String>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/zones");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items.into_iter().map(|i| i.name).collect())
    }

    fn list_regions(&self, project: &str) -> Result<Vec<String>, PlatformError> {
        let url = format!("{COMPUTE_BASE}/{project}/regions");
        let resp: ListResponse<ComputeItem> = self.get(&url)?;
        Ok(resp.items.into_iter().map(|i| i.name).collect())
    }
}
