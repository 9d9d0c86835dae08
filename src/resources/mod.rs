//! C1: the eight resource kinds this binary knows how to destroy. Each submodule owns one
//! [`crate::registry::ResourceHandler`] implementation; this module only wires them into a
//! [`crate::registry::Registry`].

pub mod firewall;
pub mod instance_group_region;
pub mod instance_group_zone;
pub mod instance_template;
pub mod network;
pub mod network_peering;
pub mod service_account;
pub mod subnetwork;

use std::sync::Arc;

use crate::config::Config;
use crate::registry::{RegistryBuilder, RegistryError};

/// Registers all eight handlers against `config`'s client, project, zones, and regions.
/// Declared in no particular order: [`RegistryBuilder::build`] validates the dependency
/// graph regardless of registration order.
pub fn register_all(config: &Config) -> Result<crate::registry::Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();

    builder.register(Arc::new(firewall::FirewallHandler::new(
        config.client.clone(),
        config.project.clone(),
    )))?;
    builder.register(Arc::new(network_peering::NetworkPeeringHandler::new(
        config.client.clone(),
        config.project.clone(),
    )))?;
    builder.register(Arc::new(instance_group_zone::InstanceGroupZoneHandler::new(
        config.client.clone(),
        config.project.clone(),
        config.zones.clone(),
    )))?;
    builder.register(Arc::new(
        instance_group_region::InstanceGroupRegionHandler::new(
            config.client.clone(),
            config.project.clone(),
            config.regions.clone(),
        ),
    ))?;
    builder.register(Arc::new(service_account::ServiceAccountHandler::new(
        config.client.clone(),
        config.project.clone(),
    )))?;
    builder.register(Arc::new(instance_template::InstanceTemplateHandler::new(
        config.client.clone(),
        config.project.clone(),
    )))?;
    builder.register(Arc::new(subnetwork::SubnetworkHandler::new(
        config.client.clone(),
        config.project.clone(),
        config.regions.clone(),
    )))?;
    builder.register(Arc::new(network::NetworkHandler::new(
        config.client.clone(),
        config.project.clone(),
    )))?;

    builder.build(config)
}
