//! Scope resolution
//!
//! Builds the routing parameters addressing a resource: the adom (or the
//! global database), the device and vdom, and the keys of parent objects.

use fmgr_client::Paradict;
use fmgr_core::resource::ResourceData;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::schemas::generated::ResourceDefinition;

/// Where a resource lives on the management server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Object database of an adom, chosen by `scopetype`
    Adom,
    /// Device-wide settings of a managed device
    Device,
    /// Settings of one vdom of a managed device
    Vdom,
    /// Global object database
    Global,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Error adom configuration: {0}")]
    Adom(String),

    #[error("Error device name configuration: {0}")]
    DeviceName(String),

    #[error("Error missing parent key {0}")]
    MissingParent(String),
}

/// Resolve the `{adom}` routing parameter
///
/// Yields `adom/<name>` or `global`, the first path segment below `/pm/config/`.
pub fn resolve_adom(data: &ResourceData, config: &ProviderConfig) -> Result<String, ScopeError> {
    let scopetype = data.get_str("scopetype").unwrap_or("inherit");
    match scopetype {
        "" | "inherit" => Ok(adom_segment(&config.adom)),
        "adom" => match data.get_str("adom") {
            Some(adom) if !adom.is_empty() => Ok(adom_segment(adom)),
            _ => Err(ScopeError::Adom(
                "adom is required when scopetype is \"adom\"".to_string(),
            )),
        },
        "global" => Ok("global".to_string()),
        other => Err(ScopeError::Adom(format!("invalid scopetype \"{}\"", other))),
    }
}

fn adom_segment(adom: &str) -> String {
    match adom {
        "" => "adom/root".to_string(),
        "global" => "global".to_string(),
        name => format!("adom/{}", name),
    }
}

/// Resolve the managed device
pub fn resolve_device(data: &ResourceData, config: &ProviderConfig) -> Result<String, ScopeError> {
    data.get_str("device_name")
        .filter(|d| !d.is_empty())
        .or(config.device_name.as_deref().filter(|d| !d.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            ScopeError::DeviceName(
                "device_name is not set on the resource nor on the provider".to_string(),
            )
        })
}

/// Resolve the vdom of the managed device
pub fn resolve_vdom(data: &ResourceData, config: &ProviderConfig) -> String {
    data.get_str("device_vdom")
        .filter(|v| !v.is_empty())
        .or(Some(config.device_vdom.as_str()).filter(|v| !v.is_empty()))
        .unwrap_or("root")
        .to_string()
}

/// Build the routing parameters of a resource
pub fn resolve(
    definition: &ResourceDefinition,
    data: &ResourceData,
    config: &ProviderConfig,
) -> Result<Paradict, ScopeError> {
    let mut paradict = Paradict::new();

    match definition.scope {
        Scope::Adom => paradict.insert("adom", resolve_adom(data, config)?),
        Scope::Global => paradict.insert("adom", "global"),
        Scope::Device => paradict.insert("device", resolve_device(data, config)?),
        Scope::Vdom => {
            paradict.insert("device", resolve_device(data, config)?);
            paradict.insert("vdom", resolve_vdom(data, config));
        }
    }

    for (attribute, param) in definition.parents {
        let key = data
            .get_string_key(attribute)
            .ok_or_else(|| ScopeError::MissingParent(attribute.to_string()))?;
        paradict.insert_key(*param, &key);
    }

    Ok(paradict)
}
