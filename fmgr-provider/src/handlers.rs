//! Resource handlers
//!
//! Create, Read, Update, Delete and Import follow the same steps for every
//! resource type; what differs between resources is carried by the
//! ResourceDefinition (schema, URL template, scope, key and parents).

use fmgr_client::{ClientError, DeviceClient, Paradict, retry};
use fmgr_core::convert::{self, ApiObject, FlattenOptions};
use fmgr_core::provider::{ProviderError, ProviderResult};
use fmgr_core::resource::{ResourceData, Value};
use serde_json::Value as JsonValue;

use crate::config::ProviderConfig;
use crate::schemas::ResourceDefinition;
use crate::scope;

#[derive(Debug, Clone, Copy)]
enum Action {
    Creating,
    Reading,
    Updating,
    Deleting,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Creating => "creating",
            Action::Reading => "reading",
            Action::Updating => "updating",
            Action::Deleting => "deleting",
        }
    }
}

/// Create the resource and read it back
pub async fn create<C: DeviceClient + ?Sized>(
    client: &C,
    config: &ProviderConfig,
    definition: &ResourceDefinition,
    mut data: ResourceData,
) -> ProviderResult<ResourceData> {
    log::debug!("creating {}", definition.type_name);

    definition.schema.apply_defaults(data.attributes_mut());
    let paradict = routing(definition, &data, config)?;
    let obj = build_object(Action::Creating, definition, &data)?;

    let endpoint = &definition.endpoint;
    let (obj, params) = (&obj, &paradict);
    let response = if definition.is_singleton() {
        // Singletons always exist on the device; creating one sets it
        retry(config.retries, move || client.update(endpoint, obj, None, params)).await
    } else {
        retry(config.retries, move || client.create(endpoint, obj, params)).await
    }
    .map_err(|e| operation_error(Action::Creating, definition, &data, e))?;

    let id = definition
        .resource_id(&data)
        .or_else(|| response_key(definition, response.as_ref()))
        .ok_or_else(|| {
            operation_error(
                Action::Creating,
                definition,
                &data,
                format!("key attribute '{}' is not set", definition.mkey.unwrap_or_default()),
            )
        })?;
    data.set_id(id);

    read(client, config, definition, data).await
}

/// Refresh the resource from the device
///
/// A resource that no longer exists comes back with an empty id.
pub async fn read<C: DeviceClient + ?Sized>(
    client: &C,
    config: &ProviderConfig,
    definition: &ResourceDefinition,
    mut data: ResourceData,
) -> ProviderResult<ResourceData> {
    if !data.has_id() {
        return Ok(data);
    }
    log::debug!("reading {} {}", definition.type_name, data.id());

    let paradict = routing(definition, &data, config)?;
    let id = data.id().to_string();
    let mkey = object_key(definition, &id);

    let endpoint = &definition.endpoint;
    let params = &paradict;
    let result = retry(config.retries, move || client.read(endpoint, mkey, params)).await;

    let obj = match result {
        Ok(Some(obj)) => obj,
        Ok(None) | Err(ClientError::NotFound(_)) => {
            log::warn!(
                "{} {} not found on the device, removing it from state",
                definition.type_name,
                id
            );
            data.clear_id();
            return Ok(data);
        }
        Err(e) => return Err(operation_error(Action::Reading, definition, &data, e)),
    };

    let options = FlattenOptions {
        sort_subtables: data.get_str("dynamic_sort_subtable") == Some("true"),
    };
    let flattened = convert::flatten(
        &definition.schema.attributes,
        &obj,
        data.attributes_mut(),
        options,
    );
    if let Err(e) = flattened {
        return Err(operation_error(Action::Reading, definition, &data, e));
    }

    data.commit();
    Ok(data)
}

/// Update the resource in place and read it back
///
/// Attributes removed since the prior state are sent as zero values. A table
/// row whose key attribute changed is renamed.
pub async fn update<C: DeviceClient + ?Sized>(
    client: &C,
    config: &ProviderConfig,
    definition: &ResourceDefinition,
    mut data: ResourceData,
) -> ProviderResult<ResourceData> {
    log::debug!("updating {} {}", definition.type_name, data.id());

    let paradict = routing(definition, &data, config)?;
    let obj = build_object(Action::Updating, definition, &data)?;

    let current_id = if data.has_id() {
        data.id().to_string()
    } else {
        definition.resource_id(&data).unwrap_or_default()
    };
    let mkey = object_key(definition, &current_id);

    let endpoint = &definition.endpoint;
    let (obj, params) = (&obj, &paradict);
    let response = retry(config.retries, move || client.update(endpoint, obj, mkey, params))
        .await
        .map_err(|e| operation_error(Action::Updating, definition, &data, e))?;

    let id = definition
        .resource_id(&data)
        .or_else(|| response_key(definition, response.as_ref()))
        .unwrap_or(current_id);
    data.set_id(id);

    read(client, config, definition, data).await
}

/// Delete the resource; the returned data has an empty id
pub async fn delete<C: DeviceClient + ?Sized>(
    client: &C,
    config: &ProviderConfig,
    definition: &ResourceDefinition,
    mut data: ResourceData,
) -> ProviderResult<ResourceData> {
    log::debug!("deleting {} {}", definition.type_name, data.id());

    let paradict = routing(definition, &data, config)?;
    let id = data.id().to_string();
    let mkey = object_key(definition, &id);

    let endpoint = &definition.endpoint;
    let params = &paradict;
    retry(config.retries, move || client.delete(endpoint, mkey, params))
        .await
        .map_err(|e| operation_error(Action::Deleting, definition, &data, e))?;

    data.clear_id();
    Ok(data)
}

/// Adopt an existing object
///
/// The import id is `<parent keys>/<key>` for table resources and
/// `<parent keys>` for singletons. Parent keys missing from the id are taken
/// from the provider's `import_options`, which may also set the scope
/// attributes (`scopetype`, `adom`, `device_name`, ...).
pub async fn import<C: DeviceClient + ?Sized>(
    client: &C,
    config: &ProviderConfig,
    definition: &ResourceDefinition,
    import_id: &str,
) -> ProviderResult<ResourceData> {
    log::debug!("importing {} {}", definition.type_name, import_id);

    let mut data = ResourceData::new(definition.type_name);
    for (name, value) in &config.import_options {
        if definition.schema.get(name).is_some() {
            data.set(name.clone(), Value::String(value.clone()));
        } else {
            log::warn!("ignoring import option '{}' unknown to {}", name, definition.type_name);
        }
    }
    definition.schema.apply_defaults(data.attributes_mut());

    let segments: Vec<&str> = import_id.split('/').filter(|s| !s.is_empty()).collect();
    let (parent_keys, key) = match definition.mkey {
        Some(_) => match segments.split_last() {
            Some((key, parents)) => (parents, Some(*key)),
            None => (&[][..], None),
        },
        // The id of a parentless singleton is its fixed name
        None if definition.parents.is_empty() => (&[][..], None),
        None => (segments.as_slice(), None),
    };

    if parent_keys.len() > definition.parents.len() {
        return Err(ProviderError::new(format!(
            "Error importing {} resource: unexpected import id \"{}\"",
            definition.display_name, import_id
        ))
        .for_resource(definition.type_name, import_id));
    }
    for ((attribute, _), value) in definition.parents.iter().zip(parent_keys) {
        data.set(*attribute, Value::String(value.to_string()));
    }

    match (definition.mkey, key) {
        (Some(mkey), Some(key)) => {
            data.set(mkey, Value::String(key.to_string()));
            data.set_id(key);
        }
        (Some(mkey), None) => {
            return Err(ProviderError::new(format!(
                "Error importing {} resource: import id must contain the {}",
                definition.display_name, mkey
            ))
            .for_resource(definition.type_name, import_id));
        }
        (None, _) => data.set_id(definition.display_name),
    }

    let data = read(client, config, definition, data).await?;
    if !data.has_id() {
        return Err(ProviderError::new(format!(
            "Error reading {} resource: cannot import non-existent remote object {}",
            definition.display_name, import_id
        ))
        .for_resource(definition.type_name, import_id));
    }
    Ok(data)
}

fn routing(
    definition: &ResourceDefinition,
    data: &ResourceData,
    config: &ProviderConfig,
) -> ProviderResult<Paradict> {
    scope::resolve(definition, data, config)
        .map_err(|e| ProviderError::new(e.to_string()).for_resource(definition.type_name, data.id()))
}

/// Validate and expand the resource data into the object sent to the device
fn build_object(
    action: Action,
    definition: &ResourceDefinition,
    data: &ResourceData,
) -> ProviderResult<ApiObject> {
    let result = match definition.schema.validate(data.attributes()) {
        Err(errors) => Err(errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")),
        Ok(()) => convert::expand(&definition.schema.attributes, data.attributes(), data.prior())
            .map_err(|e| e.to_string()),
    };

    result.map_err(|message| {
        ProviderError::new(format!(
            "Error {} {} resource while getting object: {}",
            action.verb(),
            definition.display_name,
            message
        ))
        .for_resource(definition.type_name, data.id())
    })
}

fn operation_error(
    action: Action,
    definition: &ResourceDefinition,
    data: &ResourceData,
    cause: impl std::fmt::Display,
) -> ProviderError {
    ProviderError::new(format!(
        "Error {} {} resource: {}",
        action.verb(),
        definition.display_name,
        cause
    ))
    .for_resource(definition.type_name, data.id())
}

/// Key addressing the object: the id of a table row, nothing for singletons
fn object_key<'a>(definition: &ResourceDefinition, id: &'a str) -> Option<&'a str> {
    (!definition.is_singleton()).then_some(id)
}

/// Row key echoed back by the device after create/update
fn response_key(definition: &ResourceDefinition, response: Option<&JsonValue>) -> Option<String> {
    let field = definition.endpoint.mkey_field?;
    match response?.get(field)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
