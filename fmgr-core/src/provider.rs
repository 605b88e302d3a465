//! Provider - Trait abstracting resource operations
//!
//! A Provider exposes a set of resource types and the Create/Read/Update/
//! Delete operations that translate resource data into calls against the
//! device management API.

use std::future::Future;
use std::pin::Pin;

use crate::resource::ResourceData;
use crate::schema::ResourceSchema;

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    /// (resource type, identifier) the error refers to
    pub resource: Option<(String, String)>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.resource {
            Some((resource_type, id)) if !id.is_empty() => {
                write!(f, "[{}.{}] {}", resource_type, id, self.message)
            }
            Some((resource_type, _)) => write!(f, "[{}] {}", resource_type, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource: None,
            cause: None,
        }
    }

    pub fn for_resource(mut self, resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        self.resource = Some((resource_type.into(), id.into()));
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name (e.g., "object_firewall_address")
    fn name(&self) -> &str;

    /// Attribute schema for this resource type
    fn schema(&self) -> &ResourceSchema;
}

/// Main Provider trait
///
/// All operations take the resource data by value and hand back the updated
/// data. A returned data with an empty id means the resource is gone.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "fortimanager")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<&dyn ResourceType>;

    /// Look up a resource schema by type name
    fn schema(&self, resource_type: &str) -> Option<&ResourceSchema> {
        self.resource_types()
            .into_iter()
            .find(|t| t.name() == resource_type)
            .map(|t| t.schema())
    }

    /// Create a resource and return its refreshed data
    fn create(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>>;

    /// Refresh a resource; clears the id when it no longer exists
    fn read(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>>;

    /// Update a resource in place and return its refreshed data
    fn update(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>>;

    /// Delete a resource; the returned data has an empty id
    fn delete(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>>;

    /// Adopt an existing remote object by its import id
    fn import(
        &self,
        resource_type: &str,
        id: &str,
    ) -> BoxFuture<'_, ProviderResult<ResourceData>>;
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<&dyn ResourceType> {
        (**self).resource_types()
    }

    fn create(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        (**self).create(data)
    }

    fn read(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        (**self).read(data)
    }

    fn update(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        (**self).update(data)
    }

    fn delete(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        (**self).delete(data)
    }

    fn import(
        &self,
        resource_type: &str,
        id: &str,
    ) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        (**self).import(resource_type, id)
    }
}
