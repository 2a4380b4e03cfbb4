//! Dynamic CRUD dispatch.
//!
//! The [`Dispatcher`] resolves plural resource names against the scheme and
//! performs create/get/patch/delete against the cluster through cached
//! per-resource handles. Every verb validates its arguments before touching
//! the network and returns a recoverable error on failure. The MCP boundary
//! turns those into conversational text; no per-request path may terminate
//! the process.

use std::sync::Arc;

use kube::api::{DeleteParams, DynamicObject, ListParams, Patch, PatchParams, PostParams};
use serde_json::Value;
use tracing::debug;

use crate::cluster::{ClusterConnection, DynamicHandle, HandleCache};
use crate::errors::{ServerError, ServerResult};
use crate::scheme::{ResourceDescriptor, Scheme};

/// Resolve a plural resource name against the scheme, rejecting empty input.
fn validate<'a>(scheme: &'a Scheme, resource: &str) -> ServerResult<&'a ResourceDescriptor> {
    if resource.is_empty() {
        return Err(ServerError::MissingArgument { field: "resource" });
    }
    scheme
        .lookup(resource)
        .ok_or_else(|| ServerError::UnknownResource {
            resource: resource.to_string(),
        })
}

fn require(field: &'static str, value: &str) -> ServerResult<()> {
    if value.is_empty() {
        return Err(ServerError::MissingArgument { field });
    }
    Ok(())
}

fn object_name(object: &DynamicObject) -> String {
    object
        .metadata
        .name
        .clone()
        .unwrap_or_else(|| "unknown".to_string())
}

/// Dispatches CRUD verbs against resources known only at runtime.
pub struct Dispatcher {
    scheme: Arc<Scheme>,
    connection: ClusterConnection,
    handles: HandleCache<DynamicHandle>,
}

impl Dispatcher {
    pub fn new(scheme: Arc<Scheme>, connection: ClusterConnection) -> Self {
        Self {
            scheme,
            connection,
            handles: HandleCache::new(),
        }
    }

    /// Check that a plural resource name resolves, without building a handle.
    /// Lets callers reject bad input before doing expensive work (e.g. the
    /// manifest transformation that precedes `create`).
    pub fn check_resource(&self, resource: &str) -> ServerResult<()> {
        validate(&self.scheme, resource).map(|_| ())
    }

    fn resolve(&self, resource: &str) -> ServerResult<Arc<DynamicHandle>> {
        let descriptor = validate(&self.scheme, resource)?;
        Ok(self.handles.resolve(self.connection.id(), resource, || {
            DynamicHandle::new(self.connection.client().clone(), descriptor)
        }))
    }

    /// Describe where an operation ran, for result messages.
    fn scope_suffix(handle: &DynamicHandle, namespace: &str) -> String {
        if handle.namespaced() && !namespace.is_empty() {
            format!(" in namespace '{namespace}'")
        } else {
            String::new()
        }
    }

    /// Create a resource from a manifest already normalized to JSON.
    ///
    /// The namespace argument is ignored for cluster-scoped resources.
    pub async fn create(
        &self,
        resource: &str,
        manifest: Value,
        namespace: &str,
    ) -> ServerResult<String> {
        let handle = self.resolve(resource)?;
        let object: DynamicObject =
            serde_json::from_value(manifest).map_err(|e| ServerError::InvalidManifest {
                reason: e.to_string(),
            })?;

        debug!(resource, namespace, "Creating resource");
        let api = handle.scoped(namespace);
        let created = api.create(&PostParams::default(), &object).await?;

        Ok(format!(
            "Created {resource} '{}'{}",
            object_name(&created),
            Self::scope_suffix(&handle, namespace),
        ))
    }

    /// List all instances of a resource, as a `NAME` column. An empty
    /// namespace on a namespaced resource lists across all namespaces.
    pub async fn list(&self, resource: &str, namespace: &str) -> ServerResult<String> {
        let handle = self.resolve(resource)?;

        debug!(resource, namespace, "Listing resources");
        let api = handle.list_scope(namespace);
        let objects = api.list(&ListParams::default()).await?;

        let mut output = vec!["NAME".to_string()];
        for object in objects.items {
            output.push(object_name(&object));
        }
        Ok(output.join("\n"))
    }

    /// Fetch exactly one instance by name. A missing object surfaces the API
    /// server's 404 as an error, never an empty result.
    pub async fn get(&self, resource: &str, name: &str, namespace: &str) -> ServerResult<String> {
        require("name", name)?;
        let handle = self.resolve(resource)?;

        debug!(resource, name, namespace, "Getting resource");
        let api = handle.scoped(namespace);
        let object = api.get(name).await?;

        Ok(format!("NAME\n{}", object_name(&object)))
    }

    /// Apply a merge patch to an existing resource.
    ///
    /// Existence is pre-validated with a `get` before the patch is issued.
    /// Merge-patch semantics replace list fields wholesale; callers must
    /// treat array fields in the patch as a full replacement.
    pub async fn update(
        &self,
        resource: &str,
        name: &str,
        patch: Value,
        namespace: &str,
    ) -> ServerResult<String> {
        require("name", name)?;
        let handle = self.resolve(resource)?;

        debug!(resource, name, namespace, "Updating resource");
        let api = handle.scoped(namespace);
        api.get(name).await?;
        api.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        Ok(format!(
            "Updated {resource} '{name}'{}",
            Self::scope_suffix(&handle, namespace),
        ))
    }

    /// Delete one instance by name.
    pub async fn delete(
        &self,
        resource: &str,
        name: &str,
        namespace: &str,
    ) -> ServerResult<String> {
        require("name", name)?;
        let handle = self.resolve(resource)?;

        debug!(resource, name, namespace, "Deleting resource");
        let api = handle.scoped(namespace);
        api.delete(name, &DeleteParams::default()).await?;

        Ok(format!(
            "Deleted {resource} '{name}'{}",
            Self::scope_suffix(&handle, namespace),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_resource() {
        let scheme = Scheme::builtin();
        let err = validate(&scheme, "").unwrap_err();
        assert!(matches!(
            err,
            ServerError::MissingArgument { field: "resource" }
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_resource() {
        let scheme = Scheme::builtin();
        let err = validate(&scheme, "florbs").unwrap_err();
        match err {
            ServerError::UnknownResource { resource } => assert_eq!(resource, "florbs"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_resolves_known_resource() {
        let scheme = Scheme::builtin();
        let descriptor = validate(&scheme, "deployments").unwrap();
        assert_eq!(descriptor.kind, "Deployment");
    }

    #[test]
    fn test_require_rejects_empty_name() {
        let err = require("name", "").unwrap_err();
        assert!(matches!(err, ServerError::MissingArgument { field: "name" }));
        assert!(require("name", "busybox").is_ok());
    }
}
