//! Cluster connection and per-resource client handles.
//!
//! A [`ClusterConnection`] wraps one `kube::Client` built from a kubeconfig
//! and carries a stable identity, so handle caching can key on the connection
//! explicitly rather than on incidental object identity. [`DynamicHandle`]s
//! are the cached per-resource entry points for dynamic dispatch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kube::api::{Api, DynamicObject};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::ApiResource;
use kube::{Client, Config};
use tracing::info;
use uuid::Uuid;

use crate::config::KubernetesConfig;
use crate::errors::{ServerError, ServerResult};
use crate::scheme::ResourceDescriptor;

/// A ready-to-use connection to one cluster.
#[derive(Clone)]
pub struct ClusterConnection {
    id: Uuid,
    client: Client,
}

impl ClusterConnection {
    /// Build a client from the configured kubeconfig path and context. With
    /// no path configured, the standard environment defaults apply
    /// (`KUBECONFIG`, `~/.kube/config`, in-cluster service account).
    pub async fn connect(config: &KubernetesConfig) -> ServerResult<Self> {
        let client = match &config.kubeconfig {
            Some(path) => {
                let kubeconfig =
                    Kubeconfig::read_from(path).map_err(|e| ServerError::Connection {
                        reason: format!("failed to read kubeconfig {}: {e}", path.display()),
                    })?;
                let options = KubeConfigOptions {
                    context: config.context.clone(),
                    ..KubeConfigOptions::default()
                };
                let kube_config = Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ServerError::Connection {
                        reason: format!("failed to build client config: {e}"),
                    })?;
                Client::try_from(kube_config).map_err(|e| ServerError::Connection {
                    reason: format!("failed to create client: {e}"),
                })?
            }
            None => Client::try_default()
                .await
                .map_err(|e| ServerError::Connection {
                    reason: format!("failed to create client from environment: {e}"),
                })?,
        };

        let id = Uuid::new_v4();
        info!(connection = %id, "Cluster connection established");
        Ok(Self { id, client })
    }

    /// Stable identity of this connection, used as part of handle cache keys.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// A resource-specific entry point for dynamic CRUD calls.
///
/// Holds the shared client plus the descriptor's resolved [`ApiResource`];
/// the namespace scoping of the underlying `Api<DynamicObject>` is chosen
/// per call, so one handle serves every namespace.
pub struct DynamicHandle {
    client: Client,
    resource: ApiResource,
    namespaced: bool,
}

impl DynamicHandle {
    pub fn new(client: Client, descriptor: &ResourceDescriptor) -> Self {
        Self {
            client,
            resource: descriptor.to_api_resource(),
            namespaced: descriptor.namespaced,
        }
    }

    pub fn namespaced(&self) -> bool {
        self.namespaced
    }

    /// Api scoped for single-object verbs (create/get/patch/delete).
    ///
    /// Cluster-scoped resources ignore the namespace argument entirely; a
    /// namespaced resource with no namespace given uses the kubeconfig
    /// default namespace.
    pub fn scoped(&self, namespace: &str) -> Api<DynamicObject> {
        if !self.namespaced {
            Api::all_with(self.client.clone(), &self.resource)
        } else if namespace.is_empty() {
            Api::default_namespaced_with(self.client.clone(), &self.resource)
        } else {
            Api::namespaced_with(self.client.clone(), namespace, &self.resource)
        }
    }

    /// Api scoped for list calls. An empty namespace on a namespaced
    /// resource lists across all namespaces.
    pub fn list_scope(&self, namespace: &str) -> Api<DynamicObject> {
        if self.namespaced && !namespace.is_empty() {
            Api::namespaced_with(self.client.clone(), namespace, &self.resource)
        } else {
            Api::all_with(self.client.clone(), &self.resource)
        }
    }
}

/// Cache of per-resource handles, keyed by `(connection id, plural name)`.
///
/// Insert-if-absent under one lock: concurrent first-uses of the same key
/// resolve to exactly one cached handle. Entries live for the life of the
/// connection and are never invalidated.
pub struct HandleCache<H> {
    handles: Mutex<HashMap<(Uuid, String), Arc<H>>>,
}

impl<H> HandleCache<H> {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the handle for `(connection, plural)`, building and caching it
    /// on first use.
    pub fn resolve(&self, connection: Uuid, plural: &str, build: impl FnOnce() -> H) -> Arc<H> {
        let mut handles = self.handles.lock().unwrap();
        Arc::clone(
            handles
                .entry((connection, plural.to_string()))
                .or_insert_with(|| Arc::new(build())),
        )
    }

    pub fn len(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> Default for HandleCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_use_builds_once_then_reuses() {
        let cache: HandleCache<u32> = HandleCache::new();
        let connection = Uuid::new_v4();

        let first = cache.resolve(connection, "pods", || 1);
        let second = cache.resolve(connection, "pods", || 2);

        assert_eq!(*first, 1);
        assert_eq!(*second, 1, "second resolve must reuse the cached handle");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_plurals_get_distinct_handles() {
        let cache: HandleCache<u32> = HandleCache::new();
        let connection = Uuid::new_v4();

        cache.resolve(connection, "pods", || 1);
        cache.resolve(connection, "deployments", || 2);

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_distinct_connections_get_distinct_handles() {
        let cache: HandleCache<u32> = HandleCache::new();

        cache.resolve(Uuid::new_v4(), "pods", || 1);
        cache.resolve(Uuid::new_v4(), "pods", || 2);

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_concurrent_first_use_yields_one_handle() {
        let cache: Arc<HandleCache<usize>> = Arc::new(HandleCache::new());
        let connection = Uuid::new_v4();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.resolve(connection, "pods", move || worker))
            })
            .collect();

        let resolved: Vec<Arc<usize>> = workers
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert_eq!(cache.len(), 1);
        let winner = *resolved[0];
        assert!(resolved.iter().all(|handle| **handle == winner));
    }
}
