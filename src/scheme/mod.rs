//! Resource scheme resolution.
//!
//! A [`Scheme`] maps plural resource names (`pods`, `deployments`) to fully
//! qualified [`ResourceDescriptor`]s. It is built once at startup (a builtin
//! table of well-known kinds overlaid with the authoritative list discovered
//! from the live cluster) and is read-only afterward.

use std::collections::HashMap;

use kube::discovery::ApiResource;

mod builtin;
pub mod discovery;
pub mod kind;

pub use discovery::{discover, parse_api_resources};
pub use kind::infer_kind;

/// Identifies one API resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// API group; empty string means the core group.
    pub group: String,
    /// API version within the group, e.g. `v1`.
    pub version: String,
    /// Plural resource name used in lookups, e.g. `pods`.
    pub plural: String,
    /// PascalCase type name, e.g. `Pod`.
    pub kind: String,
    /// Whether instances live in a namespace.
    pub namespaced: bool,
}

impl ResourceDescriptor {
    /// The `apiVersion` string: `group/version`, or bare `version` for the
    /// core group.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// REST-style resource path: `{apiVersion}/{plural}`.
    pub fn resource_path(&self) -> String {
        format!("{}/{}", self.api_version(), self.plural)
    }

    /// Split an `apiVersion` string into (group, version). No separator means
    /// the core group, represented as the empty string.
    pub fn split_api_version(api_version: &str) -> (String, String) {
        match api_version.split_once('/') {
            Some((group, version)) => (group.to_string(), version.to_string()),
            None => (String::new(), api_version.to_string()),
        }
    }

    /// Convert into the dynamic-dispatch resource description used by
    /// `Api<DynamicObject>`.
    pub fn to_api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.group.clone(),
            version: self.version.clone(),
            api_version: self.api_version(),
            kind: self.kind.clone(),
            plural: self.plural.clone(),
        }
    }
}

/// The full set of descriptors known to the running server, keyed by plural
/// resource name. Immutable after build.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    resources: HashMap<String, ResourceDescriptor>,
}

impl Scheme {
    /// An empty scheme.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The static fallback table of well-known built-in and commonly
    /// installed resource kinds. Used as seed data under the discovery
    /// overlay and in tests.
    pub fn builtin() -> Self {
        builtin::seed()
    }

    /// Insert a descriptor, returning the entry it replaced if the plural
    /// name was already present.
    pub(crate) fn insert(&mut self, descriptor: ResourceDescriptor) -> Option<ResourceDescriptor> {
        self.resources.insert(descriptor.plural.clone(), descriptor)
    }

    /// Resolve a plural resource name.
    pub fn lookup(&self, plural: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(plural)
    }

    pub fn contains(&self, plural: &str) -> bool {
        self.resources.contains_key(plural)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate over all descriptors, in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_core_group() {
        let descriptor = ResourceDescriptor {
            group: String::new(),
            version: "v1".to_string(),
            plural: "pods".to_string(),
            kind: "Pod".to_string(),
            namespaced: true,
        };
        assert_eq!(descriptor.api_version(), "v1");
        assert_eq!(descriptor.resource_path(), "v1/pods");
    }

    #[test]
    fn test_api_version_named_group() {
        let descriptor = ResourceDescriptor {
            group: "apps".to_string(),
            version: "v1".to_string(),
            plural: "deployments".to_string(),
            kind: "Deployment".to_string(),
            namespaced: true,
        };
        assert_eq!(descriptor.api_version(), "apps/v1");
        assert_eq!(descriptor.resource_path(), "apps/v1/deployments");
    }

    #[test]
    fn test_split_api_version() {
        assert_eq!(
            ResourceDescriptor::split_api_version("apps/v1"),
            ("apps".to_string(), "v1".to_string())
        );
        assert_eq!(
            ResourceDescriptor::split_api_version("v1"),
            (String::new(), "v1".to_string())
        );
    }

    #[test]
    fn test_resource_path_round_trip() {
        let descriptor = ResourceDescriptor {
            group: "cert-manager.io".to_string(),
            version: "v1".to_string(),
            plural: "certificates".to_string(),
            kind: "Certificate".to_string(),
            namespaced: true,
        };

        let path = descriptor.resource_path();
        let mut parts = path.splitn(3, '/');
        let group = parts.next().unwrap();
        let version = parts.next().unwrap();
        let plural = parts.next().unwrap();

        assert_eq!(group, descriptor.group);
        assert_eq!(version, descriptor.version);
        assert_eq!(plural, descriptor.plural);
    }

    #[test]
    fn test_to_api_resource() {
        let descriptor = ResourceDescriptor {
            group: "apps".to_string(),
            version: "v1".to_string(),
            plural: "deployments".to_string(),
            kind: "Deployment".to_string(),
            namespaced: true,
        };
        let api_resource = descriptor.to_api_resource();
        assert_eq!(api_resource.api_version, "apps/v1");
        assert_eq!(api_resource.kind, "Deployment");
        assert_eq!(api_resource.plural, "deployments");
    }

    #[test]
    fn test_builtin_lookup() {
        let scheme = Scheme::builtin();
        let pods = scheme.lookup("pods").unwrap();
        assert_eq!(pods.kind, "Pod");
        assert!(pods.namespaced);

        let nodes = scheme.lookup("nodes").unwrap();
        assert!(!nodes.namespaced);

        assert!(scheme.lookup("florbs").is_none());
    }

    #[test]
    fn test_builtin_descriptors_are_well_formed() {
        let scheme = Scheme::builtin();
        assert!(!scheme.is_empty());
        for descriptor in scheme.descriptors() {
            assert!(!descriptor.kind.is_empty(), "{}", descriptor.plural);
            assert!(!descriptor.version.is_empty(), "{}", descriptor.plural);
            // api_version derivation never produces a leading or trailing '/'
            let api_version = descriptor.api_version();
            assert!(!api_version.starts_with('/'), "{api_version}");
            assert!(!api_version.ends_with('/'), "{api_version}");
        }
    }
}
