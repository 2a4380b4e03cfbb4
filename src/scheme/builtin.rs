//! Static fallback table of well-known API resources.
//!
//! Seed data for the discovery-built scheme: covers the core built-in kinds
//! plus the custom-resource groups commonly installed alongside them
//! (cert-manager, OLM). Discovery entries override these by plural name.

use super::kind::infer_kind;
use super::{ResourceDescriptor, Scheme};

/// (plural, group, version, namespaced)
const BUILTIN_RESOURCES: &[(&str, &str, &str, bool)] = &[
    // core/v1
    ("configmaps", "", "v1", true),
    ("endpoints", "", "v1", true),
    ("events", "", "v1", true),
    ("limitranges", "", "v1", true),
    ("namespaces", "", "v1", false),
    ("nodes", "", "v1", false),
    ("persistentvolumeclaims", "", "v1", true),
    ("persistentvolumes", "", "v1", false),
    ("pods", "", "v1", true),
    ("replicationcontrollers", "", "v1", true),
    ("resourcequotas", "", "v1", true),
    ("secrets", "", "v1", true),
    ("serviceaccounts", "", "v1", true),
    ("services", "", "v1", true),
    // apps/v1
    ("daemonsets", "apps", "v1", true),
    ("deployments", "apps", "v1", true),
    ("replicasets", "apps", "v1", true),
    ("statefulsets", "apps", "v1", true),
    // batch/v1
    ("cronjobs", "batch", "v1", true),
    ("jobs", "batch", "v1", true),
    // autoscaling/v2
    ("horizontalpodautoscalers", "autoscaling", "v2", true),
    // networking.k8s.io/v1
    ("ingressclasses", "networking.k8s.io", "v1", false),
    ("ingresses", "networking.k8s.io", "v1", true),
    ("networkpolicies", "networking.k8s.io", "v1", true),
    // policy/v1
    ("poddisruptionbudgets", "policy", "v1", true),
    // rbac.authorization.k8s.io/v1
    ("clusterrolebindings", "rbac.authorization.k8s.io", "v1", false),
    ("clusterroles", "rbac.authorization.k8s.io", "v1", false),
    ("rolebindings", "rbac.authorization.k8s.io", "v1", true),
    ("roles", "rbac.authorization.k8s.io", "v1", true),
    // storage.k8s.io/v1
    ("storageclasses", "storage.k8s.io", "v1", false),
    // apiextensions.k8s.io/v1
    ("customresourcedefinitions", "apiextensions.k8s.io", "v1", false),
    // cert-manager.io
    ("certificaterequests", "cert-manager.io", "v1", true),
    ("certificates", "cert-manager.io", "v1", true),
    ("clusterissuers", "cert-manager.io", "v1", false),
    ("issuers", "cert-manager.io", "v1", true),
    // operators.coreos.com (OLM)
    ("catalogsources", "operators.coreos.com", "v1alpha1", true),
    ("clusterserviceversions", "operators.coreos.com", "v1alpha1", true),
    ("installplans", "operators.coreos.com", "v1alpha1", true),
    ("operatorgroups", "operators.coreos.com", "v1", true),
    ("subscriptions", "operators.coreos.com", "v1alpha1", true),
];

/// Kinds the suffix rules in [`infer_kind`] cannot recover (multiword
/// PascalCase names, `-es` plurals). Consulted before inference, never after.
const EXPLICIT_KINDS: &[(&str, &str)] = &[
    ("catalogsources", "CatalogSource"),
    ("certificaterequests", "CertificateRequest"),
    ("clusterissuers", "ClusterIssuer"),
    ("clusterrolebindings", "ClusterRoleBinding"),
    ("clusterroles", "ClusterRole"),
    ("clusterserviceversions", "ClusterServiceVersion"),
    ("configmaps", "ConfigMap"),
    ("cronjobs", "CronJob"),
    ("customresourcedefinitions", "CustomResourceDefinition"),
    ("daemonsets", "DaemonSet"),
    ("horizontalpodautoscalers", "HorizontalPodAutoscaler"),
    ("ingressclasses", "IngressClass"),
    ("ingresses", "Ingress"),
    ("installplans", "InstallPlan"),
    ("limitranges", "LimitRange"),
    ("networkpolicies", "NetworkPolicy"),
    ("operatorgroups", "OperatorGroup"),
    ("persistentvolumeclaims", "PersistentVolumeClaim"),
    ("persistentvolumes", "PersistentVolume"),
    ("poddisruptionbudgets", "PodDisruptionBudget"),
    ("replicasets", "ReplicaSet"),
    ("replicationcontrollers", "ReplicationController"),
    ("resourcequotas", "ResourceQuota"),
    ("rolebindings", "RoleBinding"),
    ("serviceaccounts", "ServiceAccount"),
    ("statefulsets", "StatefulSet"),
    ("storageclasses", "StorageClass"),
];

pub(super) fn seed() -> Scheme {
    let mut scheme = Scheme::empty();
    for &(plural, group, version, namespaced) in BUILTIN_RESOURCES {
        let kind = explicit_kind(plural).map_or_else(|| infer_kind(plural), str::to_string);
        scheme.insert(ResourceDescriptor {
            group: group.to_string(),
            version: version.to_string(),
            plural: plural.to_string(),
            kind,
            namespaced,
        });
    }
    scheme
}

fn explicit_kind(plural: &str) -> Option<&'static str> {
    EXPLICIT_KINDS
        .iter()
        .find(|(name, _)| *name == plural)
        .map(|&(_, kind)| kind)
}
