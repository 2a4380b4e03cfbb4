//! End-to-end scheme construction from captured `kubectl api-resources`
//! output, through the public API.

use kube_mcp::scheme::{infer_kind, parse_api_resources, ResourceDescriptor, Scheme};

/// Captured from a real cluster: shortnames present on some lines and absent
/// on others, core and named groups, cluster- and namespace-scoped kinds,
/// and the `events` duplicate.
const SAMPLE_OUTPUT: &str = "\
bindings                                       v1                                true         Binding
componentstatuses                 cs           v1                                false        ComponentStatus
configmaps                        cm           v1                                true         ConfigMap
endpoints                         ep           v1                                true         Endpoints
events                            ev           v1                                true         Event
namespaces                        ns           v1                                false        Namespace
nodes                             no           v1                                false        Node
pods                              po           v1                                true         Pod
secrets                                        v1                                true         Secret
services                          svc          v1                                true         Service
customresourcedefinitions         crd,crds     apiextensions.k8s.io/v1           false        CustomResourceDefinition
daemonsets                        ds           apps/v1                           true         DaemonSet
deployments                       deploy       apps/v1                           true         Deployment
replicasets                       rs           apps/v1                           true         ReplicaSet
statefulsets                      sts          apps/v1                           true         StatefulSet
cronjobs                          cj           batch/v1                          true         CronJob
jobs                                           batch/v1                          true         Job
certificaterequests               cr,crs       cert-manager.io/v1                true         CertificateRequest
certificates                      cert,certs   cert-manager.io/v1                true         Certificate
clusterissuers                                 cert-manager.io/v1                false        ClusterIssuer
issuers                                        cert-manager.io/v1                true         Issuer
events                            ev           events.k8s.io/v1                  true         Event
ingresses                         ing          networking.k8s.io/v1              true         Ingress
networkpolicies                   netpol       networking.k8s.io/v1              true         NetworkPolicy
clusterrolebindings                            rbac.authorization.k8s.io/v1      false        ClusterRoleBinding
clusterroles                                   rbac.authorization.k8s.io/v1      false        ClusterRole
rolebindings                                   rbac.authorization.k8s.io/v1      true         RoleBinding
roles                                          rbac.authorization.k8s.io/v1      true         Role
";

#[test]
fn builds_scheme_from_live_output() {
    let scheme = parse_api_resources(SAMPLE_OUTPUT);

    let pods = scheme.lookup("pods").unwrap();
    assert_eq!(pods.kind, "Pod");
    assert_eq!(pods.api_version(), "v1");
    assert!(pods.namespaced);

    let deployments = scheme.lookup("deployments").unwrap();
    assert_eq!(deployments.group, "apps");
    assert_eq!(deployments.version, "v1");
    assert_eq!(deployments.resource_path(), "apps/v1/deployments");

    let crds = scheme.lookup("customresourcedefinitions").unwrap();
    assert!(!crds.namespaced);
    assert_eq!(crds.api_version(), "apiextensions.k8s.io/v1");
}

#[test]
fn shortnames_column_does_not_shift_parsing() {
    let scheme = parse_api_resources(SAMPLE_OUTPUT);

    // `secrets` has no shortnames, `configmaps` does; both must parse to the
    // same shape of descriptor.
    let secrets = scheme.lookup("secrets").unwrap();
    assert_eq!(secrets.kind, "Secret");
    assert!(secrets.namespaced);

    let configmaps = scheme.lookup("configmaps").unwrap();
    assert_eq!(configmaps.kind, "ConfigMap");
    assert!(configmaps.namespaced);
}

#[test]
fn duplicate_events_resolves_to_later_group() {
    let scheme = parse_api_resources(SAMPLE_OUTPUT);
    let events = scheme.lookup("events").unwrap();
    assert_eq!(events.api_version(), "events.k8s.io/v1");
}

#[test]
fn discovered_kind_wins_over_inference() {
    let scheme = parse_api_resources(SAMPLE_OUTPUT);

    // `bindings` is not in the builtin table; its kind comes from the output,
    // not from the suffix heuristic.
    let bindings = scheme.lookup("bindings").unwrap();
    assert_eq!(bindings.kind, "Binding");

    // The heuristic agrees here, but the authoritative answer is discovery's.
    assert_eq!(infer_kind("bindings"), "Binding");
}

#[test]
fn builtin_scheme_round_trips_resource_paths() {
    let scheme = Scheme::builtin();
    for descriptor in scheme.descriptors() {
        if descriptor.group.is_empty() {
            continue;
        }
        let path = descriptor.resource_path();
        let mut parts = path.splitn(3, '/');
        let (group, version) = ResourceDescriptor::split_api_version(&format!(
            "{}/{}",
            parts.next().unwrap(),
            parts.next().unwrap()
        ));
        assert_eq!(group, descriptor.group);
        assert_eq!(version, descriptor.version);
        assert_eq!(parts.next().unwrap(), descriptor.plural);
    }
}
