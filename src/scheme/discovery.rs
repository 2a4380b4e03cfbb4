//! Live API resource discovery.
//!
//! Builds the authoritative scheme by running `kubectl api-resources`
//! against the configured cluster once at startup, overlaying the builtin
//! table. Parsing is split out as a pure function so it is testable without
//! a cluster.

use std::collections::HashMap;
use std::process::Command;

use tracing::{debug, warn};

use crate::config::KubernetesConfig;
use crate::errors::{ServerError, ServerResult};

use super::{ResourceDescriptor, Scheme};

/// Discover the API resources available on the cluster.
///
/// Invocation failure (kubectl missing, non-zero exit) is an error: the
/// server cannot resolve any tool call without a scheme, so callers treat
/// this as fatal at startup.
pub fn discover(config: &KubernetesConfig) -> ServerResult<Scheme> {
    let mut command = Command::new("kubectl");
    command.arg("api-resources").arg("--no-headers=true");
    if let Some(path) = &config.kubeconfig {
        command.arg(format!("--kubeconfig={}", path.display()));
    }
    if let Some(context) = &config.context {
        command.arg(format!("--context={context}"));
    }

    let output = command.output().map_err(|e| ServerError::Discovery {
        reason: format!("failed to run kubectl api-resources: {e}"),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ServerError::Discovery {
            reason: format!("kubectl api-resources failed: {}", stderr.trim()),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_api_resources(&stdout))
}

/// Build a scheme from `kubectl api-resources --no-headers` output, seeded
/// with the builtin table. Discovered entries win over builtin ones; within
/// the output, a later line wins on duplicate plural names (e.g. `events` in
/// both `v1` and `events.k8s.io/v1`).
pub fn parse_api_resources(output: &str) -> Scheme {
    let mut discovered: HashMap<String, ResourceDescriptor> = HashMap::new();
    for line in output.lines() {
        if let Some(descriptor) = parse_line(line) {
            if let Some(previous) = discovered.insert(descriptor.plural.clone(), descriptor) {
                debug!(
                    plural = %previous.plural,
                    dropped = %previous.api_version(),
                    "Duplicate plural resource name in discovery output; later entry wins"
                );
            }
        }
    }

    let mut scheme = Scheme::builtin();
    for descriptor in discovered.into_values() {
        scheme.insert(descriptor);
    }
    scheme
}

/// Parse one `kubectl api-resources` line.
///
/// Columns are `NAME [SHORTNAMES] APIVERSION NAMESPACED KIND`; the shortnames
/// column comes and goes with kubectl versions and per resource, so the last
/// three fields are indexed from the end. Blank lines are ignored; lines with
/// fewer than four fields are malformed and skipped with a diagnostic.
fn parse_line(line: &str) -> Option<ResourceDescriptor> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return None;
    }
    if fields.len() < 4 {
        warn!(line, "Skipping malformed api-resources line");
        return None;
    }

    let kind = fields[fields.len() - 1];
    let namespaced = fields[fields.len() - 2] == "true";
    let api_version = fields[fields.len() - 3];
    let plural = fields[0];

    let (group, version) = ResourceDescriptor::split_api_version(api_version);
    Some(ResourceDescriptor {
        group,
        version,
        plural: plural.to_string(),
        kind: kind.to_string(),
        namespaced,
    })
}
