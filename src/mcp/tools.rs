//! Tool schemas for the MCP protocol.

use serde_json::{json, Value};

/// Get tool schemas for the `tools/list` response.
pub fn get_tool_schemas() -> Value {
    json!({
        "tools": [
            get_create_resource_schema(),
            get_update_resource_schema(),
            get_get_resources_schema(),
            get_get_resource_schema(),
            get_delete_resource_schema(),
        ]
    })
}

fn get_create_resource_schema() -> Value {
    json!({
        "name": "create_resource",
        "description": "Create a Kubernetes resource from a YAML manifest. The manifest is normalized to JSON before submission. Use the plural resource name (e.g. 'pods', 'deployments').",
        "inputSchema": {
            "type": "object",
            "properties": {
                "resource": {
                    "type": "string",
                    "description": "Plural resource name, e.g. 'pods' or 'deployments'"
                },
                "manifest_yaml": {
                    "type": "string",
                    "description": "Resource manifest in YAML"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace to create the resource in (ignored for cluster-scoped resources; defaults to the kubeconfig namespace)"
                }
            },
            "required": ["resource", "manifest_yaml"]
        }
    })
}

fn get_update_resource_schema() -> Value {
    json!({
        "name": "update_resource",
        "description": "Update an existing Kubernetes resource by applying a merge patch. Fields present in the patch replace the current values; array fields are replaced wholesale, not merged element-wise.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "resource": {
                    "type": "string",
                    "description": "Plural resource name, e.g. 'deployments'"
                },
                "name": {
                    "type": "string",
                    "description": "Name of the resource to update"
                },
                "patch": {
                    "type": ["object", "string"],
                    "description": "Merge patch, as a JSON object or a JSON-encoded string"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace of the resource (ignored for cluster-scoped resources)"
                }
            },
            "required": ["resource", "name", "patch"]
        }
    })
}

fn get_get_resources_schema() -> Value {
    json!({
        "name": "get_resources",
        "description": "List Kubernetes resources of one kind. Returns resource names, one per line.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "resource": {
                    "type": "string",
                    "description": "Plural resource name, e.g. 'pods'"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace to list in; omit to list across all namespaces"
                }
            },
            "required": ["resource"]
        }
    })
}

fn get_get_resource_schema() -> Value {
    json!({
        "name": "get_resource",
        "description": "Get a single Kubernetes resource by name.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "resource": {
                    "type": "string",
                    "description": "Plural resource name, e.g. 'pods'"
                },
                "name": {
                    "type": "string",
                    "description": "Name of the resource to get"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace of the resource (ignored for cluster-scoped resources)"
                }
            },
            "required": ["resource", "name"]
        }
    })
}

fn get_delete_resource_schema() -> Value {
    json!({
        "name": "delete_resource",
        "description": "Delete a Kubernetes resource by name.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "resource": {
                    "type": "string",
                    "description": "Plural resource name, e.g. 'pods'"
                },
                "name": {
                    "type": "string",
                    "description": "Name of the resource to delete"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace of the resource (ignored for cluster-scoped resources)"
                }
            },
            "required": ["resource", "name"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_tools_exposed() {
        let schemas = get_tool_schemas();
        let tools = schemas["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 5);

        let names: Vec<&str> = tools
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "create_resource",
                "update_resource",
                "get_resources",
                "get_resource",
                "delete_resource"
            ]
        );
    }

    #[test]
    fn test_required_fields_marked() {
        let schemas = get_tool_schemas();
        for tool in schemas["tools"].as_array().unwrap() {
            let required = tool["inputSchema"]["required"].as_array().unwrap();
            assert!(
                required.iter().any(|field| field == "resource"),
                "{} must require 'resource'",
                tool["name"]
            );
        }
    }
}
