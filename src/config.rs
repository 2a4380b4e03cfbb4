//! Server configuration.
//!
//! Loaded from a TOML file (`[mcp]`, `[kubernetes]`, `[llm]` sections) and
//! passed down explicitly through constructors; no component reads a global.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{ServerError, ServerResult};

/// Top-level configuration for the MCP server process.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub kubernetes: KubernetesConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// MCP protocol settings.
#[derive(Debug, Clone, Deserialize)]
pub struct McpConfig {
    /// Server name reported in the `initialize` response.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Log level directive for stderr output (e.g. "info", "kube_mcp=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            log_level: default_log_level(),
        }
    }
}

/// Cluster connection settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KubernetesConfig {
    /// Path to the kubeconfig file. When unset, the standard environment
    /// defaults apply (`KUBECONFIG`, `~/.kube/config`, in-cluster).
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use; defaults to the file's current context.
    #[serde(default)]
    pub context: Option<String>,
}

/// Chat backend settings for manifest transformation.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Backend provider: "anthropic" or "openai".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model name passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Endpoint override, e.g. for an OpenAI-compatible gateway.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            temperature: None,
        }
    }
}

fn default_server_name() -> String {
    "kube-mcp".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

impl ServerConfig {
    /// Load configuration from `KUBE_MCP_CONFIG`, then `kube-mcp.toml` in the
    /// current or parent directory. No file at all yields the defaults.
    pub fn load() -> ServerResult<Self> {
        if let Ok(path) = std::env::var("KUBE_MCP_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        for candidate in ["kube-mcp.toml", "../kube-mcp.toml"] {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ServerError::Config {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| ServerError::Config {
            reason: format!("failed to parse {}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.mcp.name, "kube-mcp");
        assert_eq!(config.mcp.log_level, "info");
        assert_eq!(config.llm.provider, "anthropic");
        assert!(config.kubernetes.kubeconfig.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [mcp]
            name = "cluster-tools"
            log_level = "debug"

            [kubernetes]
            kubeconfig = "/home/dev/.kube/config"
            context = "staging"

            [llm]
            provider = "openai"
            model = "gpt-4o-mini"
            base_url = "http://localhost:11434/v1"
            temperature = 0.0
        "#;
        let config: ServerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.mcp.name, "cluster-tools");
        assert_eq!(
            config.kubernetes.kubeconfig.as_deref(),
            Some(Path::new("/home/dev/.kube/config"))
        );
        assert_eq!(config.kubernetes.context.as_deref(), Some("staging"));
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(
            config.llm.base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert_eq!(config.llm.temperature, Some(0.0));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"
            [kubernetes]
            kubeconfig = "/etc/kube/config"
        "#;
        let config: ServerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.mcp.name, "kube-mcp");
        assert_eq!(config.llm.provider, "anthropic");
        assert!(config.kubernetes.context.is_none());
    }
}
