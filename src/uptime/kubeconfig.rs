//! Minimal kubeconfig model
//!
//! Only the fields needed to find the control-plane server of the current
//! context are deserialized; everything else in the file is ignored.

use super::UptimeError;
use serde::Deserialize;
use std::path::Path;
use url::{Host, Url};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Kubeconfig {
    #[serde(rename = "current-context", default)]
    pub current_context: String,
    #[serde(default)]
    pub contexts: Vec<NamedContext>,
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedContext {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub context: ContextInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextInfo {
    #[serde(default)]
    pub cluster: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedCluster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster: ClusterInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub server: String,
}

impl Kubeconfig {
    /// Read and parse a kubeconfig file
    pub async fn from_file(path: &Path) -> Result<Self, UptimeError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| UptimeError::KubeconfigRead {
                    path: path.display().to_string(),
                    source,
                })?;
        content.parse()
    }

    /// Server URL of the cluster referenced by the current context
    pub fn server(&self) -> Result<&str, UptimeError> {
        if self.current_context.is_empty() {
            return Err(UptimeError::EmptyCurrentContext);
        }
        if self.contexts.is_empty() {
            return Err(UptimeError::NoContexts);
        }
        if self.clusters.is_empty() {
            return Err(UptimeError::NoClusters);
        }

        let context = self
            .contexts
            .iter()
            .find(|ctx| ctx.name == self.current_context)
            .ok_or_else(|| UptimeError::ContextNotFound(self.current_context.clone()))?;

        let cluster_name = &context.context.cluster;
        self.clusters
            .iter()
            .find(|cluster| &cluster.name == cluster_name)
            .map(|cluster| cluster.cluster.server.as_str())
            .filter(|server| !server.is_empty())
            .ok_or_else(|| UptimeError::ClusterNotFound(cluster_name.clone()))
    }
}

impl std::str::FromStr for Kubeconfig {
    type Err = UptimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s).map_err(UptimeError::KubeconfigParse)
    }
}

/// Extract the host name from a `scheme://host:port` server address
///
/// IPv6 literals are returned without brackets so they can be used as an
/// ssh destination.
pub fn host_from_server(server: &str) -> Result<String, UptimeError> {
    let malformed = || UptimeError::MalformedServer(server.to_string());
    let url = Url::parse(server).map_err(|_| malformed())?;
    match url.host() {
        Some(Host::Domain(name)) if !name.is_empty() => Ok(name.to_string()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        _ => Err(malformed()),
    }
}
