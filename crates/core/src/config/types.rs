use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::relocation::CommitPolicy;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retriever: RetrieverConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub relocator: RelocatorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Available retrieval backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetrieverBackend {
    /// Plain HTTP GET
    #[default]
    Http,
    /// In-process stub, echoes the URL back as content
    Stub,
}

/// Retriever configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrieverConfig {
    #[serde(default)]
    pub backend: RetrieverBackend,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            backend: RetrieverBackend::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("relocator/{}", env!("CARGO_PKG_VERSION"))
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Imgur,
    /// In-process stub, appends "/uploaded" to the content
    Stub,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Imgur-specific configuration (required when backend = "imgur")
    #[serde(default)]
    pub imgur: Option<ImgurConfig>,
}

/// Imgur storage backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImgurConfig {
    /// Application client id, sent as `Authorization: Client-ID <id>`
    pub client_id: String,
    /// Image upload endpoint
    #[serde(default = "default_imgur_upload_url")]
    pub upload_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl ImgurConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            upload_url: default_imgur_upload_url(),
            timeout_secs: default_timeout(),
        }
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn default_imgur_upload_url() -> String {
    "https://api.imgur.com/3/image".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Relocator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelocatorConfig {
    /// What to do when a relocation is committed twice
    #[serde(default)]
    pub commit_policy: CommitPolicy,
    /// How long shutdown waits for in-flight jobs (default: 30)
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

impl Default for RelocatorConfig {
    fn default() -> Self {
        Self {
            commit_policy: CommitPolicy::default(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

impl RelocatorConfig {
    pub fn with_commit_policy(mut self, commit_policy: CommitPolicy) -> Self {
        self.commit_policy = commit_policy;
        self
    }
}

fn default_shutdown_grace() -> u64 {
    30
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub retriever: RetrieverConfig,
    pub storage: SanitizedStorageConfig,
    pub relocator: RelocatorConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub backend: StorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imgur: Option<SanitizedImgurConfig>,
}

/// Sanitized Imgur config (client id hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedImgurConfig {
    pub upload_url: String,
    pub client_id_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            retriever: config.retriever.clone(),
            storage: SanitizedStorageConfig {
                backend: config.storage.backend,
                imgur: config.storage.imgur.as_ref().map(|i| SanitizedImgurConfig {
                    upload_url: i.upload_url.clone(),
                    client_id_configured: !i.client_id.is_empty(),
                    timeout_secs: i.timeout_secs,
                }),
            },
            relocator: config.relocator.clone(),
        }
    }
}
