use serde::{Deserialize, Serialize};

pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// HTTP entry stack configuration, read from `modules.api_ingress`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Mount point of the API router. Empty or `/` mounts it at the root.
    pub api_prefix: String,
    /// Directory served for every path no route claims.
    pub static_dir: String,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
    /// 0 disables the per-request timeout.
    pub request_timeout_sec: u64,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            cors_enabled: true,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
        }
    }
}

impl ApiIngressConfig {
    /// Prefix as axum expects it for `nest`: leading slash, no trailing one.
    /// `None` when the API belongs at the root.
    pub fn normalized_prefix(&self) -> Option<String> {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{trimmed}"))
        }
    }
}
