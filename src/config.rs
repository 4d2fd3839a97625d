use std::collections::HashMap;
use taskflow_shared::{Envelope, STORAGE_TOKEN_KEY};

// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 构建时没有注入 `TASKFLOW_API_URL` 时使用的默认后端地址
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// 客户端配置
///
/// 后端对列表信封并不统一，按路径记录的覆盖项优先于资源自身声明的默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    envelopes: HashMap<String, Envelope>,
    pub token_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            envelopes: HashMap::new(),
            token_key: STORAGE_TOKEN_KEY.to_string(),
        }
    }

    /// 读取构建时注入的 `TASKFLOW_API_URL`，读不到就用默认值
    pub fn from_env() -> Self {
        match option_env!("TASKFLOW_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 覆盖某个路径的响应信封
    pub fn with_envelope(mut self, path: &str, envelope: Envelope) -> Self {
        self.envelopes
            .insert(path.trim_matches('/').to_string(), envelope);
        self
    }

    /// `{base_url}/{path}`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn envelope_for(&self, path: &str, default: Envelope) -> Envelope {
        self.envelopes
            .get(path.trim_matches('/'))
            .copied()
            .unwrap_or(default)
    }
}
