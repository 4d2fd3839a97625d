//! LocalStorage 令牌存储与主机名读取

use taskflow::TokenStore;
use taskflow_shared::{STORAGE_TOKEN_KEY, Token};

/// 把令牌保存在 `localStorage` 的固定键下
///
/// 令牌以原始字符串保存（不经过 JSON 编码），与其它读取该键的脚本保持兼容。
/// 隐私模式或沙箱 iframe 中拿不到 `localStorage` 时，所有操作退化为空操作，
/// 表现为没有保存的令牌。
#[derive(Debug, Clone)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl Default for LocalStorageTokenStore {
    fn default() -> Self {
        Self::new(STORAGE_TOKEN_KEY)
    }
}

impl LocalStorageTokenStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<Token> {
        Self::storage()?
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|raw| !raw.is_empty())
            .map(Token)
    }

    fn persist(&self, token: &Token) {
        let saved = Self::storage().is_some_and(|s| s.set_item(&self.key, token.as_str()).is_ok());
        if !saved {
            log::warn!("Could not persist token under {}", self.key);
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// 当前页面的主机名；拿不到 window 时为 `None`
pub fn hostname() -> Option<String> {
    web_sys::window()?.location().hostname().ok()
}
