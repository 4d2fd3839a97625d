//! 令牌存储与声明解码
//!
//! 令牌只有一份，存放在一个固定的键下。声明直接从 JWT 载荷段解码，
//! 不校验签名，只能用于界面裁剪。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use taskflow_shared::{Claims, Token};

/// 持久化令牌的读写契约
///
/// 浏览器实现基于 `localStorage`；测试使用 [`MemoryTokenStore`]。
pub trait TokenStore {
    fn load(&self) -> Option<Token>;
    /// 覆盖任何已有的值
    fn persist(&self, token: &Token);
    /// 幂等
    fn clear(&self);
}

impl<T: TokenStore + ?Sized> TokenStore for Rc<T> {
    fn load(&self) -> Option<Token> {
        (**self).load()
    }
    fn persist(&self, token: &Token) {
        (**self).persist(token)
    }
    fn clear(&self) {
        (**self).clear()
    }
}

/// 进程内令牌存储
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RefCell<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: RefCell::new(Some(Token(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<Token> {
        self.slot.borrow().clone()
    }

    fn persist(&self, token: &Token) {
        *self.slot.borrow_mut() = Some(token.clone());
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

/// 解码 JWT 的载荷段
///
/// 格式不对时记录警告并返回 `None`，调用方把它当作未登录。
pub fn decode_claims(token: &Token) -> Option<Claims> {
    let payload = match token.as_str().split('.').nth(1) {
        Some(segment) if !segment.is_empty() => segment.trim_end_matches('='),
        _ => {
            log::warn!("Token is not a JWT: missing payload segment");
            return None;
        }
    };

    let bytes = match URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Token payload is not valid base64url: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(json @ Value::Object(_)) => Some(Claims::from_json(&json)),
        Ok(_) => {
            log::warn!("Token payload is not a JSON object");
            None
        }
        Err(e) => {
            log::warn!("Token payload is not valid JSON: {}", e);
            None
        }
    }
}

/// 当前登录用户；没有令牌或令牌无法解码时为 `None`
pub fn current_user<S: TokenStore + ?Sized>(store: &S) -> Option<Claims> {
    store.load().as_ref().and_then(decode_claims)
}

/// 测试辅助：构造一个未签名的 JWT
#[cfg(test)]
pub(crate) fn fake_jwt(claims: serde_json::Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("eyJhbGciOiJIUzI1NiJ9.{}.signature", payload)
}
