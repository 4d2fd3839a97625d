use crate::api::ApiClient;
use crate::error::{ClientError, ClientErrorStatus, ClientResult};
use crate::request::HttpClient;
use crate::token::TokenStore;
use serde::Serialize;
use taskflow_shared::Token;

pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";

/// 登录请求体；租户区域随凭据一起发送，账号按租户隔离
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub area_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub area_id: String,
}

/// 登录、注册与登出
///
/// 成功时令牌会被写入存储，调用方不需要再手动保存。
pub struct AuthService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: TokenStore> AuthService<'a, C, S> {
    pub fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> ClientResult<Token> {
        let result = self.api.post(LOGIN_PATH, credentials).await;
        self.accept(result).map_err(|e| e.in_op("auth.sign_in"))
    }

    pub async fn sign_up(&self, registration: &Registration) -> ClientResult<Token> {
        let missing = [
            &registration.name,
            &registration.email,
            &registration.password,
            &registration.area_id,
        ]
        .iter()
        .any(|field| field.trim().is_empty());
        if missing {
            return Err(ClientError::invalid_input(
                "Nombre, email, contraseña y área son obligatorios",
            )
            .in_op("auth.sign_up"));
        }

        let result = self.api.post(REGISTER_PATH, registration).await;
        self.accept(result).map_err(|e| e.in_op("auth.sign_up"))
    }

    /// 清除令牌；可重复调用
    pub fn sign_out(&self) {
        self.api.tokens().clear();
        log::info!("Signed out");
    }

    /// 后端拒绝或响应里没有令牌都视为凭据无效；传输层失败原样保留
    fn accept(&self, result: ClientResult<serde_json::Value>) -> ClientResult<Token> {
        let body = match result {
            Ok(body) => body,
            Err(e) if matches!(e.status, ClientErrorStatus::Http(_)) => {
                log::warn!("Authentication rejected: {}", e);
                return Err(ClientError::invalid_credentials());
            }
            Err(e) => return Err(e),
        };

        let token = Token::from_json(&body).ok_or_else(|| {
            log::warn!("Authentication response carried no token");
            ClientError::invalid_credentials()
        })?;

        self.api.tokens().persist(&token);
        log::info!("Token persisted");
        Ok(token)
    }
}
