//! 登录/注册与路由守卫
//!
//! 租户区域从主机名解析出来，随凭据一起提交；注册只在租户子域名上开放。

use crate::api::ApiClient;
use crate::error::{ClientError, ClientErrorStatus, ClientResult};
use crate::request::HttpClient;
use crate::services::{Credentials, Registration};
use crate::token::TokenStore;
use taskflow_shared::{AppRoute, Claims, DomainInfo, Token};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// 登录页表单
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl LoginForm {
    /// 发请求之前的本地校验
    pub fn validate(&self) -> ClientResult<()> {
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::invalid_input(
                "La contraseña debe tener al menos 6 caracteres.",
            ));
        }
        if self.email.trim().is_empty() {
            return Err(ClientError::invalid_input(
                "El email y la contraseña son obligatorios.",
            ));
        }
        if self.mode == AuthMode::SignUp
            && (self.name.trim().is_empty() || self.password != self.confirm_password)
        {
            return Err(ClientError::invalid_input(
                "Nombre es obligatorio y las contraseñas no coinciden.",
            ));
        }
        Ok(())
    }
}

/// 登录失败时展示给用户的文本
///
/// 校验错误给出具体原因，其余一律显示通用的凭据提示。
pub fn login_error_message(err: &ClientError) -> String {
    match err.status {
        ClientErrorStatus::InvalidInput => err.message().to_string(),
        _ => ClientError::invalid_credentials().message().to_string(),
    }
}

/// 路由守卫：返回需要跳转的目标
///
/// 受保护的路由要求存在可解码的令牌；已登录用户访问登录页会被送到首页。
pub fn guard(route: AppRoute, user: Option<&Claims>) -> Option<AppRoute> {
    match user {
        None if route.requires_auth() => Some(AppRoute::auth_failure_redirect()),
        Some(_) if route.should_redirect_when_authenticated() => {
            Some(AppRoute::auth_success_redirect())
        }
        _ => None,
    }
}

pub struct SessionViewModel<C, S> {
    api: ApiClient<C, S>,
    domain: DomainInfo,
}

impl<C: HttpClient, S: TokenStore> SessionViewModel<C, S> {
    pub fn new(api: ApiClient<C, S>, domain: DomainInfo) -> Self {
        Self { api, domain }
    }

    pub fn domain(&self) -> &DomainInfo {
        &self.domain
    }

    /// 主域名不开放注册
    pub fn allow_register(&self) -> bool {
        !self.domain.is_main_domain
    }

    pub fn current_user(&self) -> Option<Claims> {
        self.api.current_user()
    }

    /// 校验、提交并保存令牌
    pub async fn submit(&self, form: &LoginForm) -> ClientResult<Token> {
        form.validate()?;
        let area_id = self.domain.area_id.clone().unwrap_or_default();
        let auth = self.api.auth();

        let result = match form.mode {
            AuthMode::SignIn => {
                auth.sign_in(&Credentials {
                    email: form.email.trim().to_string(),
                    password: form.password.clone(),
                    area_id,
                })
                .await
            }
            AuthMode::SignUp if !self.allow_register() => Err(ClientError::invalid_input(
                "El registro no está disponible en este dominio",
            )),
            AuthMode::SignUp => {
                auth.sign_up(&Registration {
                    name: form.name.trim().to_string(),
                    email: form.email.trim().to_string(),
                    password: form.password.clone(),
                    area_id,
                })
                .await
            }
        };

        match &result {
            Ok(_) => log::info!("Authenticated on area {:?}", self.domain.area_id),
            Err(e) => log::warn!("Authentication failed: {}", e),
        }
        result
    }

    pub fn sign_out(&self) {
        self.api.auth().sign_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::token::{MemoryTokenStore, fake_jwt};
    use crate::viewmodels::tasks::TasksViewModel;
    use serde_json::json;
    use std::rc::Rc;
    use taskflow_shared::DomainResolver;
    use taskflow_shared::permission::MANAGER_ROLE_ID;

    const NANDAIME_AREA: &str = "8a1b6a7e-4d5c-4f1a-9f23-3a8c5e6b7d41";

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
            ..LoginForm::default()
        }
    }

    #[test]
    fn validation_rules() {
        assert!(form("a@b.c", "12345").validate().is_err());
        assert!(form("", "123456").validate().is_err());
        assert!(form("a@b.c", "123456").validate().is_ok());

        let mut sign_up = form("a@b.c", "123456");
        sign_up.mode = AuthMode::SignUp;
        sign_up.name = "Ana".into();
        sign_up.confirm_password = "1234567".into();
        assert_eq!(
            sign_up.validate().unwrap_err().message(),
            "Nombre es obligatorio y las contraseñas no coinciden."
        );
        sign_up.confirm_password = "123456".into();
        assert!(sign_up.validate().is_ok());
    }

    #[test]
    fn guard_redirects() {
        let claims = Claims::default();
        assert_eq!(guard(AppRoute::Tasks, None), Some(AppRoute::Login));
        assert_eq!(guard(AppRoute::Login, None), None);
        assert_eq!(guard(AppRoute::NotFound, None), None);
        assert_eq!(guard(AppRoute::Login, Some(&claims)), Some(AppRoute::Dashboard));
        assert_eq!(guard(AppRoute::Logs, Some(&claims)), None);
    }

    #[test]
    fn error_messages() {
        let input = ClientError::invalid_input("La contraseña debe tener al menos 6 caracteres.");
        assert_eq!(login_error_message(&input), input.message());
        assert_eq!(
            login_error_message(&ClientError::network("offline")),
            "Los credenciales no son validos en esta sucursal"
        );
    }

    #[tokio::test]
    async fn tenant_login_then_tasks_by_area() {
        let http = Rc::new(MockHttpClient::new());
        let store = Rc::new(MemoryTokenStore::new());
        let api = ApiClient::new(http.clone(), store.clone(), ClientConfig::new("http://api.test"));

        let domain = DomainResolver::default().resolve(Some("nandaime.example"));
        assert_eq!(domain.area_id.as_deref(), Some(NANDAIME_AREA));
        assert!(!domain.is_main_domain);

        let jwt = fake_jwt(json!({ "id": "u1", "areaId": NANDAIME_AREA, "roleId": MANAGER_ROLE_ID }));
        http.mock_response(HttpMethod::Post, "http://api.test/auth/login", 200, json!({ "token": jwt }));
        http.mock_response(HttpMethod::Get, "http://api.test/tasks/area", 200, json!([]));
        http.mock_response(HttpMethod::Get, "http://api.test/users", 200, json!({ "data": [] }));
        http.mock_response(HttpMethod::Get, "http://api.test/areas", 200, json!([]));

        let session = SessionViewModel::new(api.clone(), domain.clone());
        session.submit(&form("ana@x.com", "secreto1")).await.unwrap();

        let body: serde_json::Value =
            serde_json::from_str(http.requests.borrow()[0].3.as_deref().unwrap()).unwrap();
        assert_eq!(body["areaId"], NANDAIME_AREA);
        assert_eq!(store.load(), Some(Token(jwt)));
        assert_eq!(session.current_user().unwrap().id, "u1");

        let mut tasks = TasksViewModel::new(api, domain);
        tasks.load().await;
        let calls = http.calls();
        assert!(calls.contains(&"GET http://api.test/tasks/area".to_string()));
        assert!(!calls.contains(&"GET http://api.test/tasks".to_string()));
    }

    #[tokio::test]
    async fn main_domain_cannot_register() {
        let http = Rc::new(MockHttpClient::new());
        let api = ApiClient::new(
            http.clone(),
            Rc::new(MemoryTokenStore::new()),
            ClientConfig::new("http://api.test"),
        );
        let domain = DomainResolver::default().resolve(Some("www.evolutionsystem.sbs"));
        let session = SessionViewModel::new(api, domain);
        assert!(!session.allow_register());

        let mut sign_up = form("a@b.c", "123456");
        sign_up.mode = AuthMode::SignUp;
        sign_up.name = "Ana".into();
        sign_up.confirm_password = "123456".into();

        let err = session.submit(&sign_up).await.unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::InvalidInput);
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let http = Rc::new(MockHttpClient::new());
        let api = ApiClient::new(
            http.clone(),
            Rc::new(MemoryTokenStore::new()),
            ClientConfig::new("http://api.test"),
        );
        let session = SessionViewModel::new(api, DomainInfo::default());

        assert!(session.submit(&form("a@b.c", "123")).await.is_err());
        assert!(http.calls().is_empty());
    }
}
