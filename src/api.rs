use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest};
use crate::token::{self, TokenStore};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;
use taskflow_shared::{
    CONTENT_TYPE_JSON, Claims, Envelope, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, Resource,
};

// =========================================================
// REST 客户端 (ApiClient)
// =========================================================

/// 面向后端 REST API 的客户端
///
/// 通过泛型接受任何 `HttpClient` 与 `TokenStore`，从而与浏览器解耦。
/// 每次请求都重新读取令牌，不在内存里缓存。
pub struct ApiClient<C, S> {
    http: C,
    tokens: S,
    config: Rc<ClientConfig>,
}

impl<C: Clone, S: Clone> Clone for ApiClient<C, S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: HttpClient, S: TokenStore> ApiClient<C, S> {
    pub fn new(http: C, tokens: S, config: ClientConfig) -> Self {
        Self {
            http,
            tokens,
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// 当前令牌中的声明
    pub fn current_user(&self) -> Option<Claims> {
        token::current_user(&self.tokens)
    }

    // --- Verbs ---

    async fn execute(&self, method: HttpMethod, path: &str, body: Option<Value>) -> ClientResult<Value> {
        let bearer = self
            .tokens
            .load()
            .map(|t| t.0)
            .unwrap_or_default();

        let mut req = HttpRequest::new(&self.config.url(path), method)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", bearer));
        if let Some(body) = body {
            req = req.with_body(body);
        }

        let resp = self
            .http
            .send(req)
            .await
            .map_err(|e| e.in_op_with(format!("api.{}", method.as_str()), path))?;

        if !resp.is_success() {
            log::error!("{} {} failed with status {}", method.as_str(), path, resp.status);
            return Err(ClientError::http(resp.status).in_op_with(format!("api.{}", method.as_str()), path));
        }

        resp.json::<Value>()
            .map_err(|e| e.in_op_with(format!("api.{}", method.as_str()), path))
    }

    pub async fn get(&self, path: &str) -> ClientResult<Value> {
        self.execute(HttpMethod::Get, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.execute(HttpMethod::Post, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.execute(HttpMethod::Put, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(HttpMethod::Delete, path, None).await.map(|_| ())
    }

    // --- Generic resource operations ---

    fn envelope<M: Resource>(&self, path: &str) -> Envelope {
        self.config.envelope_for(path, M::ENVELOPE)
    }

    /// GET 集合路径并映射为模型
    pub async fn list<M: Resource>(&self) -> ClientResult<Vec<M>> {
        self.list_at::<M>(M::PATH).await
    }

    /// 以资源的映射规则读取任意列表路径，如 `tasks/area`
    pub async fn list_at<M: Resource>(&self, path: &str) -> ClientResult<Vec<M>> {
        let body = self.get(path).await?;
        let items = self.envelope::<M>(path).unwrap_list(body).ok_or_else(|| {
            ClientError::decode(format!("Unexpected collection shape at {}", path))
                .in_op_with("api.list", path)
        })?;
        Ok(items.iter().map(M::from_json).collect())
    }

    /// `None` 表示后端没有返回内容
    pub async fn get_by_id<M: Resource>(&self, id: &str) -> ClientResult<Option<M>> {
        let path = format!("{}/{}", M::PATH, id);
        self.get_one_at::<M>(&path).await
    }

    pub async fn get_one_at<M: Resource>(&self, path: &str) -> ClientResult<Option<M>> {
        let body = self.get(path).await?;
        Ok(self
            .envelope::<M>(M::PATH)
            .unwrap_one(body)
            .map(|json| M::from_json(&json)))
    }

    pub async fn create<M: Resource>(&self, model: &M) -> ClientResult<Option<M>> {
        let body = self.post(M::PATH, &model.to_dto()).await?;
        Ok(self
            .envelope::<M>(M::PATH)
            .unwrap_one(body)
            .map(|json| M::from_json(&json)))
    }

    pub async fn update<M: Resource>(&self, id: &str, model: &M) -> ClientResult<Option<M>> {
        let path = format!("{}/{}", M::PATH, id);
        let body = self.put(&path, &model.to_dto()).await?;
        Ok(self
            .envelope::<M>(M::PATH)
            .unwrap_one(body)
            .map(|json| M::from_json(&json)))
    }

    pub async fn remove<M: Resource>(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("{}/{}", M::PATH, id)).await
    }
}
