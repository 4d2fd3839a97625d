//! 浏览器 HTTP 传输
//!
//! 用 `gloo-net` 的 fetch 封装实现客户端层的 [`HttpClient`] 特性。

use gloo_net::http::{Request, RequestBuilder};
use taskflow::{ClientError, ClientResult, HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// 基于 `window.fetch` 的 HTTP 客户端
///
/// 无状态，可以随用随建。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHttpClient;

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder = builder(req.method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ClientError::network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
