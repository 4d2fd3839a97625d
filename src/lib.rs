//! TaskFlow 客户端层
//!
//! 与平台无关：通过 [`request::HttpClient`] 与 [`token::TokenStore`] 两个特性
//! 接入浏览器（或测试中的模拟实现）。
//!
//! 数据流：页面 -> 视图模型 -> 实体服务 -> `ApiClient` -> 后端。

pub mod api;
pub mod config;
pub mod error;
pub mod request;
pub mod services;
pub mod token;
pub mod viewmodels;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientErrorStatus, ClientResult};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use token::{MemoryTokenStore, TokenStore, current_user, decode_claims};
