use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::LogEntry;

/// 系统账号的用户 ID 与它在日志中的展示名
pub const SYSTEM_USER_ID: &str = "d976b2d4b8494815";
pub const SYSTEM_USER_LABEL: &str = "Admin General";

/// 只读的审计日志服务
pub struct LogService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: TokenStore> LogService<'a, C, S> {
    pub fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    pub async fn list_all(&self) -> ClientResult<Vec<LogEntry>> {
        let logs = self
            .api
            .list::<LogEntry>()
            .await
            .map_err(|e| e.in_op("logs.list_all"))?;
        Ok(present(logs))
    }

    pub async fn list_by_area(&self, area_id: &str) -> ClientResult<Vec<LogEntry>> {
        let logs = self
            .api
            .list_at::<LogEntry>(&format!("logs/area/{}", area_id))
            .await
            .map_err(|e| e.in_op_with("logs.list_by_area", area_id))?;
        Ok(present(logs))
    }
}

/// 最新的在前；系统账号替换为展示名
fn present(mut logs: Vec<LogEntry>) -> Vec<LogEntry> {
    for log in logs.iter_mut() {
        if log.user_id == SYSTEM_USER_ID {
            log.user_id = SYSTEM_USER_LABEL.to_string();
        }
    }
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs
}
