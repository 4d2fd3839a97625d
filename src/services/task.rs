use super::TaskService;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::Task;

/// 租户区域内的任务，区域由后端根据令牌决定
pub const TASKS_BY_AREA_PATH: &str = "tasks/area";
/// 分配给当前用户的任务
pub const TASKS_ASSIGNED_PATH: &str = "tasks/user";

impl<C: HttpClient, S: TokenStore> TaskService<'_, C, S> {
    pub async fn list_by_area(&self) -> ClientResult<Vec<Task>> {
        self.api
            .list_at::<Task>(TASKS_BY_AREA_PATH)
            .await
            .map_err(|e| e.in_op("tasks.list_by_area"))
    }

    pub async fn list_assigned(&self) -> ClientResult<Vec<Task>> {
        self.api
            .list_at::<Task>(TASKS_ASSIGNED_PATH)
            .await
            .map_err(|e| e.in_op("tasks.list_assigned"))
    }

    /// 主域名看到全部任务，租户子域名只看到本区域的任务
    pub async fn list_for_domain(&self, is_main_domain: bool) -> ClientResult<Vec<Task>> {
        if is_main_domain {
            self.list().await
        } else {
            self.list_by_area().await
        }
    }
}
