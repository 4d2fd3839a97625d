//! 任务页面
//!
//! 初次加载时并发拉取任务、用户与区域；任务列表按域名选择
//! "全部任务" 或 "本区域任务"。

use super::filter::{Selection, matches_any};
use super::access::{authorize, settle_access};
use super::{Access, LoadState, Notice, impl_merge_state, label_or_id, report};
use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::{Area, DomainInfo, PermissionTable, Task, TaskStatus, User};

#[cfg(test)]
mod tests;

// =========================================================
// 筛选与草稿 (Filters & Draft)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilters {
    pub search: String,
    pub status: Selection<TaskStatus>,
    pub area: Selection<String>,
}

impl TaskFilters {
    /// 三个条件同时成立
    pub fn matches(&self, task: &Task) -> bool {
        let text = [task.title.as_str(), task.description.as_deref().unwrap_or("")];
        matches_any(&self.search, text)
            && self.status.matches(&task.status)
            && self.area.matches_str(&task.area_id)
    }
}

/// 新建或编辑中的任务
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    /// `Some(id)` 表示编辑已有任务
    pub editing: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub area_id: String,
    pub assigned_to: String,
    pub created_by: String,
}

impl TaskDraft {
    pub fn for_new(created_by: &str) -> Self {
        Self {
            created_by: created_by.to_string(),
            ..Self::default()
        }
    }

    pub fn for_edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            area_id: task.area_id.clone(),
            assigned_to: task.assigned_to.clone(),
            created_by: task.created_by.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.editing.is_none()
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::invalid_input("El título es obligatorio"));
        }
        if self.area_id.trim().is_empty() {
            return Err(ClientError::invalid_input("Selecciona un área"));
        }
        Ok(())
    }

    pub fn to_task(&self) -> Task {
        let description = self.description.trim();
        Task {
            id: self.editing.clone().unwrap_or_default(),
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: self.status,
            area_id: self.area_id.clone(),
            created_by: self.created_by.clone(),
            assigned_to: self.assigned_to.clone(),
        }
    }
}

// =========================================================
// 页面状态 (State)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TasksState {
    pub load: LoadState,
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub areas: Vec<Area>,
    pub filters: TaskFilters,
    pub draft: Option<TaskDraft>,
    pub notice: Option<Notice>,
    pub domain: DomainInfo,
    pub access: Access,
}

impl TasksState {
    pub fn new(domain: DomainInfo, access: Access) -> Self {
        Self {
            domain,
            access,
            ..Self::default()
        }
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filters.matches(task))
            .collect()
    }

    /// 草稿所选区域内可被指派的用户
    pub fn candidates(&self) -> Vec<&User> {
        match &self.draft {
            Some(draft) if !draft.area_id.is_empty() => self
                .users
                .iter()
                .filter(|u| u.area_id == draft.area_id)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn user_name<'a>(&'a self, id: &'a str) -> &'a str {
        label_or_id(&self.users, id, |u| u.id.as_str(), |u| u.name.as_str())
    }

    pub fn area_title<'a>(&'a self, id: &'a str) -> &'a str {
        label_or_id(&self.areas, id, |a| a.id.as_str(), |a| a.title.as_str())
    }

    // --- Draft ---

    pub fn open_new(&mut self) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        self.draft = Some(TaskDraft::for_new(self.access.user_id()));
        true
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        if !self.access.can_mutate() {
            return false;
        }
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => {
                self.draft = Some(TaskDraft::for_edit(task));
                true
            }
            None => false,
        }
    }

    pub fn close_draft(&mut self) {
        self.draft = None;
    }

    /// 切换区域后，不属于新区域的指派人会被清空
    pub fn set_draft_area(&mut self, area_id: &str) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        draft.area_id = area_id.to_string();

        let assignee_in_area = !area_id.is_empty()
            && self
                .users
                .iter()
                .any(|u| u.id == draft.assigned_to && u.area_id == area_id);
        if !assignee_in_area {
            draft.assigned_to.clear();
        }
    }

    /// 只接受候选列表中的用户
    pub fn set_draft_assignee(&mut self, user_id: &str) {
        let allowed = user_id.is_empty() || self.candidates().iter().any(|u| u.id == user_id);
        if let Some(draft) = self.draft.as_mut().filter(|_| allowed) {
            draft.assigned_to = user_id.to_string();
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl_merge_state!(TasksState { load, tasks, users, areas, filters, draft, notice, domain, access });

// =========================================================
// 视图模型 (ViewModel)
// =========================================================

pub struct TasksViewModel<C, S> {
    api: ApiClient<C, S>,
    pub state: TasksState,
}

impl<C: HttpClient, S: TokenStore> TasksViewModel<C, S> {
    /// 从令牌中解析当前用户
    pub fn new(api: ApiClient<C, S>, domain: DomainInfo) -> Self {
        let access = Access::new(api.current_user(), &PermissionTable::default());
        Self::with_state(api, TasksState::new(domain, access))
    }

    /// 接续一个已有的状态（例如来自响应式信号的快照）
    pub fn with_state(api: ApiClient<C, S>, state: TasksState) -> Self {
        Self { api, state }
    }

    pub fn into_state(self) -> TasksState {
        self.state
    }

    async fn fetch_tasks(&self) -> ClientResult<Vec<Task>> {
        self.api
            .tasks()
            .list_for_domain(self.state.domain.is_main_domain)
            .await
    }

    /// 三个请求并发发出，全部成功才进入 Ready
    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        settle_access(&mut self.state.access, &self.api).await;
        let users = self.api.users();
        let areas = self.api.areas();
        let result = futures::try_join!(self.fetch_tasks(), users.list(), areas.list());

        match result {
            Ok((tasks, users, areas)) => {
                log::info!("Loaded {} tasks, {} users, {} areas", tasks.len(), users.len(), areas.len());
                self.state.tasks = tasks;
                self.state.users = users;
                self.state.areas = areas;
                self.state.load = LoadState::Ready;
            }
            Err(e) => {
                self.state.load = LoadState::Failed(report("Error cargando datos", &e));
            }
        }
    }

    /// 失败时草稿保持打开，并给出错误提示
    pub async fn save(&mut self) -> bool {
        let Some(draft) = self.state.draft.clone() else {
            return false;
        };
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        if let Err(e) = draft.validate() {
            self.state.notice = Some(Notice::error(e.message()));
            return false;
        }

        let task = draft.to_task();
        let service = self.api.tasks();
        let result = match &draft.editing {
            Some(id) => service.update(id, &task).await,
            None => service.create(&task).await,
        };

        if let Err(e) = result {
            self.state.notice = Some(Notice::error(report("Error guardando tarea", &e)));
            return false;
        }

        self.state.draft = None;
        self.state.notice = Some(Notice::success(if draft.is_new() {
            "Tarea creada"
        } else {
            "Tarea actualizada"
        }));
        self.refresh().await;
        true
    }

    pub async fn remove(&mut self, id: &str) -> bool {
        if authorize(&mut self.state.access, &self.api).await.is_err() {
            return false;
        }
        if let Err(e) = self.api.tasks().delete(id).await {
            self.state.notice = Some(Notice::error(report("Error eliminando tarea", &e)));
            return false;
        }
        self.state.notice = Some(Notice::success("Tarea eliminada"));
        self.refresh().await;
        true
    }

    /// 修改后重新拉取任务列表；失败时保留旧列表
    async fn refresh(&mut self) {
        match self.fetch_tasks().await {
            Ok(tasks) => self.state.tasks = tasks,
            Err(e) => {
                self.state.notice = Some(Notice::error(report("Error recargando tareas", &e)));
            }
        }
    }
}
