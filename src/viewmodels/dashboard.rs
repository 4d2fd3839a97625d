use super::{LoadState, impl_merge_state, label_or_id, report};
use crate::api::ApiClient;
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::{Area, DomainInfo, Task, TaskStatus, User};

/// 首页展示的最近任务条数
pub const RECENT_TASKS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total: usize,
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// 四舍五入的百分比，没有任务时为 0
    pub completion_rate: u32,
}

impl DashboardStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        let total = tasks.len();
        let done = count(TaskStatus::Done);
        let completion_rate = if total == 0 {
            0
        } else {
            (done as f64 * 100.0 / total as f64).round() as u32
        };
        Self {
            total,
            done,
            in_progress: count(TaskStatus::InProgress),
            pending: count(TaskStatus::Pending),
            completion_rate,
        }
    }
}

/// 最近任务卡片的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTask<'a> {
    pub title: &'a str,
    pub status: TaskStatus,
    pub assignee: &'a str,
    pub area: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    pub load: LoadState,
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub areas: Vec<Area>,
    pub domain: DomainInfo,
}

impl DashboardState {
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_tasks(&self.tasks)
    }

    /// 后端返回顺序中的前几条
    pub fn recent(&self) -> Vec<RecentTask<'_>> {
        self.tasks
            .iter()
            .take(RECENT_TASKS)
            .map(|task| RecentTask {
                title: &task.title,
                status: task.status,
                assignee: label_or_id(&self.users, &task.assigned_to, |u| u.id.as_str(), |u| {
                    u.name.as_str()
                }),
                area: label_or_id(&self.areas, &task.area_id, |a| a.id.as_str(), |a| {
                    a.title.as_str()
                }),
            })
            .collect()
    }
}

impl_merge_state!(DashboardState { load, tasks, users, areas, domain });

pub struct DashboardViewModel<C, S> {
    api: ApiClient<C, S>,
    pub state: DashboardState,
}

impl<C: HttpClient, S: TokenStore> DashboardViewModel<C, S> {
    pub fn new(api: ApiClient<C, S>, domain: DomainInfo) -> Self {
        let state = DashboardState {
            domain,
            ..DashboardState::default()
        };
        Self { api, state }
    }

    pub fn into_state(self) -> DashboardState {
        self.state
    }

    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        let tasks = self.api.tasks();
        let users = self.api.users();
        let areas = self.api.areas();
        let result = futures::try_join!(
            tasks.list_for_domain(self.state.domain.is_main_domain),
            users.list(),
            areas.list()
        );
        match result {
            Ok((tasks, users, areas)) => {
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
}
