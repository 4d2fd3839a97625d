//! TaskFlow 共享领域层
//!
//! 纯数据与纯函数，不做任何 I/O：
//! - `model`: 实体模型、容错的 JSON 映射与 DTO 投影
//! - `protocol`: 资源路径与响应信封约定
//! - `tenancy`: 主机名 -> 租户(区域) 解析
//! - `permission`: 角色种类与导航权限表
//! - `route`: 应用路由定义
//! - `date`: 时间戳类型

pub mod date;
pub mod model;
pub mod permission;
pub mod protocol;
pub mod route;
pub mod tenancy;

pub use date::Timestamp;
pub use model::{
    Area, AreaDto, Claims, LogAction, LogDto, LogEntry, Role, RoleDto, Task, TaskDto, TaskStatus,
    Token, User, UserDto,
};
pub use permission::{PermissionTable, RoleKind};
pub use protocol::{Envelope, Resource};
pub use route::AppRoute;
pub use tenancy::{DomainInfo, DomainResolver};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化 Bearer Token 的存储键
pub const STORAGE_TOKEN_KEY: &str = "authToken";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 下拉筛选中表示"不过滤"的取值
pub const FILTER_ALL: &str = "all";
