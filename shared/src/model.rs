//! 领域模型 (Domain Models)
//!
//! 每个实体提供两条转换路径：
//! - `from_json`: 从后端原始 JSON 构建，逐字段强制转换并填充安全默认值，永不失败
//! - `to_dto`: 投影为发往后端的字段子集（不含服务端分配的 `id`）

use crate::date::Timestamp;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// =========================================================
// 字段强制转换 (Field coercion)
// =========================================================

/// 读取字段并强制转为字符串
///
/// 缺失、`null`、`false`、`0` 与对象/数组都视为空字符串。
pub(crate) fn coerce_str(json: &Value, key: &str) -> String {
    match json.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

/// 可选文本字段：空字符串视为缺失
pub(crate) fn coerce_opt(json: &Value, key: &str) -> Option<String> {
    let value = coerce_str(json, key);
    (!value.is_empty()).then_some(value)
}

// =========================================================
// 任务状态 (Task status)
// =========================================================

/// 任务状态
///
/// 规范词表为 PENDING / IN_PROGRESS / DONE / REJECTED / PENDING_VALIDATION，
/// 旧版本的 COMPLETED、CANCELLED 作为别名读入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    #[serde(alias = "COMPLETED")]
    Done,
    #[serde(alias = "CANCELLED")]
    Rejected,
    PendingValidation,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Rejected,
        TaskStatus::PendingValidation,
    ];

    /// 线上传输的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
            TaskStatus::Rejected => "REJECTED",
            TaskStatus::PendingValidation => "PENDING_VALIDATION",
        }
    }

    /// 解析线上名称（含旧别名），大小写不敏感
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(TaskStatus::Pending),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "DONE" | "COMPLETED" => Some(TaskStatus::Done),
            "REJECTED" | "CANCELLED" => Some(TaskStatus::Rejected),
            "PENDING_VALIDATION" => Some(TaskStatus::PendingValidation),
            _ => None,
        }
    }

    /// 界面显示文本
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendiente",
            TaskStatus::InProgress => "En Progreso",
            TaskStatus::Done => "Completada",
            TaskStatus::Rejected => "Cancelada",
            TaskStatus::PendingValidation => "Pendiente de Validación",
        }
    }
}

// =========================================================
// 任务 (Task)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub area_id: String,
    pub created_by: String,
    pub assigned_to: String,
}

/// 任务 DTO：除 `id` 外的全部字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub title: String,
    pub status: TaskStatus,
    pub area_id: String,
    pub created_by: String,
    pub assigned_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    pub fn from_json(json: &Value) -> Self {
        let status = json
            .get("status")
            .and_then(Value::as_str)
            .and_then(TaskStatus::parse)
            .unwrap_or_default();

        Self {
            id: coerce_str(json, "id"),
            title: coerce_str(json, "title"),
            description: coerce_opt(json, "description"),
            status,
            area_id: coerce_str(json, "areaId"),
            created_by: coerce_str(json, "createdBy"),
            assigned_to: coerce_str(json, "assignedTo"),
        }
    }

    pub fn to_dto(&self) -> TaskDto {
        TaskDto {
            title: self.title.clone(),
            status: self.status,
            area_id: self.area_id.clone(),
            created_by: self.created_by.clone(),
            assigned_to: self.assigned_to.clone(),
            description: self.description.clone(),
        }
    }
}

// =========================================================
// 用户 (User)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// 明文密码，仅在创建/修改时随 DTO 发送
    #[serde(default, skip_serializing)]
    pub password: String,
    pub area_id: String,
    pub role_id: String,
}

/// 用户 DTO
///
/// 密码只在非空时携带，编辑用户但不改密码时不会覆盖原值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub area_id: String,
    pub role_id: String,
}

impl User {
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: coerce_str(json, "id"),
            name: coerce_str(json, "name"),
            email: coerce_str(json, "email"),
            password: coerce_str(json, "password"),
            area_id: coerce_str(json, "areaId"),
            role_id: coerce_str(json, "roleId"),
        }
    }

    pub fn to_dto(&self) -> UserDto {
        UserDto {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            area_id: self.area_id.clone(),
            role_id: self.role_id.clone(),
        }
    }
}

// =========================================================
// 角色 (Role)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    /// ADMIN, MANAGER, PLANILLA, SERVICIOS PROFESIONALES, VIEWER ...
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Role {
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: coerce_str(json, "id"),
            name: coerce_str(json, "name"),
            description: coerce_opt(json, "description"),
        }
    }

    pub fn to_dto(&self) -> RoleDto {
        RoleDto {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

// =========================================================
// 区域 / 租户 (Area)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaDto {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Area {
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: coerce_str(json, "id"),
            title: coerce_str(json, "title"),
            description: coerce_opt(json, "description"),
        }
    }

    pub fn to_dto(&self) -> AreaDto {
        AreaDto {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

// =========================================================
// 审计日志 (Log)
// =========================================================

/// 审计动作
///
/// 未识别的动作原样保留在 `Other` 中，而不是丢弃整条记录。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogAction {
    Login,
    Logout,
    Register,
    CreateTask,
    UpdateTask,
    DeleteTask,
    CreateUser,
    UpdateUser,
    DeleteUser,
    CreateArea,
    UpdateArea,
    DeleteArea,
    CreateRole,
    UpdateRole,
    DeleteRole,
    Other(String),
}

impl LogAction {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOGIN" => LogAction::Login,
            "LOGOUT" => LogAction::Logout,
            "REGISTER" => LogAction::Register,
            "CREATE_TASK" => LogAction::CreateTask,
            "UPDATE_TASK" => LogAction::UpdateTask,
            "DELETE_TASK" => LogAction::DeleteTask,
            "CREATE_USER" => LogAction::CreateUser,
            "UPDATE_USER" => LogAction::UpdateUser,
            "DELETE_USER" => LogAction::DeleteUser,
            "CREATE_AREA" => LogAction::CreateArea,
            "UPDATE_AREA" => LogAction::UpdateArea,
            "DELETE_AREA" => LogAction::DeleteArea,
            "CREATE_ROLE" => LogAction::CreateRole,
            "UPDATE_ROLE" => LogAction::UpdateRole,
            "DELETE_ROLE" => LogAction::DeleteRole,
            _ => LogAction::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LogAction::Login => "LOGIN",
            LogAction::Logout => "LOGOUT",
            LogAction::Register => "REGISTER",
            LogAction::CreateTask => "CREATE_TASK",
            LogAction::UpdateTask => "UPDATE_TASK",
            LogAction::DeleteTask => "DELETE_TASK",
            LogAction::CreateUser => "CREATE_USER",
            LogAction::UpdateUser => "UPDATE_USER",
            LogAction::DeleteUser => "DELETE_USER",
            LogAction::CreateArea => "CREATE_AREA",
            LogAction::UpdateArea => "UPDATE_AREA",
            LogAction::DeleteArea => "DELETE_AREA",
            LogAction::CreateRole => "CREATE_ROLE",
            LogAction::UpdateRole => "UPDATE_ROLE",
            LogAction::DeleteRole => "DELETE_ROLE",
            LogAction::Other(raw) => raw,
        }
    }
}

impl Serialize for LogAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 只读的审计记录，由后端在其他操作中附带产生
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    /// 执行动作的用户；系统账号会被替换为展示名
    pub user_id: String,
    pub action: LogAction,
    pub area_id: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDto {
    pub user_id: String,
    pub action: LogAction,
    pub area_id: String,
    /// ISO 8601
    pub timestamp: String,
}

impl LogEntry {
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: coerce_str(json, "id"),
            user_id: coerce_str(json, "userId"),
            action: LogAction::parse(&coerce_str(json, "action")),
            area_id: coerce_str(json, "areaId"),
            timestamp: Timestamp::from_json(json.get("timestamp")),
        }
    }

    pub fn to_dto(&self) -> LogDto {
        LogDto {
            user_id: self.user_id.clone(),
            action: self.action.clone(),
            area_id: self.area_id.clone(),
            timestamp: self.timestamp.to_iso(),
        }
    }
}

// =========================================================
// 令牌与声明 (Token & Claims)
// =========================================================

/// 不透明的 Bearer 字符串
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token(pub String);

impl Token {
    /// 认证接口可能返回 `{ "token": "..." }` 或裸字符串，两者都接受
    pub fn from_json(json: &Value) -> Option<Self> {
        match json {
            Value::String(s) if !s.trim().is_empty() => Some(Token(s.trim().to_string())),
            Value::Object(map) => map.get("token").and_then(Token::from_json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 令牌中携带的用户声明
///
/// 只用于界面裁剪，不是安全边界：客户端不校验签名，授权始终由后端执行。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Claims {
    pub id: String,
    pub name: String,
    pub email: String,
    pub area_id: String,
    pub role_id: String,
}

impl Claims {
    /// 令牌载荷中的 ID 有时是数字，按实体模型的规则强制转换
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: coerce_str(json, "id"),
            name: coerce_str(json, "name"),
            email: coerce_str(json, "email"),
            area_id: coerce_str(json, "areaId"),
            role_id: coerce_str(json, "roleId"),
        }
    }
}
