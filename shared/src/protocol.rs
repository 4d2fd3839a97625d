//! 各实体服务共用的资源约定
//!
//! 后端的列表信封并不统一：有的集合返回 `{ "data": [...] }`，有的直接返回数组。
//! 每个资源在这里声明自己的信封，客户端只在一处做归一化。

use crate::model::{Area, AreaDto, LogDto, LogEntry, Role, RoleDto, Task, TaskDto, User, UserDto};
use serde::Serialize;
use serde_json::Value;

/// 集合响应的形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `[...]`
    Bare,
    /// `{ "data": [...] }`
    Data,
}

impl Envelope {
    /// 从集合响应中取出条目列表
    ///
    /// 响应体形状不符时返回 `None`。两种声明都接受裸数组，
    /// `null`（2xx 的空响应体）视为空列表。
    pub fn unwrap_list(self, body: Value) -> Option<Vec<Value>> {
        match (self, body) {
            (_, Value::Null) => Some(Vec::new()),
            (_, Value::Array(items)) => Some(items),
            (Envelope::Data, Value::Object(mut map)) => match map.remove("data") {
                Some(Value::Array(items)) => Some(items),
                None | Some(Value::Null) => Some(Vec::new()),
                Some(_) => None,
            },
            _ => None,
        }
    }

    /// 取出单个条目，`null` 表示不存在
    pub fn unwrap_one(self, body: Value) -> Option<Value> {
        match (self, body) {
            (_, Value::Null) => None,
            (Envelope::Data, Value::Object(mut map)) if map.get("data").is_some_and(Value::is_object) => {
                map.remove("data")
            }
            (_, other) => Some(other),
        }
    }
}

/// 一个 REST 集合：模型映射与 DTO 投影
pub trait Resource: Sized {
    /// 创建/更新时发送的请求体
    type Dto: Serialize;
    /// 相对 API 基地址的集合路径
    const PATH: &'static str;
    /// 默认信封，可在客户端配置中按路径覆盖
    const ENVELOPE: Envelope;

    fn from_json(json: &Value) -> Self;
    fn to_dto(&self) -> Self::Dto;
}

impl Resource for Task {
    type Dto = TaskDto;
    const PATH: &'static str = "tasks";
    const ENVELOPE: Envelope = Envelope::Bare;

    fn from_json(json: &Value) -> Self {
        Task::from_json(json)
    }
    fn to_dto(&self) -> TaskDto {
        Task::to_dto(self)
    }
}

impl Resource for User {
    type Dto = UserDto;
    const PATH: &'static str = "users";
    const ENVELOPE: Envelope = Envelope::Data;

    fn from_json(json: &Value) -> Self {
        User::from_json(json)
    }
    fn to_dto(&self) -> UserDto {
        User::to_dto(self)
    }
}

impl Resource for Role {
    type Dto = RoleDto;
    const PATH: &'static str = "roles";
    const ENVELOPE: Envelope = Envelope::Bare;

    fn from_json(json: &Value) -> Self {
        Role::from_json(json)
    }
    fn to_dto(&self) -> RoleDto {
        Role::to_dto(self)
    }
}

impl Resource for Area {
    type Dto = AreaDto;
    const PATH: &'static str = "areas";
    const ENVELOPE: Envelope = Envelope::Bare;

    fn from_json(json: &Value) -> Self {
        Area::from_json(json)
    }
    fn to_dto(&self) -> AreaDto {
        Area::to_dto(self)
    }
}

impl Resource for LogEntry {
    type Dto = LogDto;
    const PATH: &'static str = "logs";
    const ENVELOPE: Envelope = Envelope::Data;

    fn from_json(json: &Value) -> Self {
        LogEntry::from_json(json)
    }
    fn to_dto(&self) -> LogDto {
        LogEntry::to_dto(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_envelope_tolerates_bare_arrays() {
        assert_eq!(
            Envelope::Data.unwrap_list(json!({ "data": [1, 2] })),
            Some(vec![json!(1), json!(2)])
        );
        assert_eq!(Envelope::Data.unwrap_list(json!([1])), Some(vec![json!(1)]));
        assert_eq!(Envelope::Data.unwrap_list(json!({ "total": 0 })), Some(vec![]));
    }

    #[test]
    fn bare_envelope_rejects_objects() {
        assert_eq!(Envelope::Bare.unwrap_list(json!({ "data": [] })), None);
        assert_eq!(Envelope::Bare.unwrap_list(json!("oops")), None);
        assert_eq!(Envelope::Bare.unwrap_list(Value::Null), Some(vec![]));
    }

    #[test]
    fn single_item_unwrap() {
        assert_eq!(Envelope::Bare.unwrap_one(Value::Null), None);
        assert_eq!(
            Envelope::Data.unwrap_one(json!({ "data": { "id": "1" } })),
            Some(json!({ "id": "1" }))
        );
        assert_eq!(
            Envelope::Bare.unwrap_one(json!({ "id": "1" })),
            Some(json!({ "id": "1" }))
        );
    }
}
