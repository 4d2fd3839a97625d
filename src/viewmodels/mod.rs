//! 视图模型层
//!
//! 每个页面一个 `XxxState`（纯数据，可放进响应式信号）和一个
//! `XxxViewModel`（持有 `ApiClient` 与状态，负责拉取与提交）。
//! 任何修改成功后都会重新拉取完整列表，不做乐观合并。

pub mod access;
pub mod areas;
pub mod dashboard;
pub mod filter;
pub mod logs;
pub mod pagination;
pub mod roles;
pub mod session;
pub mod tasks;
pub mod users;

pub use access::{Access, resolve_access};
pub use filter::Selection;
pub use pagination::{PAGE_SIZE, Paginator};

use crate::error::ClientError;

/// 页面的加载状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// 一次操作结果的短暂提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// 把一次异步操作的结果合并回最新的页面状态
///
/// 操作基于发起时的快照 `before` 运行。操作改动过的字段以结果为准，
/// 没有改动的字段保留期间用户的编辑（例如正在输入的搜索词）。
pub trait MergeState {
    fn merge(&mut self, before: &Self, done: Self);
}

pub(crate) fn merge_field<T: PartialEq>(current: &mut T, before: &T, done: T) {
    if done != *before {
        *current = done;
    }
}

/// 按字段实现 `MergeState`；解构时不带 `..`，漏列字段会编译失败
macro_rules! impl_merge_state {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::viewmodels::MergeState for $ty {
            fn merge(&mut self, before: &Self, done: Self) {
                let Self { $($field),* } = done;
                $($crate::viewmodels::merge_field(&mut self.$field, &before.$field, $field);)*
            }
        }
    };
}
pub(crate) use impl_merge_state;

/// 记录失败并转成界面上显示的文本
pub(crate) fn report(context: &str, err: &ClientError) -> String {
    log::error!("{}: {}", context, err);
    format!("{}: {}", context, err.message())
}

/// 按 ID 查显示名，找不到时回落到 ID 本身
pub(crate) fn label_or_id<'a, T>(
    items: &'a [T],
    id: &'a str,
    key: impl Fn(&T) -> &str,
    label: impl Fn(&'a T) -> &'a str,
) -> &'a str {
    items
        .iter()
        .find(|item| key(item) == id)
        .map(label)
        .unwrap_or(id)
}
