//! 角色与导航权限
//!
//! 后端为角色生成不透明的 ID，令牌里只携带 `roleId`。这里把 ID 先解析为
//! 类型化的 `RoleKind`（内置 ID 表优先，其次按已加载角色的名称），
//! 再由 `RoleKind` 推导可见路由与操作能力。
//!
//! 这只是界面便利：按钮禁用与菜单隐藏都不是授权机制，授权由后端执行。

use crate::model::Role;
use crate::route::AppRoute;
use std::collections::{BTreeSet, HashMap};

// 历史部署中写死的角色 ID
pub const ADMIN_ROLE_ID: &str = "2d5c7f8e-1b3a-4c9d-8f0a-7e6b5a4d3c2b";
pub const MANAGER_ROLE_ID: &str = "a3e9c8b7-4d5c-6e2f-1g8h-9i0j1k2l3m4n";
pub const PLANILLA_ROLE_ID: &str = "b1c2d3e4-f5g6-7h8i-9j0k-1l2m3n4o5p6q";
pub const SERVICIOS_ROLE_ID: &str = "c7d8e9f0-1g2h-3i4j-5k6l-7m8n9o0p1q2r";
pub const VIEWER_ROLE_ID: &str = "d9e8f7g6-5h4i-3j2k-1l0m-9n8o7p6q5r4s";

/// 角色种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Admin,
    Manager,
    Planilla,
    ServiciosProfesionales,
    Viewer,
}

impl RoleKind {
    /// 按后端角色名解析；`DEVELOPER` 是旧版本中 SERVICIOS PROFESIONALES 的名字
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_uppercase().replace('_', " ");
        match name.as_str() {
            "ADMIN" => Some(RoleKind::Admin),
            "MANAGER" => Some(RoleKind::Manager),
            "PLANILLA" => Some(RoleKind::Planilla),
            "SERVICIOS PROFESIONALES" | "DEVELOPER" => Some(RoleKind::ServiciosProfesionales),
            "VIEWER" => Some(RoleKind::Viewer),
            _ => None,
        }
    }

    /// 该角色在侧边栏中可见的路由
    pub fn routes(&self) -> BTreeSet<AppRoute> {
        let routes: &[AppRoute] = match self {
            RoleKind::Admin => &AppRoute::NAVIGATION,
            RoleKind::Manager => &[AppRoute::Dashboard, AppRoute::Tasks, AppRoute::Users],
            RoleKind::Planilla | RoleKind::ServiciosProfesionales | RoleKind::Viewer => {
                &[AppRoute::Dashboard, AppRoute::Tasks]
            }
        };
        routes.iter().copied().collect()
    }

    /// 只读角色不能创建、编辑或删除
    pub fn can_mutate(&self) -> bool {
        !matches!(self, RoleKind::Viewer)
    }

    /// 只有管理员可以跨区域操作
    pub fn spans_all_areas(&self) -> bool {
        matches!(self, RoleKind::Admin)
    }

    /// 角色页面上展示的能力标签
    pub fn capability_labels(&self) -> &'static [&'static str] {
        match self {
            RoleKind::Admin => &[
                "Crear",
                "Editar",
                "Eliminar",
                "Ver Todo",
                "Gestionar Usuarios",
                "Configuración",
            ],
            RoleKind::Manager => &["Crear", "Editar", "Ver Todo", "Gestionar Tareas"],
            RoleKind::Planilla | RoleKind::ServiciosProfesionales => {
                &["Crear", "Editar", "Ver Asignadas"]
            }
            RoleKind::Viewer => &["Ver Asignadas"],
        }
    }
}

/// 角色 ID -> 角色种类
#[derive(Debug, Clone)]
pub struct PermissionTable {
    by_id: HashMap<String, RoleKind>,
}

impl Default for PermissionTable {
    fn default() -> Self {
        let by_id = [
            (ADMIN_ROLE_ID, RoleKind::Admin),
            (MANAGER_ROLE_ID, RoleKind::Manager),
            (PLANILLA_ROLE_ID, RoleKind::Planilla),
            (SERVICIOS_ROLE_ID, RoleKind::ServiciosProfesionales),
            (VIEWER_ROLE_ID, RoleKind::Viewer),
        ]
        .into_iter()
        .map(|(id, kind)| (id.to_string(), kind))
        .collect();
        Self { by_id }
    }
}

impl PermissionTable {
    /// 用已加载的角色列表补充映射；内置 ID 不会被覆盖
    pub fn with_roles(mut self, roles: &[Role]) -> Self {
        for role in roles {
            if let Some(kind) = RoleKind::from_name(&role.name) {
                self.by_id.entry(role.id.clone()).or_insert(kind);
            }
        }
        self
    }

    pub fn kind_of(&self, role_id: &str) -> Option<RoleKind> {
        self.by_id.get(role_id).copied()
    }

    /// 角色 ID 对应的可见路由；未知或缺失的 ID 得到空集
    pub fn permissions_for(&self, role_id: Option<&str>) -> BTreeSet<AppRoute> {
        role_id
            .and_then(|id| self.kind_of(id))
            .map(|kind| kind.routes())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_has_no_routes() {
        let table = PermissionTable::default();
        assert!(table.permissions_for(Some("not-a-role")).is_empty());
        assert!(table.permissions_for(None).is_empty());
    }

    #[test]
    fn admin_sees_everything_viewer_sees_two() {
        let table = PermissionTable::default();
        assert_eq!(
            table.permissions_for(Some(ADMIN_ROLE_ID)).len(),
            AppRoute::NAVIGATION.len()
        );
        let viewer = table.permissions_for(Some(VIEWER_ROLE_ID));
        assert_eq!(
            viewer,
            BTreeSet::from([AppRoute::Dashboard, AppRoute::Tasks])
        );
        assert!(!RoleKind::Viewer.can_mutate());
    }

    #[test]
    fn loaded_roles_resolve_by_name() {
        let roles = vec![
            Role {
                id: "r-42".into(),
                name: "manager".into(),
                description: None,
            },
            Role {
                id: VIEWER_ROLE_ID.into(),
                name: "ADMIN".into(),
                description: None,
            },
        ];
        let table = PermissionTable::default().with_roles(&roles);
        assert_eq!(table.kind_of("r-42"), Some(RoleKind::Manager));
        // 内置映射优先
        assert_eq!(table.kind_of(VIEWER_ROLE_ID), Some(RoleKind::Viewer));
    }

    #[test]
    fn legacy_names() {
        assert_eq!(
            RoleKind::from_name("servicios_profesionales"),
            Some(RoleKind::ServiciosProfesionales)
        );
        assert_eq!(
            RoleKind::from_name("DEVELOPER"),
            Some(RoleKind::ServiciosProfesionales)
        );
        assert_eq!(RoleKind::from_name("guest"), None);
    }
}
