// ==========================================
// Prazo 零售库存系统 - 查看范围限定
// ==========================================
// 管理者: 可查看全部门店,或按请求过滤单个门店
// 门店员工: 始终限定为本门店（忽略其他门店过滤）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::Viewer;
use crate::domain::types::UserRole;
use tracing::debug;

/// 解析本次查询的门店范围（None 表示全部门店）
pub fn resolve_store_scope(viewer: &Viewer, requested: Option<&str>) -> ApiResult<Option<String>> {
    let requested = requested.map(str::trim).filter(|s| !s.is_empty());

    match viewer.role {
        UserRole::Manager => Ok(requested.map(str::to_string)),
        UserRole::Store => {
            let own = viewer
                .store_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ApiError::InvalidInput("门店员工必须指定所属门店".to_string()))?;

            if let Some(other) = requested.filter(|r| *r != own) {
                debug!(own_store = own, requested_store = other, "门店员工只能查看本门店，忽略过滤条件");
            }
            Ok(Some(own.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_scope() {
        let viewer = Viewer::manager();
        assert_eq!(resolve_store_scope(&viewer, None).unwrap(), None);
        assert_eq!(
            resolve_store_scope(&viewer, Some("S2")).unwrap(),
            Some("S2".to_string())
        );
        assert_eq!(resolve_store_scope(&viewer, Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_store_viewer_is_pinned_to_own_store() {
        let viewer = Viewer::store("S1");
        assert_eq!(resolve_store_scope(&viewer, None).unwrap(), Some("S1".to_string()));
        assert_eq!(
            resolve_store_scope(&viewer, Some("S2")).unwrap(),
            Some("S1".to_string())
        );
    }

    #[test]
    fn test_store_viewer_without_store_is_rejected() {
        let viewer = Viewer {
            role: UserRole::Store,
            store_id: None,
        };
        assert!(matches!(
            resolve_store_scope(&viewer, None),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
