//! 班级内权限判定，供作业、提交、抽奖、排行榜复用

use std::sync::Arc;

use actix_web::HttpResponse;

use crate::errors::ClassQuestError;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::classes::entities::Class;
use crate::models::common::response::error_response;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 当前用户与班级的关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAccess {
    Admin,
    Teacher,
    Student,
    Outsider,
}

impl ClassAccess {
    pub fn from_membership(role: &UserRole, membership: Option<ClassUserRole>) -> Self {
        if *role == UserRole::Admin {
            return ClassAccess::Admin;
        }
        match membership {
            Some(ClassUserRole::Teacher) => ClassAccess::Teacher,
            Some(ClassUserRole::Student) => ClassAccess::Student,
            None => ClassAccess::Outsider,
        }
    }

    /// 管理员或班级教师
    pub fn can_manage(&self) -> bool {
        matches!(self, ClassAccess::Admin | ClassAccess::Teacher)
    }

    /// 能查看班级内容
    pub fn can_view(&self) -> bool {
        !matches!(self, ClassAccess::Outsider)
    }
}

pub async fn resolve_class_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<ClassAccess, ClassQuestError> {
    if user.role == UserRole::Admin {
        return Ok(ClassAccess::Admin);
    }
    let membership = storage
        .get_class_user_by_user_id_and_class_id(user.id, class_id)
        .await?
        .map(|class_user| class_user.role);
    Ok(ClassAccess::from_membership(&user.role, membership))
}

/// 读取班级，不存在时返回 404 响应
pub async fn load_class(storage: &Arc<dyn Storage>, class_id: i64) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

/// 要求能查看班级
pub async fn require_class_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<ClassAccess, HttpResponse> {
    match resolve_class_access(storage, user, class_id).await {
        Ok(access) if access.can_view() => Ok(access),
        Ok(_) => Err(permission_denied("You are not a member of this class")),
        Err(e) => Err(error_response(&e)),
    }
}

/// 要求是班级教师或管理员
pub async fn require_class_manager(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<ClassAccess, HttpResponse> {
    match resolve_class_access(storage, user, class_id).await {
        Ok(access) if access.can_manage() => Ok(access),
        Ok(_) => Err(permission_denied(
            "Only the class teacher or an admin can do this",
        )),
        Err(e) => Err(error_response(&e)),
    }
}

pub fn permission_denied(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::ClassPermissionDenied,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_manages_every_class() {
        let access = ClassAccess::from_membership(&UserRole::Admin, None);
        assert!(access.can_manage());
        assert!(access.can_view());
    }

    #[test]
    fn test_membership_roles() {
        let teacher = ClassAccess::from_membership(&UserRole::Teacher, Some(ClassUserRole::Teacher));
        assert!(teacher.can_manage());

        let student = ClassAccess::from_membership(&UserRole::Student, Some(ClassUserRole::Student));
        assert!(student.can_view());
        assert!(!student.can_manage());

        // 不在班级内的教师
        let outsider = ClassAccess::from_membership(&UserRole::Teacher, None);
        assert_eq!(outsider, ClassAccess::Outsider);
        assert!(!outsider.can_view());
    }
}
