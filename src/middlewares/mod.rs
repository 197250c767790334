//! 认证、授权与限流中间件

pub mod rate_limit;
pub mod require_class_role;
pub mod require_jwt;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use require_class_role::RequireClassRole;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

/// 中间件拦截时返回的统一 JSON 错误
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

/// 角色要求：全部满足或任一满足
#[derive(Clone, Debug)]
pub(crate) enum RoleRequirement<R> {
    All(Vec<R>),
    Any(Vec<R>),
}

impl<R: Clone + PartialEq> RoleRequirement<R> {
    pub(crate) fn any_of(roles: &[&R]) -> Self {
        Self::Any(roles.iter().map(|r| (*r).clone()).collect())
    }

    pub(crate) fn is_met_by(&self, held: &R) -> bool {
        match self {
            Self::All(roles) => roles.iter().all(|r| r == held),
            Self::Any(roles) => roles.iter().any(|r| r == held),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    #[test]
    fn test_any_matches_one_of_the_roles() {
        let req = RoleRequirement::any_of(UserRole::teacher_roles());
        assert!(req.is_met_by(&UserRole::Teacher));
        assert!(req.is_met_by(&UserRole::Admin));
        assert!(!req.is_met_by(&UserRole::Student));
    }

    #[test]
    fn test_all_requires_exact_role() {
        let req = RoleRequirement::All(vec![UserRole::Admin]);
        assert!(req.is_met_by(&UserRole::Admin));
        assert!(!req.is_met_by(&UserRole::Teacher));
    }

    #[test]
    fn test_empty_any_denies() {
        let req: RoleRequirement<UserRole> = RoleRequirement::Any(vec![]);
        assert!(!req.is_met_by(&UserRole::Admin));
    }
}
