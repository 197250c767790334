/*!
 * 班级角色校验，需放在 RequireJWT 之后
 *
 * 从路径中的 `{class_id}` 查成员关系；系统管理员直接放行。
 *
 * ```rust,ignore
 * web::scope("/classes/{class_id}/members")
 *     .wrap(RequireClassRole::new_any(ClassUserRole::all_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        class_users::entities::{ClassUser, ClassUserRole},
        users::entities::{User, UserRole},
    },
    storage::Storage,
};

use super::{RoleRequirement, create_error_response};

#[derive(Clone)]
pub struct RequireClassRole {
    requirement: RoleRequirement<ClassUserRole>,
}

impl RequireClassRole {
    /// 班级内任一角色即可
    pub fn new_any(roles: &[&ClassUserRole]) -> Self {
        Self {
            requirement: RoleRequirement::any_of(roles),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassRoleMiddleware {
            service: Rc::new(service),
            requirement: self.requirement.clone(),
        }))
    }
}

pub struct RequireClassRoleMiddleware<S> {
    service: Rc<S>,
    requirement: RoleRequirement<ClassUserRole>,
}

/// 拦截结果，带状态码和提示
type Rejection = (StatusCode, ErrorCode, &'static str);

impl<S, B> Service<ServiceRequest> for RequireClassRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let requirement = self.requirement.clone();

        Box::pin(async move {
            match check_class_access(&req, &requirement).await {
                Ok(Some(member)) => {
                    debug!(
                        "User {} passes class check as {}",
                        member.user_id, member.role
                    );
                    req.extensions_mut().insert(member);
                }
                // 系统管理员，不挂成员信息
                Ok(None) => {}
                Err((status, code, message)) => {
                    let resp = create_error_response(status, code, message);
                    return Ok(req.into_response(resp.map_into_right_body()));
                }
            }
            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

async fn check_class_access(
    req: &ServiceRequest,
    requirement: &RoleRequirement<ClassUserRole>,
) -> Result<Option<ClassUser>, Rejection> {
    let user = req.extensions().get::<User>().cloned().ok_or((
        StatusCode::UNAUTHORIZED,
        ErrorCode::Unauthorized,
        "Unauthorized: missing user claims",
    ))?;

    let class_id = req
        .match_info()
        .get("class_id")
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or((
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Missing or invalid class_id",
        ))?;

    if user.role == UserRole::Admin {
        return Ok(None);
    }

    let member = find_membership(req, user.id, class_id).await.ok_or((
        StatusCode::FORBIDDEN,
        ErrorCode::ClassPermissionDenied,
        "No permission for this class",
    ))?;

    if requirement.is_met_by(&member.role) {
        Ok(Some(member))
    } else {
        Err((
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "Access denied for this class role",
        ))
    }
}

async fn find_membership(req: &ServiceRequest, user_id: i64, class_id: i64) -> Option<ClassUser> {
    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()?
        .get_ref()
        .clone();

    storage
        .get_class_user_by_user_id_and_class_id(user_id, class_id)
        .await
        .unwrap_or_else(|e| {
            error!("查询班级成员失败: {}", e);
            None
        })
}
