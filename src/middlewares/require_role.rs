/*!
 * 全局角色校验，需放在 RequireJWT 之后
 *
 * ```rust,ignore
 * web::scope("/integrations")
 *     .wrap(RequireRole::new(&UserRole::Admin))
 *     .wrap(RequireJWT)
 * ```
 *
 * 多个角色任一满足即可时用 `RequireRole::new_any(UserRole::teacher_roles())`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::{RoleRequirement, create_error_response};

#[derive(Clone)]
pub struct RequireRole {
    requirement: RoleRequirement<UserRole>,
}

impl RequireRole {
    /// 只允许某一个全局角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            requirement: RoleRequirement::All(vec![role.clone()]),
        }
    }

    /// 任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            requirement: RoleRequirement::any_of(roles),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            requirement: self.requirement.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    requirement: RoleRequirement<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
            let claims = req.extensions().get::<User>().map(|u| (u.id, u.role.clone()));
            let Some((user_id, role)) = claims else {
                info!("Role check without authenticated user: {}", req.path());
                let resp = create_error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required",
                );
                return Ok(req.into_response(resp.map_into_right_body()));
            };

            if !requirement.is_met_by(&role) {
                info!(
                    "Access denied for user {} (role: {}) on {}, required: {:?}",
                    user_id,
                    role,
                    req.path(),
                    requirement
                );
                let resp =
                    create_error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied");
                return Ok(req.into_response(resp.map_into_right_body()));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}
