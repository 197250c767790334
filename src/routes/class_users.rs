use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::class_users::requests::{ClassUserListParams, JoinClassRequest};
use crate::services::ClassUserService;
use crate::utils::{SafeClassIdI64, SafeUserIdI64};

// 懒加载的全局 CLASS_USER_SERVICE 实例
static CLASS_USER_SERVICE: Lazy<ClassUserService> = Lazy::new(ClassUserService::new_lazy);

// HTTP处理程序
pub async fn join_class(
    req: HttpRequest,
    path: SafeClassIdI64,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_USER_SERVICE
        .join_class(&req, path.0, join_data.into_inner())
        .await
}

pub async fn list_class_members(
    req: HttpRequest,
    path: SafeClassIdI64,
    query: web::Query<ClassUserListParams>,
) -> ActixResult<HttpResponse> {
    CLASS_USER_SERVICE
        .list_class_members(&req, path.0, query.into_inner())
        .await
}

pub async fn delete_class_user(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_USER_SERVICE
        .delete_class_user(&req, class_id.0, user_id.0)
        .await
}

// 挂载在 /api/v1/classes 作用域内，继承 RequireJWT
pub fn configure_class_users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{class_id}/join")
            .wrap(middlewares::RateLimit::invite_code())
            .route(web::post().to(join_class)),
    )
    .service(
        web::resource("/{class_id}/members").route(
            web::get()
                .to(list_class_members)
                // 班级成员可以查看成员列表
                .wrap(middlewares::RequireClassRole::new_any(
                    ClassUserRole::all_roles(),
                )),
        ),
    )
    .service(
        web::resource("/{class_id}/members/{user_id}").route(
            web::delete()
                .to(delete_class_user)
                // 教师移除成员，学生只能退出自己，服务层再细分
                .wrap(middlewares::RequireClassRole::new_any(
                    ClassUserRole::all_roles(),
                )),
        ),
    );
}
