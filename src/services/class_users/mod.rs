pub mod delete;
pub mod join;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::class_users::requests::{ClassUserListParams, JoinClassRequest};
use crate::storage::Storage;

pub struct ClassUserService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassUserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 凭邀请码加入班级
    pub async fn join_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        join_data: JoinClassRequest,
    ) -> ActixResult<HttpResponse> {
        join::join_class(self, request, class_id, join_data).await
    }

    // 班级成员列表
    pub async fn list_class_members(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: ClassUserListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_class_members(self, request, class_id, query).await
    }

    // 退出班级或移除成员
    pub async fn delete_class_user(
        &self,
        request: &HttpRequest,
        class_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class_user(self, request, class_id, user_id).await
    }
}
