pub mod evaluate;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub use evaluate::{award_earned_badges, evaluate_badges};

pub struct BadgeService {
    storage: Option<Arc<dyn Storage>>,
}

impl BadgeService {
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

    // 徽章目录，带当前用户的获得状态
    pub async fn list_my_badges(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_badges(self, request).await
    }

    // 教师/管理员查看某个学生的徽章
    pub async fn list_user_badges(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_user_badges(self, request, user_id).await
    }
}
