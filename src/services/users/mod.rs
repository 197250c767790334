pub mod avatar;
pub mod list;
pub mod profile;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{
    UpdateAvatarRequest, UpdateLanguageRequest, UpdateProfileRequest, UserListParams,
};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
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

    // 获取用户列表（管理员）
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 修改显示名
    pub async fn update_profile(
        &self,
        update: UpdateProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_profile(self, update, request).await
    }

    // 修改语言偏好
    pub async fn update_language(
        &self,
        update: UpdateLanguageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_language(self, update, request).await
    }

    // 装备头像
    pub async fn update_avatar(
        &self,
        update: UpdateAvatarRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        avatar::update_avatar(self, update, request).await
    }
}
