use super::entities::{AvatarLoadout, UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 创建用户（存储层，password 为哈希后的值）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub language: Option<String>,
}

// 更新个人资料
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
}

// 更新语言偏好
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateLanguageRequest {
    pub language: String,
}

// 装备头像：请求中出现的部位才会被修改，null 表示卸下
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateAvatarRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub hat: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub face: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub outfit: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub background: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub pet: Option<Option<i64>>,
}

impl UpdateAvatarRequest {
    /// 在现有装扮上应用修改
    pub fn apply_to(&self, current: &AvatarLoadout) -> AvatarLoadout {
        AvatarLoadout {
            hat: self.hat.unwrap_or(current.hat),
            face: self.face.unwrap_or(current.face),
            outfit: self.outfit.unwrap_or(current.outfit),
            background: self.background.unwrap_or(current.background),
            pet: self.pet.unwrap_or(current.pet),
        }
    }
}

// 区分字段缺失（None）与显式 null（Some(None)）
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_request_missing_vs_null() {
        let req: UpdateAvatarRequest = serde_json::from_str(r#"{"hat": null, "pet": 4}"#).unwrap();
        let current = AvatarLoadout {
            hat: Some(1),
            face: Some(2),
            ..Default::default()
        };
        let next = req.apply_to(&current);
        assert_eq!(next.hat, None);
        assert_eq!(next.face, Some(2));
        assert_eq!(next.pet, Some(4));
    }
}
