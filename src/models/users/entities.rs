use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::collectibles::entities::CollectibleSlot;
use crate::string_enum;

string_enum! {
    // 用户角色
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserRole("用户角色") {
        Student => "student",
        Teacher => "teacher",
        Admin => "admin",
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
}

string_enum! {
    // 用户状态
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserStatus("用户状态") {
        Active => "active",
        Suspended => "suspended",
    }
}

/// 头像装扮，每个部位装备一件收藏品
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AvatarLoadout {
    #[serde(default)]
    pub hat: Option<i64>,
    #[serde(default)]
    pub face: Option<i64>,
    #[serde(default)]
    pub outfit: Option<i64>,
    #[serde(default)]
    pub background: Option<i64>,
    #[serde(default)]
    pub pet: Option<i64>,
}

impl AvatarLoadout {
    pub fn get(&self, slot: CollectibleSlot) -> Option<i64> {
        match slot {
            CollectibleSlot::Hat => self.hat,
            CollectibleSlot::Face => self.face,
            CollectibleSlot::Outfit => self.outfit,
            CollectibleSlot::Background => self.background,
            CollectibleSlot::Pet => self.pet,
        }
    }

    pub fn set(&mut self, slot: CollectibleSlot, item: Option<i64>) {
        let target = match slot {
            CollectibleSlot::Hat => &mut self.hat,
            CollectibleSlot::Face => &mut self.face,
            CollectibleSlot::Outfit => &mut self.outfit,
            CollectibleSlot::Background => &mut self.background,
            CollectibleSlot::Pet => &mut self.pet,
        };
        *target = item;
    }

    /// 已装备的 (部位, 收藏品ID)
    pub fn equipped(&self) -> Vec<(CollectibleSlot, i64)> {
        CollectibleSlot::ALL
            .iter()
            .filter_map(|slot| self.get(*slot).map(|id| (*slot, id)))
            .collect()
    }

    /// 数据库中存 JSON 文本，解析失败视为空装扮
    pub fn from_db(raw: Option<&str>) -> Self {
        raw.and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    pub fn to_db(&self) -> Option<String> {
        if self.equipped().is_empty() {
            None
        } else {
            serde_json::to_string(self).ok()
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    /// 界面语言偏好，也是翻译的默认目标语言
    pub language: String,
    pub avatar: AvatarLoadout,
    pub xp: i64,
    pub coins: i64,
    pub level: i32,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("teacher".parse::<UserRole>(), Ok(UserRole::Teacher));
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_avatar_roundtrip_through_db_text() {
        let mut avatar = AvatarLoadout::default();
        assert_eq!(avatar.to_db(), None);

        avatar.set(CollectibleSlot::Pet, Some(7));
        avatar.set(CollectibleSlot::Hat, Some(2));
        let raw = avatar.to_db();
        let restored = AvatarLoadout::from_db(raw.as_deref());
        assert_eq!(restored, avatar);
        assert_eq!(
            restored.equipped(),
            vec![(CollectibleSlot::Hat, 2), (CollectibleSlot::Pet, 7)]
        );
    }

    #[test]
    fn test_avatar_from_garbage_is_empty() {
        assert_eq!(
            AvatarLoadout::from_db(Some("not json")),
            AvatarLoadout::default()
        );
    }
}
