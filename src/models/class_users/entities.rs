use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    // 班级内角色
    #[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
    pub enum ClassUserRole("班级用户角色") {
        Student => "student",
        Teacher => "teacher",
    }
}

impl ClassUserRole {
    pub fn all_roles() -> &'static [&'static ClassUserRole] {
        &[&Self::Student, &Self::Teacher]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
pub struct ClassUser {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub role: ClassUserRole,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

// 成员列表中的一行，带用户公开信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
pub struct ClassMember {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub role: ClassUserRole,
    pub xp: i64,
    pub level: i32,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
