use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    // 客户端只能提交这两种角色，system 提示词由服务端注入
    #[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
    pub enum ChatRole("对话角色") {
        User => "user",
        Assistant => "assistant",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorChatRequest {
    pub messages: Vec<ChatMessage>,
    pub assignment_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: Option<String>,
}
