//! 数据模型
//!
//! 请求、响应与业务实体，均通过 ts-rs 导出 TypeScript 类型。

pub mod common;

pub mod assignments;
pub mod auth;
pub mod badges;
pub mod class_users;
pub mod classes;
pub mod collectibles;
pub mod games;
pub mod integrations;
pub mod leaderboard;
pub mod notifications;
pub mod progression;
pub mod raffles;
pub mod submissions;
pub mod tutor;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 业务错误码，随 `ApiResponse.code` 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 用户
    UserNotFound = 3000,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserNameAlreadyExists = 3005,
    UserEmailAlreadyExists = 3006,
    UserUpdateFailed = 3007,
    UserLanguageInvalid = 3008,
    AvatarItemNotOwned = 3009,
    AvatarSlotMismatch = 3010,

    // 班级
    ClassNotFound = 4000,
    ClassCreationFailed = 4002,
    ClassDeleteFailed = 4003,
    ClassPermissionDenied = 4004,
    ClassInviteCodeInvalid = 4005,
    ClassAlreadyJoined = 4006,
    ClassJoinFailed = 4007,
    ClassUserNotFound = 4008,

    // 作业与提交
    AssignmentNotFound = 5000,
    AssignmentCreationFailed = 5001,
    AssignmentInvalid = 5002,
    SubmissionNotFound = 5100,
    SubmissionAlreadyGraded = 5101,
    SubmissionScoreInvalid = 5102,

    // 游戏化
    InsufficientCoins = 6000,
    CollectibleNotFound = 6010,
    CollectibleAlreadyOwned = 6011,
    CollectibleInactive = 6012,
    GameSessionInvalid = 6020,
    RaffleNotFound = 6100,
    RaffleNotOpen = 6101,
    RaffleEntryLimitExceeded = 6102,
    RaffleNoEntries = 6103,
    RaffleInvalid = 6104,

    // 通知
    NotificationNotFound = 7000,

    // 集成
    WebhookSignatureInvalid = 8000,
    IntegrationNotConfigured = 8001,
    SyncFailed = 8002,

    // AI
    AiServiceUnavailable = 9000,
}
