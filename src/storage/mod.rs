use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    badges::entities::{Badge, UserStats},
    class_users::{
        entities::{ClassUser, ClassUserRole},
        requests::ClassUserQuery,
        responses::ClassMemberListResponse,
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    collectibles::entities::{Collectible, CollectibleSlot},
    games::{
        entities::{GameKind, GameSession, NewGameSession},
        responses::GameSessionListResponse,
    },
    integrations::{
        entities::{SyncRecord, SyncRun, SyncStatus},
        requests::WebhookPayload,
        responses::{ExternalStudentListResponse, SyncRunListResponse},
    },
    leaderboard::entities::LeaderboardCandidate,
    notifications::{
        entities::Notification, requests::CreateNotificationRequest,
        responses::NotificationListResponse,
    },
    progression::{
        entities::BalanceChange,
        responses::LedgerListResponse,
    },
    raffles::{
        entities::{DrawOutcome, Raffle, RaffleEntry, RaffleStatus},
        requests::CreateRaffleRequest,
    },
    submissions::{
        entities::{GradeResult, GradeSubmissionInput, Submission},
        responses::{MySubmissionListResponse, SubmissionListResponse},
    },
    users::{
        entities::{AvatarLoadout, User},
        requests::{CreateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新显示名
    async fn update_user_profile(
        &self,
        id: i64,
        display_name: Option<String>,
    ) -> Result<Option<User>>;
    // 更新语言偏好
    async fn update_user_language(&self, id: i64, language: &str) -> Result<Option<User>>;
    // 更新头像装扮
    async fn update_user_avatar(&self, id: i64, avatar: &AvatarLoadout) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 班级管理方法
    // 创建班级，教师同时成为班级成员
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过邀请码获取班级信息
    async fn get_class_by_code(&self, invite_code: &str) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 更新班级信息
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    // 删除班级
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级成员管理方法
    // 加入班级
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
    ) -> Result<ClassUser>;
    // 离开/踢出班级
    async fn leave_class(&self, user_id: i64, class_id: i64) -> Result<bool>;
    // 列出班级成员
    async fn list_class_members_with_pagination(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassMemberListResponse>;
    // 获取用户在班级中的信息
    async fn get_class_user_by_user_id_and_class_id(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>>;
    // 班级内全部学生 ID
    async fn list_class_student_ids(&self, class_id: i64) -> Result<Vec<i64>>;
    // 班级学生数
    async fn count_class_students(&self, class_id: i64) -> Result<i64>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交与评分方法
    // 提交或覆盖未评分的提交
    async fn upsert_submission(
        &self,
        assignment: &Assignment,
        student_id: i64,
        content: String,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_submission_for_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<SubmissionListResponse>;
    async fn list_student_submissions(
        &self,
        student_id: i64,
        page: u64,
        size: u64,
    ) -> Result<MySubmissionListResponse>;
    async fn count_assignment_submissions(&self, assignment_id: i64) -> Result<i64>;
    // 评分并在首次评分时发放奖励（同一事务）
    async fn grade_submission(
        &self,
        input: GradeSubmissionInput,
        xp_per_level: i64,
    ) -> Result<GradeResult>;

    /// 经验与金币
    async fn list_ledger_with_pagination(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> Result<LedgerListResponse>;

    /// 徽章
    async fn list_badges(&self) -> Result<Vec<Badge>>;
    // 已获得徽章 (badge_id, earned_at)
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<(i64, i64)>>;
    async fn count_user_badges(&self, user_id: i64) -> Result<i64>;
    async fn get_user_stats(&self, user_id: i64) -> Result<UserStats>;
    // 授予徽章并发放金币奖励；已拥有时返回 false
    async fn award_badge(&self, user_id: i64, badge: &Badge, xp_per_level: i64) -> Result<bool>;

    /// 头像装扮
    async fn list_collectibles(&self, slot: Option<CollectibleSlot>) -> Result<Vec<Collectible>>;
    async fn get_collectible_by_id(&self, collectible_id: i64) -> Result<Option<Collectible>>;
    async fn list_owned_collectible_ids(&self, user_id: i64) -> Result<Vec<i64>>;
    // 扣金币并加入背包，返回剩余金币
    async fn purchase_collectible(
        &self,
        user_id: i64,
        collectible: &Collectible,
        xp_per_level: i64,
    ) -> Result<i64>;

    /// 小游戏
    async fn record_game_session(
        &self,
        session: NewGameSession,
        xp_per_level: i64,
    ) -> Result<(GameSession, BalanceChange)>;
    async fn list_game_sessions(
        &self,
        user_id: i64,
        game_kind: Option<GameKind>,
        page: u64,
        size: u64,
    ) -> Result<GameSessionListResponse>;

    /// 排行榜
    // since 为 None 时按总经验，否则按该时刻以来流水中的经验
    async fn list_leaderboard_candidates(
        &self,
        class_id: Option<i64>,
        since: Option<i64>,
    ) -> Result<Vec<LeaderboardCandidate>>;

    /// 班级抽奖
    async fn create_raffle(&self, created_by: i64, req: CreateRaffleRequest) -> Result<Raffle>;
    async fn get_raffle_by_id(&self, raffle_id: i64) -> Result<Option<Raffle>>;
    async fn list_raffles(
        &self,
        class_ids: Option<Vec<i64>>,
        status: Option<RaffleStatus>,
    ) -> Result<Vec<Raffle>>;
    async fn list_raffle_entries(&self, raffle_id: i64) -> Result<Vec<RaffleEntry>>;
    // 购买抽奖券，返回 (记录, 剩余金币)
    async fn enter_raffle(
        &self,
        raffle_id: i64,
        user_id: i64,
        count: i32,
        xp_per_level: i64,
    ) -> Result<(RaffleEntry, i64)>;
    // 仅 open 状态可开奖，抽取与写入中奖者在同一事务
    async fn draw_raffle(&self, raffle_id: i64, seed: u64) -> Result<DrawOutcome>;
    // 取消并退款，返回 (抽奖, 退款学生数, 退款金币)
    async fn cancel_raffle(&self, raffle_id: i64, xp_per_level: i64) -> Result<(Raffle, i64, i64)>;

    /// 通知
    async fn create_notifications(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        page: u64,
        size: u64,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_as_read(&self, notification_id: i64, user_id: i64)
    -> Result<bool>;
    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool>;

    /// 第三方集成
    // 处理名册推送；重放事件返回 None
    async fn apply_webhook_payload(&self, payload: &WebhookPayload) -> Result<Option<(i64, i64)>>;
    async fn list_external_students(
        &self,
        search: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<ExternalStudentListResponse>;
    async fn create_sync_run(&self, id: &str, triggered_by: Option<i64>) -> Result<SyncRun>;
    async fn finish_sync_run(
        &self,
        id: &str,
        status: SyncStatus,
        records_sent: i32,
        error: Option<String>,
    ) -> Result<Option<SyncRun>>;
    async fn last_successful_sync_started_at(&self) -> Result<Option<i64>>;
    async fn list_sync_runs(&self, page: u64, size: u64) -> Result<SyncRunListResponse>;
    // 已关联学生自某时刻起的评分记录
    async fn collect_sync_records(&self, since: Option<i64>) -> Result<Vec<SyncRecord>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
