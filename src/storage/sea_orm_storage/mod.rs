//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod badges;
mod class_users;
mod classes;
mod collectibles;
mod games;
mod integrations;
mod leaderboard;
mod notifications;
mod progression;
mod raffles;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{ClassQuestError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 使用已建立（且已迁移）的连接
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ClassQuestError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ClassQuestError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ClassQuestError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ClassQuestError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// unix 秒
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_user_profile(
        &self,
        id: i64,
        display_name: Option<String>,
    ) -> Result<Option<User>> {
        self.update_user_profile_impl(id, display_name).await
    }

    async fn update_user_language(&self, id: i64, language: &str) -> Result<Option<User>> {
        self.update_user_language_impl(id, language).await
    }

    async fn update_user_avatar(&self, id: i64, avatar: &AvatarLoadout) -> Result<Option<User>> {
        self.update_user_avatar_impl(id, avatar).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 班级模块
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(teacher_id, class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_code(&self, invite_code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(invite_code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 班级成员模块
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
    ) -> Result<ClassUser> {
        self.join_class_impl(user_id, class_id, role).await
    }

    async fn leave_class(&self, user_id: i64, class_id: i64) -> Result<bool> {
        self.leave_class_impl(user_id, class_id).await
    }

    async fn list_class_members_with_pagination(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassMemberListResponse> {
        self.list_class_members_with_pagination_impl(class_id, query)
            .await
    }

    async fn get_class_user_by_user_id_and_class_id(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>> {
        self.get_class_user_by_user_id_and_class_id_impl(user_id, class_id)
            .await
    }

    async fn list_class_student_ids(&self, class_id: i64) -> Result<Vec<i64>> {
        self.list_class_student_ids_impl(class_id).await
    }

    async fn count_class_students(&self, class_id: i64) -> Result<i64> {
        self.count_class_students_impl(class_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, req).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 提交模块
    async fn upsert_submission(
        &self,
        assignment: &Assignment,
        student_id: i64,
        content: String,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment, student_id, content)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission_for_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_for_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<SubmissionListResponse> {
        self.list_assignment_submissions_impl(assignment_id, page, size)
            .await
    }

    async fn list_student_submissions(
        &self,
        student_id: i64,
        page: u64,
        size: u64,
    ) -> Result<MySubmissionListResponse> {
        self.list_student_submissions_impl(student_id, page, size)
            .await
    }

    async fn count_assignment_submissions(&self, assignment_id: i64) -> Result<i64> {
        self.count_assignment_submissions_impl(assignment_id).await
    }

    async fn grade_submission(
        &self,
        input: GradeSubmissionInput,
        xp_per_level: i64,
    ) -> Result<GradeResult> {
        self.grade_submission_impl(input, xp_per_level).await
    }

    // 经验与金币
    async fn list_ledger_with_pagination(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> Result<LedgerListResponse> {
        self.list_ledger_with_pagination_impl(user_id, page, size)
            .await
    }

    // 徽章模块
    async fn list_badges(&self) -> Result<Vec<Badge>> {
        self.list_badges_impl().await
    }

    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<(i64, i64)>> {
        self.list_user_badges_impl(user_id).await
    }

    async fn count_user_badges(&self, user_id: i64) -> Result<i64> {
        self.count_user_badges_impl(user_id).await
    }

    async fn get_user_stats(&self, user_id: i64) -> Result<UserStats> {
        self.get_user_stats_impl(user_id).await
    }

    async fn award_badge(&self, user_id: i64, badge: &Badge, xp_per_level: i64) -> Result<bool> {
        self.award_badge_impl(user_id, badge, xp_per_level).await
    }

    // 装扮模块
    async fn list_collectibles(&self, slot: Option<CollectibleSlot>) -> Result<Vec<Collectible>> {
        self.list_collectibles_impl(slot).await
    }

    async fn get_collectible_by_id(&self, collectible_id: i64) -> Result<Option<Collectible>> {
        self.get_collectible_by_id_impl(collectible_id).await
    }

    async fn list_owned_collectible_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.list_owned_collectible_ids_impl(user_id).await
    }

    async fn purchase_collectible(
        &self,
        user_id: i64,
        collectible: &Collectible,
        xp_per_level: i64,
    ) -> Result<i64> {
        self.purchase_collectible_impl(user_id, collectible, xp_per_level)
            .await
    }

    // 小游戏模块
    async fn record_game_session(
        &self,
        session: NewGameSession,
        xp_per_level: i64,
    ) -> Result<(GameSession, BalanceChange)> {
        self.record_game_session_impl(session, xp_per_level).await
    }

    async fn list_game_sessions(
        &self,
        user_id: i64,
        game_kind: Option<GameKind>,
        page: u64,
        size: u64,
    ) -> Result<GameSessionListResponse> {
        self.list_game_sessions_impl(user_id, game_kind, page, size)
            .await
    }

    // 排行榜
    async fn list_leaderboard_candidates(
        &self,
        class_id: Option<i64>,
        since: Option<i64>,
    ) -> Result<Vec<LeaderboardCandidate>> {
        self.list_leaderboard_candidates_impl(class_id, since).await
    }

    // 抽奖模块
    async fn create_raffle(&self, created_by: i64, req: CreateRaffleRequest) -> Result<Raffle> {
        self.create_raffle_impl(created_by, req).await
    }

    async fn get_raffle_by_id(&self, raffle_id: i64) -> Result<Option<Raffle>> {
        self.get_raffle_by_id_impl(raffle_id).await
    }

    async fn list_raffles(
        &self,
        class_ids: Option<Vec<i64>>,
        status: Option<RaffleStatus>,
    ) -> Result<Vec<Raffle>> {
        self.list_raffles_impl(class_ids, status).await
    }

    async fn list_raffle_entries(&self, raffle_id: i64) -> Result<Vec<RaffleEntry>> {
        self.list_raffle_entries_impl(raffle_id).await
    }

    async fn enter_raffle(
        &self,
        raffle_id: i64,
        user_id: i64,
        count: i32,
        xp_per_level: i64,
    ) -> Result<(RaffleEntry, i64)> {
        self.enter_raffle_impl(raffle_id, user_id, count, xp_per_level)
            .await
    }

    async fn draw_raffle(&self, raffle_id: i64, seed: u64) -> Result<DrawOutcome> {
        self.draw_raffle_impl(raffle_id, seed).await
    }

    async fn cancel_raffle(&self, raffle_id: i64, xp_per_level: i64) -> Result<(Raffle, i64, i64)> {
        self.cancel_raffle_impl(raffle_id, xp_per_level).await
    }

    // 通知模块
    async fn create_notifications(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>> {
        self.create_notifications_impl(reqs).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        unread_only: bool,
        page: u64,
        size: u64,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, unread_only, page, size)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_as_read(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        self.mark_notification_as_read_impl(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_as_read_impl(user_id).await
    }

    async fn delete_notification(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.delete_notification_impl(notification_id, user_id)
            .await
    }

    // 第三方集成
    async fn apply_webhook_payload(&self, payload: &WebhookPayload) -> Result<Option<(i64, i64)>> {
        self.apply_webhook_payload_impl(payload).await
    }

    async fn list_external_students(
        &self,
        search: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<ExternalStudentListResponse> {
        self.list_external_students_impl(search, page, size).await
    }

    async fn create_sync_run(&self, id: &str, triggered_by: Option<i64>) -> Result<SyncRun> {
        self.create_sync_run_impl(id, triggered_by).await
    }

    async fn finish_sync_run(
        &self,
        id: &str,
        status: SyncStatus,
        records_sent: i32,
        error: Option<String>,
    ) -> Result<Option<SyncRun>> {
        self.finish_sync_run_impl(id, status, records_sent, error)
            .await
    }

    async fn last_successful_sync_started_at(&self) -> Result<Option<i64>> {
        self.last_successful_sync_started_at_impl().await
    }

    async fn list_sync_runs(&self, page: u64, size: u64) -> Result<SyncRunListResponse> {
        self.list_sync_runs_impl(page, size).await
    }

    async fn collect_sync_records(&self, since: Option<i64>) -> Result<Vec<SyncRecord>> {
        self.collect_sync_records_impl(since).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::progression::entities::{LedgerSource, RewardGrant};
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    /// 单连接的内存 SQLite，已执行迁移
    pub async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt).await.expect("connect in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        SeaOrmStorage::from_connection(db)
    }

    pub async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@school.test"),
                password: "hash".to_string(),
                role,
                display_name: None,
                language: None,
            })
            .await
            .expect("create user")
    }

    /// 直接发放金币，便于测试消费逻辑
    pub async fn give_coins(storage: &SeaOrmStorage, user_id: i64, coins: i64) {
        storage
            .apply_reward_impl(
                RewardGrant {
                    user_id,
                    xp_delta: 0,
                    coin_delta: coins,
                    source: LedgerSource::Assignment,
                    reference_id: None,
                },
                100,
            )
            .await
            .expect("grant coins");
    }
}
