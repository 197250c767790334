//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::badges::{ActiveModel as BadgeActiveModel, Entity as Badges, Model as BadgeModel};
pub use super::class_users::{
    ActiveModel as ClassUserActiveModel, Entity as ClassUsers, Model as ClassUserModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::collectibles::{
    ActiveModel as CollectibleActiveModel, Entity as Collectibles, Model as CollectibleModel,
};
pub use super::external_students::{
    ActiveModel as ExternalStudentActiveModel, Entity as ExternalStudents,
    Model as ExternalStudentModel,
};
pub use super::game_sessions::{
    ActiveModel as GameSessionActiveModel, Entity as GameSessions, Model as GameSessionModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::raffle_entries::{
    ActiveModel as RaffleEntryActiveModel, Entity as RaffleEntries, Model as RaffleEntryModel,
};
pub use super::raffles::{ActiveModel as RaffleActiveModel, Entity as Raffles, Model as RaffleModel};
pub use super::reward_ledger::{
    ActiveModel as LedgerActiveModel, Entity as RewardLedger, Model as LedgerModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::sync_runs::{ActiveModel as SyncRunActiveModel, Entity as SyncRuns, Model as SyncRunModel};
pub use super::user_badges::{
    ActiveModel as UserBadgeActiveModel, Entity as UserBadges, Model as UserBadgeModel,
};
pub use super::user_collectibles::{
    ActiveModel as UserCollectibleActiveModel, Entity as UserCollectibles,
    Model as UserCollectibleModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::webhook_events::{
    ActiveModel as WebhookEventActiveModel, Entity as WebhookEvents, Model as WebhookEventModel,
};
