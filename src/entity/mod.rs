//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assignments;
pub mod badges;
pub mod class_users;
pub mod classes;
pub mod collectibles;
pub mod external_students;
pub mod game_sessions;
pub mod notifications;
pub mod raffle_entries;
pub mod raffles;
pub mod reward_ledger;
pub mod submissions;
pub mod sync_runs;
pub mod user_badges;
pub mod user_collectibles;
pub mod users;
pub mod webhook_events;
