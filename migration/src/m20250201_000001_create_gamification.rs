use sea_orm_migration::prelude::*;

use crate::m20250123_000001_create_tables::{Classes, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 奖励流水表 ====================
        manager
            .create_table(
                Table::create()
                    .table(RewardLedger::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardLedger::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RewardLedger::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(RewardLedger::XpDelta)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RewardLedger::CoinDelta)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(RewardLedger::Source).string().not_null())
                    .col(ColumnDef::new(RewardLedger::ReferenceId).big_integer().null())
                    .col(
                        ColumnDef::new(RewardLedger::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RewardLedger::Table, RewardLedger::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reward_ledger_user_created")
                    .table(RewardLedger::Table)
                    .col(RewardLedger::UserId)
                    .col(RewardLedger::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 徽章 ====================
        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Badges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Badges::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Badges::Name).string().not_null())
                    .col(ColumnDef::new(Badges::Description).text().not_null())
                    .col(ColumnDef::new(Badges::Icon).string().not_null())
                    .col(ColumnDef::new(Badges::CriterionKind).string().not_null())
                    .col(ColumnDef::new(Badges::Threshold).big_integer().not_null())
                    .col(
                        ColumnDef::new(Badges::CoinBonus)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Badges::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserBadges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBadges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserBadges::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserBadges::BadgeId).big_integer().not_null())
                    .col(ColumnDef::new(UserBadges::EarnedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserBadges::Table, UserBadges::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserBadges::Table, UserBadges::BadgeId)
                            .to(Badges::Table, Badges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_user_badges_user_badge")
                    .table(UserBadges::Table)
                    .col(UserBadges::UserId)
                    .col(UserBadges::BadgeId)
                    .to_owned(),
            )
            .await?;

        // ==================== 收藏品（头像装扮） ====================
        manager
            .create_table(
                Table::create()
                    .table(Collectibles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collectibles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Collectibles::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Collectibles::Name).string().not_null())
                    .col(ColumnDef::new(Collectibles::Description).text().null())
                    .col(ColumnDef::new(Collectibles::Slot).string().not_null())
                    .col(ColumnDef::new(Collectibles::Rarity).string().not_null())
                    .col(ColumnDef::new(Collectibles::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Collectibles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Collectibles::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserCollectibles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserCollectibles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserCollectibles::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCollectibles::CollectibleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCollectibles::AcquiredAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserCollectibles::Table, UserCollectibles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserCollectibles::Table, UserCollectibles::CollectibleId)
                            .to(Collectibles::Table, Collectibles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_user_collectibles_user_item")
                    .table(UserCollectibles::Table)
                    .col(UserCollectibles::UserId)
                    .col(UserCollectibles::CollectibleId)
                    .to_owned(),
            )
            .await?;

        // ==================== 小游戏记录 ====================
        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameSessions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(GameSessions::GameKind).string().not_null())
                    .col(ColumnDef::new(GameSessions::Total).integer().not_null())
                    .col(ColumnDef::new(GameSessions::Correct).integer().not_null())
                    .col(ColumnDef::new(GameSessions::BestStreak).integer().not_null())
                    .col(
                        ColumnDef::new(GameSessions::SecondsRemaining)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(GameSessions::Score).big_integer().not_null())
                    .col(ColumnDef::new(GameSessions::Accuracy).integer().not_null())
                    .col(
                        ColumnDef::new(GameSessions::XpAwarded)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::CoinsAwarded)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameSessions::PlayedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(GameSessions::Table, GameSessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_game_sessions_user_played")
                    .table(GameSessions::Table)
                    .col(GameSessions::UserId)
                    .col(GameSessions::PlayedAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 抽奖 ====================
        manager
            .create_table(
                Table::create()
                    .table(Raffles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Raffles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Raffles::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Raffles::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Raffles::Title).string().not_null())
                    .col(ColumnDef::new(Raffles::Prize).text().not_null())
                    .col(ColumnDef::new(Raffles::EntryCost).big_integer().not_null())
                    .col(
                        ColumnDef::new(Raffles::MaxEntriesPerStudent)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Raffles::Status).string().not_null())
                    .col(ColumnDef::new(Raffles::ClosesAt).big_integer().null())
                    .col(ColumnDef::new(Raffles::WinnerId).big_integer().null())
                    .col(ColumnDef::new(Raffles::DrawnAt).big_integer().null())
                    .col(ColumnDef::new(Raffles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Raffles::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Raffles::Table, Raffles::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Raffles::Table, Raffles::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RaffleEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RaffleEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::RaffleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RaffleEntries::UserId).big_integer().not_null())
                    .col(ColumnDef::new(RaffleEntries::Entries).integer().not_null())
                    .col(
                        ColumnDef::new(RaffleEntries::CoinsSpent)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RaffleEntries::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RaffleEntries::Table, RaffleEntries::RaffleId)
                            .to(Raffles::Table, Raffles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RaffleEntries::Table, RaffleEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_raffle_entries_raffle_user")
                    .table(RaffleEntries::Table)
                    .col(RaffleEntries::RaffleId)
                    .col(RaffleEntries::UserId)
                    .to_owned(),
            )
            .await?;

        // ==================== 插入默认徽章与收藏品 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_badges = [
            ("first_steps", "First Steps", "Turn in your first assignment", "footprints", "submissions_count", 1, 10),
            ("homework_hero", "Homework Hero", "Turn in 10 assignments", "backpack", "submissions_count", 10, 50),
            ("perfectionist", "Perfectionist", "Get a perfect score on an assignment", "star", "perfect_scores", 1, 25),
            ("flawless_five", "Flawless Five", "Get 5 perfect scores", "sparkles", "perfect_scores", 5, 75),
            ("rising_star", "Rising Star", "Earn 500 XP", "rocket", "xp_total", 500, 30),
            ("xp_legend", "XP Legend", "Earn 5000 XP", "crown", "xp_total", 5000, 150),
            ("game_on", "Game On", "Finish your first mini-game", "gamepad", "games_played", 1, 5),
            ("arcade_regular", "Arcade Regular", "Finish 25 mini-games", "joystick", "games_played", 25, 40),
            ("hot_streak", "Hot Streak", "Answer 10 in a row correctly", "flame", "best_streak", 10, 20),
            ("lucky_winner", "Lucky Winner", "Win a class raffle", "clover", "raffle_wins", 1, 20),
        ];

        for (code, name, description, icon, kind, threshold, coin_bonus) in default_badges {
            let insert = Query::insert()
                .into_table(Badges::Table)
                .columns([
                    Badges::Code,
                    Badges::Name,
                    Badges::Description,
                    Badges::Icon,
                    Badges::CriterionKind,
                    Badges::Threshold,
                    Badges::CoinBonus,
                    Badges::CreatedAt,
                ])
                .values_panic([
                    code.into(),
                    name.into(),
                    description.into(),
                    icon.into(),
                    kind.into(),
                    (threshold as i64).into(),
                    (coin_bonus as i32).into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        let default_collectibles = [
            ("baseball_cap", "Baseball Cap", "hat", "common", 40),
            ("wizard_hat", "Wizard Hat", "hat", "rare", 120),
            ("golden_crown", "Golden Crown", "hat", "legendary", 600),
            ("star_glasses", "Star Glasses", "face", "common", 30),
            ("pirate_patch", "Pirate Patch", "face", "rare", 90),
            ("school_hoodie", "School Hoodie", "outfit", "common", 60),
            ("space_suit", "Space Suit", "outfit", "epic", 300),
            ("forest_trail", "Forest Trail", "background", "common", 50),
            ("galaxy_swirl", "Galaxy Swirl", "background", "epic", 250),
            ("robot_pup", "Robot Pup", "pet", "rare", 150),
            ("baby_dragon", "Baby Dragon", "pet", "legendary", 800),
        ];

        for (code, name, slot, rarity, price) in default_collectibles {
            let insert = Query::insert()
                .into_table(Collectibles::Table)
                .columns([
                    Collectibles::Code,
                    Collectibles::Name,
                    Collectibles::Slot,
                    Collectibles::Rarity,
                    Collectibles::Price,
                    Collectibles::IsActive,
                    Collectibles::CreatedAt,
                ])
                .values_panic([
                    code.into(),
                    name.into(),
                    slot.into(),
                    rarity.into(),
                    (price as i64).into(),
                    true.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RaffleEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Raffles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserCollectibles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collectibles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBadges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Badges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RewardLedger::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum RewardLedger {
    #[sea_orm(iden = "reward_ledger")]
    Table,
    Id,
    UserId,
    XpDelta,
    CoinDelta,
    Source,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Badges {
    #[sea_orm(iden = "badges")]
    Table,
    Id,
    Code,
    Name,
    Description,
    Icon,
    CriterionKind,
    Threshold,
    CoinBonus,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserBadges {
    #[sea_orm(iden = "user_badges")]
    Table,
    Id,
    UserId,
    BadgeId,
    EarnedAt,
}

#[derive(DeriveIden)]
enum Collectibles {
    #[sea_orm(iden = "collectibles")]
    Table,
    Id,
    Code,
    Name,
    Description,
    Slot,
    Rarity,
    Price,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserCollectibles {
    #[sea_orm(iden = "user_collectibles")]
    Table,
    Id,
    UserId,
    CollectibleId,
    AcquiredAt,
}

#[derive(DeriveIden)]
enum GameSessions {
    #[sea_orm(iden = "game_sessions")]
    Table,
    Id,
    UserId,
    GameKind,
    Total,
    Correct,
    BestStreak,
    SecondsRemaining,
    Score,
    Accuracy,
    XpAwarded,
    CoinsAwarded,
    PlayedAt,
}

#[derive(DeriveIden)]
enum Raffles {
    #[sea_orm(iden = "raffles")]
    Table,
    Id,
    ClassId,
    CreatedBy,
    Title,
    Prize,
    EntryCost,
    MaxEntriesPerStudent,
    Status,
    ClosesAt,
    WinnerId,
    DrawnAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RaffleEntries {
    #[sea_orm(iden = "raffle_entries")]
    Table,
    Id,
    RaffleId,
    UserId,
    Entries,
    CoinsSpent,
    CreatedAt,
    UpdatedAt,
}
