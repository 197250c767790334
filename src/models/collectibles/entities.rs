use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    // 头像部位
    #[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
    pub enum CollectibleSlot("装扮部位") {
        Hat => "hat",
        Face => "face",
        Outfit => "outfit",
        Background => "background",
        Pet => "pet",
    }
}

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
    pub enum Rarity("稀有度") {
        Common => "common",
        Rare => "rare",
        Epic => "epic",
        Legendary => "legendary",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
pub struct Collectible {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub slot: CollectibleSlot,
    pub rarity: Rarity,
    pub price: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
pub struct CollectibleWithOwnership {
    #[serde(flatten)]
    #[ts(flatten)]
    pub collectible: Collectible,
    pub owned: bool,
    pub equipped: bool,
}
