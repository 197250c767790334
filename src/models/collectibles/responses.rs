use super::entities::{Collectible, CollectibleWithOwnership};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
pub struct CollectibleListResponse {
    pub coins: i64,
    pub items: Vec<CollectibleWithOwnership>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
pub struct PurchaseResponse {
    pub collectible: Collectible,
    pub coins_remaining: i64,
}
