use super::entities::CollectibleSlot;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/collectible.ts")]
pub struct CollectibleListParams {
    pub slot: Option<CollectibleSlot>,
}
