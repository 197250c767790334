use super::entities::RaffleStatus;
use crate::models::common::pagination::deserialize_opt_i64;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct CreateRaffleRequest {
    pub class_id: i64,
    pub title: String,
    pub prize: String,
    pub entry_cost: i64,
    pub max_entries_per_student: Option<i32>,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CreateRaffleRequest {
    pub fn validate(&self, now: chrono::DateTime<chrono::Utc>) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty");
        }
        if self.prize.trim().is_empty() {
            return Err("Prize cannot be empty");
        }
        if self.entry_cost < 1 {
            return Err("Entry cost must be at least 1 coin");
        }
        if self.max_entries_per_student.is_some_and(|max| max < 1) {
            return Err("Max entries per student must be at least 1");
        }
        if self.closes_at.is_some_and(|closes| closes <= now) {
            return Err("Closing time must be in the future");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct EnterRaffleRequest {
    #[serde(default = "default_entry_count")]
    pub count: i32,
}

fn default_entry_count() -> i32 {
    1
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/raffle.ts")]
pub struct RaffleListParams {
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub class_id: Option<i64>,
    pub status: Option<RaffleStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateRaffleRequest {
        CreateRaffleRequest {
            class_id: 1,
            title: "Friday prize".to_string(),
            prize: "Homework pass".to_string(),
            entry_cost: 5,
            max_entries_per_student: Some(3),
            closes_at: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(request().validate(chrono::Utc::now()).is_ok());
    }

    #[test]
    fn test_validate_rejects_free_entries_and_past_close() {
        let now = chrono::Utc::now();
        let mut req = request();
        req.entry_cost = 0;
        assert!(req.validate(now).is_err());

        let mut req = request();
        req.closes_at = Some(now - chrono::Duration::minutes(1));
        assert!(req.validate(now).is_err());

        let mut req = request();
        req.max_entries_per_student = Some(0);
        assert!(req.validate(now).is_err());
    }

    #[test]
    fn test_entry_count_defaults_to_one() {
        let req: EnterRaffleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.count, 1);
    }
}
