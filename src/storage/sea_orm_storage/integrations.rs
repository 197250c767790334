//! 第三方名册入站与成绩出站

use std::collections::HashMap;

use super::{SeaOrmStorage, now_ts};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::external_students::{
    ActiveModel as ExternalActiveModel, Column as ExternalColumn, Entity as ExternalStudents,
};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::sync_runs::{
    ActiveModel as SyncRunActiveModel, Column as SyncRunColumn, Entity as SyncRuns,
};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::entity::webhook_events::{ActiveModel as WebhookEventActiveModel, Entity as WebhookEvents};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    integrations::{
        entities::{SyncRecord, SyncRun, SyncStatus},
        requests::{ExternalStudentRecord, WebhookPayload},
        responses::{ExternalStudentListResponse, SyncRunListResponse},
    },
    submissions::entities::SubmissionStatus,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 按邮箱找本地用户，注册时邮箱已统一为小写
async fn match_user_by_email<C: ConnectionTrait>(
    conn: &C,
    email: Option<&str>,
) -> Result<Option<i64>> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };

    let user = Users::find()
        .filter(UserColumn::Email.eq(email.to_lowercase()))
        .one(conn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("匹配用户邮箱失败: {e}")))?;

    Ok(user.map(|u| u.id))
}

fn metadata_text(record: &ExternalStudentRecord) -> Option<String> {
    record
        .metadata
        .as_ref()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
}

impl SeaOrmStorage {
    /// 处理一次名册推送
    ///
    /// 事件 ID 已处理过时返回 None；否则返回 (处理条数, 关联到本地用户的条数)。
    pub async fn apply_webhook_payload_impl(
        &self,
        payload: &WebhookPayload,
    ) -> Result<Option<(i64, i64)>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let seen = WebhookEvents::find_by_id(payload.event_id.clone())
            .one(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询 webhook 事件失败: {e}")))?;
        if seen.is_some() {
            return Ok(None);
        }

        let now = now_ts();
        WebhookEventActiveModel {
            event_id: Set(payload.event_id.clone()),
            received_at: Set(now),
            record_count: Set(payload.students.len() as i32),
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("记录 webhook 事件失败: {e}")))?;

        let mut processed = 0;
        let mut linked = 0;
        for record in &payload.students {
            let external_id = record.external_id.trim().to_string();
            let user_id = match_user_by_email(&txn, record.email.as_deref()).await?;

            let existing = ExternalStudents::find()
                .filter(ExternalColumn::ExternalId.eq(external_id.clone()))
                .one(&txn)
                .await
                .map_err(|e| {
                    ClassQuestError::database_operation(format!("查询外部学生失败: {e}"))
                })?;

            match existing {
                Some(model) => {
                    let mut active = model.into_active_model();
                    active.first_name = Set(record.first_name.clone());
                    active.last_name = Set(record.last_name.clone());
                    active.email = Set(record.email.clone());
                    active.grade_level = Set(record.grade_level);
                    active.school = Set(record.school.clone());
                    active.metadata = Set(metadata_text(record));
                    active.user_id = Set(user_id);
                    active.last_synced_at = Set(now);
                    active.update(&txn).await
                }
                None => {
                    ExternalActiveModel {
                        external_id: Set(external_id),
                        first_name: Set(record.first_name.clone()),
                        last_name: Set(record.last_name.clone()),
                        email: Set(record.email.clone()),
                        grade_level: Set(record.grade_level),
                        school: Set(record.school.clone()),
                        metadata: Set(metadata_text(record)),
                        user_id: Set(user_id),
                        last_synced_at: Set(now),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(|e| ClassQuestError::database_operation(format!("写入外部学生失败: {e}")))?;

            processed += 1;
            if user_id.is_some() {
                linked += 1;
            }
        }

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some((processed, linked)))
    }

    pub async fn list_external_students_impl(
        &self,
        search: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<ExternalStudentListResponse> {
        let mut select = ExternalStudents::find();

        if let Some(search) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let escaped = escape_like_pattern(search);
            select = select.filter(
                Condition::any()
                    .add(ExternalColumn::FirstName.contains(&escaped))
                    .add(ExternalColumn::LastName.contains(&escaped))
                    .add(ExternalColumn::ExternalId.contains(&escaped))
                    .add(ExternalColumn::Email.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(ExternalColumn::LastName)
            .order_by_asc(ExternalColumn::FirstName)
            .order_by_asc(ExternalColumn::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            ClassQuestError::database_operation(format!("查询外部学生总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            ClassQuestError::database_operation(format!("查询外部学生页数失败: {e}"))
        })?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询外部学生失败: {e}")))?;

        Ok(ExternalStudentListResponse {
            items: rows
                .into_iter()
                .map(|m| m.into_external_student())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn create_sync_run_impl(
        &self,
        id: &str,
        triggered_by: Option<i64>,
    ) -> Result<SyncRun> {
        let result = SyncRunActiveModel {
            id: Set(id.to_string()),
            started_at: Set(now_ts()),
            finished_at: Set(None),
            status: Set(SyncStatus::Running.to_string()),
            records_sent: Set(0),
            error: Set(None),
            triggered_by: Set(triggered_by),
        }
        .insert(&self.db)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("创建同步记录失败: {e}")))?;

        Ok(result.into_sync_run())
    }

    pub async fn finish_sync_run_impl(
        &self,
        id: &str,
        status: SyncStatus,
        records_sent: i32,
        error: Option<String>,
    ) -> Result<Option<SyncRun>> {
        let Some(model) = SyncRuns::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询同步记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.status = Set(status.to_string());
        active.records_sent = Set(records_sent);
        active.error = Set(error);
        active.finished_at = Set(Some(now_ts()));

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("更新同步记录失败: {e}")))?;

        Ok(Some(updated.into_sync_run()))
    }

    /// 上次成功同步的开始时间，作为增量起点
    pub async fn last_successful_sync_started_at_impl(&self) -> Result<Option<i64>> {
        let result = SyncRuns::find()
            .filter(SyncRunColumn::Status.eq(SyncStatus::Succeeded.to_string()))
            .order_by_desc(SyncRunColumn::StartedAt)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询同步记录失败: {e}")))?;

        Ok(result.map(|m| m.started_at))
    }

    pub async fn list_sync_runs_impl(&self, page: u64, size: u64) -> Result<SyncRunListResponse> {
        let paginator = SyncRuns::find()
            .order_by_desc(SyncRunColumn::StartedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询同步总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询同步页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询同步记录失败: {e}")))?;

        Ok(SyncRunListResponse {
            items: rows.into_iter().map(|m| m.into_sync_run()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 自 `since` 以来评过分、且学生已关联外部名册的成绩
    pub async fn collect_sync_records_impl(&self, since: Option<i64>) -> Result<Vec<SyncRecord>> {
        let linked: Vec<(i64, String)> = ExternalStudents::find()
            .filter(ExternalColumn::UserId.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询外部学生失败: {e}")))?
            .into_iter()
            .filter_map(|m| m.user_id.map(|uid| (uid, m.external_id)))
            .collect();
        if linked.is_empty() {
            return Ok(Vec::new());
        }
        let external_ids: HashMap<i64, String> = linked.into_iter().collect();

        let mut select = Submissions::find()
            .find_also_related(Assignments)
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::Graded.to_string()))
            .filter(SubmissionColumn::StudentId.is_in(external_ids.keys().copied()));
        if let Some(since) = since {
            select = select.filter(SubmissionColumn::GradedAt.gt(since));
        }

        let rows = select
            .order_by_asc(SubmissionColumn::GradedAt)
            .order_by_asc(SubmissionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询待同步成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(submission, assignment)| {
                let assignment = assignment?;
                let score = submission.score?;
                let graded_at = submission.graded_at?;
                Some(SyncRecord {
                    external_id: external_ids.get(&submission.student_id)?.clone(),
                    assignment_id: assignment.id,
                    assignment_title: assignment.title,
                    score,
                    max_score: assignment.max_score,
                    graded_at: chrono::DateTime::<chrono::Utc>::from_timestamp(graded_at, 0)
                        .unwrap_or_default(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::integrations::{
        entities::SyncStatus,
        requests::{ExternalStudentRecord, WebhookPayload},
    };
    use crate::models::users::entities::UserRole;

    fn record(external_id: &str, email: Option<&str>) -> ExternalStudentRecord {
        ExternalStudentRecord {
            external_id: external_id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.map(str::to_string),
            grade_level: Some(4),
            school: Some("North Elementary".to_string()),
            metadata: Some(serde_json::json!({"homeroom": "4B"})),
        }
    }

    #[tokio::test]
    async fn test_webhook_upserts_links_and_deduplicates() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "ada", UserRole::Student).await;

        let payload = WebhookPayload {
            event_id: "evt-1".to_string(),
            students: vec![
                record("S-1", Some("ADA@school.test")),
                record("S-2", None),
            ],
        };
        assert_eq!(
            storage.apply_webhook_payload_impl(&payload).await.unwrap(),
            Some((2, 1))
        );
        // 重放
        assert_eq!(
            storage.apply_webhook_payload_impl(&payload).await.unwrap(),
            None
        );

        let mut updated = record("S-2", None);
        updated.first_name = "Grace".to_string();
        let payload = WebhookPayload {
            event_id: "evt-2".to_string(),
            students: vec![updated],
        };
        assert_eq!(
            storage.apply_webhook_payload_impl(&payload).await.unwrap(),
            Some((1, 0))
        );

        let linked = storage
            .list_external_students_impl(Some("S-1".to_string()), 1, 10)
            .await
            .unwrap()
            .items
            .remove(0);
        assert_eq!(linked.user_id, Some(user.id));
        assert_eq!(
            linked.metadata,
            Some(serde_json::json!({"homeroom": "4B"}))
        );

        let all = storage
            .list_external_students_impl(Some("grace".to_string()), 1, 10)
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 1);
        assert_eq!(all.items[0].external_id, "S-2");
    }

    #[tokio::test]
    async fn test_sync_runs_track_last_success() {
        let storage = memory_storage().await;
        assert_eq!(
            storage.last_successful_sync_started_at_impl().await.unwrap(),
            None
        );

        let run = storage.create_sync_run_impl("run-1", None).await.unwrap();
        assert_eq!(run.status, SyncStatus::Running);
        storage
            .finish_sync_run_impl("run-1", SyncStatus::Failed, 0, Some("timeout".to_string()))
            .await
            .unwrap();
        assert_eq!(
            storage.last_successful_sync_started_at_impl().await.unwrap(),
            None
        );

        storage.create_sync_run_impl("run-2", None).await.unwrap();
        let done = storage
            .finish_sync_run_impl("run-2", SyncStatus::Succeeded, 3, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.records_sent, 3);
        assert!(done.finished_at.is_some());
        assert!(
            storage
                .last_successful_sync_started_at_impl()
                .await
                .unwrap()
                .is_some()
        );

        assert!(
            storage
                .finish_sync_run_impl("missing", SyncStatus::Failed, 0, None)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(storage.list_sync_runs_impl(1, 10).await.unwrap().pagination.total, 2);
    }

    #[tokio::test]
    async fn test_collect_records_needs_linked_student() {
        let storage = memory_storage().await;
        assert!(storage.collect_sync_records_impl(None).await.unwrap().is_empty());
    }
}
