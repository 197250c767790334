//! 提交与评分存储操作

use super::progression::apply_grant;
use super::{SeaOrmStorage, now_ts};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    PaginationInfo,
    assignments::entities::Assignment,
    submissions::{
        entities::{
            GradeResult, GradeSubmissionInput, Submission, SubmissionStatus, SubmissionWithStudent,
        },
        responses::{MySubmissionListResponse, SubmissionListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 提交作业
    ///
    /// 每个学生每份作业只有一条提交：未评分时覆盖内容，已评分后拒绝。
    pub async fn upsert_submission_impl(
        &self,
        assignment: &Assignment,
        student_id: i64,
        content: String,
    ) -> Result<Submission> {
        let now = chrono::Utc::now();
        let is_late = assignment.is_past_due(now);
        let now = now.timestamp();

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment.id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交失败: {e}")))?;

        let saved = match existing {
            Some(model) => {
                if model.status == SubmissionStatus::Graded.to_string() {
                    return Err(ClassQuestError::invalid_state(
                        "Submission has already been graded",
                    ));
                }
                let mut active = model.into_active_model();
                active.content = Set(content);
                active.is_late = Set(is_late);
                active.submitted_at = Set(now);
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| ClassQuestError::database_operation(format!("更新提交失败: {e}")))?
            }
            None => ActiveModel {
                assignment_id: Set(assignment.id),
                student_id: Set(student_id),
                content: Set(content),
                is_late: Set(is_late),
                status: Set(SubmissionStatus::Submitted.to_string()),
                score: Set(None),
                feedback: Set(None),
                graded_by: Set(None),
                graded_at: Set(None),
                rewarded: Set(false),
                submitted_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("创建提交失败: {e}")))?,
        };

        Ok(saved.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_for_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 某作业的全部提交（教师视角）
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
        page: u64,
        size: u64,
    ) -> Result<SubmissionListResponse> {
        let paginator = Submissions::find()
            .find_also_related(Users)
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(UserColumn::Username)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交列表失败: {e}")))?;

        let items = rows
            .into_iter()
            .map(|(submission, student)| {
                let (student_username, student_display_name) = student
                    .map(|u| (u.username, u.display_name))
                    .unwrap_or_default();
                SubmissionWithStudent {
                    submission: submission.into_submission(),
                    student_username,
                    student_display_name,
                }
            })
            .collect();

        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 我的提交
    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
        page: u64,
        size: u64,
    ) -> Result<MySubmissionListResponse> {
        let paginator = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(MySubmissionListResponse {
            items: rows.into_iter().map(|m| m.into_submission()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn count_assignment_submissions_impl(&self, assignment_id: i64) -> Result<i64> {
        let count = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("统计提交数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 评分
    ///
    /// 首次评分时在同一事务内发放奖励并置 `rewarded`，重复评分只更新分数与评语。
    pub async fn grade_submission_impl(
        &self,
        input: GradeSubmissionInput,
        xp_per_level: i64,
    ) -> Result<GradeResult> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let model = Submissions::find_by_id(input.submission_id)
            .one(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| {
                ClassQuestError::not_found(format!("Submission {} not found", input.submission_id))
            })?;

        let first_reward = !model.rewarded;
        let now = now_ts();

        let mut active = model.into_active_model();
        active.status = Set(SubmissionStatus::Graded.to_string());
        active.score = Set(Some(input.score));
        active.feedback = Set(input.feedback);
        active.graded_by = Set(Some(input.graded_by));
        active.graded_at = Set(Some(now));
        active.updated_at = Set(now);
        if first_reward {
            active.rewarded = Set(true);
        }

        let saved = active
            .update(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("保存评分失败: {e}")))?;

        let balance = if first_reward {
            Some(apply_grant(&txn, &input.reward, xp_per_level).await?)
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(GradeResult {
            submission: saved.into_submission(),
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::models::progression::entities::{LedgerSource, RewardGrant};
    use crate::models::submissions::entities::{GradeSubmissionInput, SubmissionStatus};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_resubmit_then_grade_rewards_once() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "mr_lee", UserRole::Teacher).await;
        let student = seed_user(&storage, "ivy", UserRole::Student).await;
        let class = storage
            .create_class_impl(
                teacher.id,
                CreateClassRequest {
                    teacher_id: None,
                    name: "History".to_string(),
                    description: None,
                    grade_level: Some(5),
                },
            )
            .await
            .unwrap();
        let assignment = storage
            .create_assignment_impl(
                teacher.id,
                serde_json::from_value::<CreateAssignmentRequest>(serde_json::json!({
                    "class_id": class.id,
                    "title": "Ancient Egypt",
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        let first = storage
            .upsert_submission_impl(&assignment, student.id, "draft".to_string())
            .await
            .unwrap();
        let second = storage
            .upsert_submission_impl(&assignment, student.id, "final".to_string())
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.content, "final");
        assert!(!second.is_late);

        let input = |score: f64| GradeSubmissionInput {
            submission_id: second.id,
            graded_by: teacher.id,
            score,
            feedback: Some("Nice".to_string()),
            reward: RewardGrant {
                user_id: student.id,
                xp_delta: 60,
                coin_delta: 10,
                source: LedgerSource::Assignment,
                reference_id: Some(second.id),
            },
        };

        let graded = storage.grade_submission_impl(input(100.0), 100).await.unwrap();
        assert_eq!(graded.submission.status, SubmissionStatus::Graded);
        assert_eq!(graded.balance.map(|b| b.xp), Some(60));

        let regraded = storage.grade_submission_impl(input(80.0), 100).await.unwrap();
        assert!(regraded.balance.is_none());
        assert_eq!(regraded.submission.score, Some(80.0));

        let stored = storage.get_user_by_id_impl(student.id).await.unwrap().unwrap();
        assert_eq!((stored.xp, stored.coins), (60, 10));

        let err = storage
            .upsert_submission_impl(&assignment, student.id, "late edit".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E016");
        assert_eq!(
            storage
                .count_assignment_submissions_impl(assignment.id)
                .await
                .unwrap(),
            1
        );
    }
}
