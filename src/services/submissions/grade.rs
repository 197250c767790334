use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use super::detail::load_submission;
use crate::config::{AppConfig, GamificationConfig};
use crate::models::assignments::entities::Assignment;
use crate::models::common::response::error_response_with;
use crate::models::notifications::entities::{NotificationType, ReferenceType};
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::models::progression::entities::{LedgerSource, RewardGrant};
use crate::models::submissions::entities::{GradeSubmissionInput, Submission};
use crate::models::submissions::requests::{GradeSubmissionRequest, validate_score};
use crate::models::submissions::responses::GradeSubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::classes::access::require_class_manager;
use crate::services::current_user;
use crate::services::notifications::dispatch_notifications;
use crate::services::progression::settle_reward;

const MAX_FEEDBACK_CHARS: usize = 5_000;

/// 评分奖励 (xp, coins)
///
/// 经验按得分率折算满分经验并四舍五入，按时提交另加奖励；
/// 得分率达到 `coin_reward_ratio` 时给全部金币。
pub fn compute_grade_reward(
    assignment: &Assignment,
    is_late: bool,
    score: f64,
    rules: &GamificationConfig,
) -> (i64, i64) {
    let ratio = if assignment.max_score > 0.0 {
        (score / assignment.max_score).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut xp = (f64::from(assignment.xp_reward) * ratio).round() as i64;
    if !is_late {
        xp += rules.on_time_bonus_xp;
    }
    let coins = if ratio >= rules.coin_reward_ratio {
        i64::from(assignment.coin_reward)
    } else {
        0
    };
    (xp, coins)
}

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let rules = &AppConfig::get().gamification;

    let submission = match load_submission(&storage, submission_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };
    let assignment = match load_assignment(&storage, submission.assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_class_manager(&storage, &user, assignment.class_id).await {
        return Ok(resp);
    }

    if let Err(msg) = validate_score(req.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionScoreInvalid, msg)));
    }
    let feedback = req
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    if feedback
        .as_ref()
        .is_some_and(|f| f.chars().count() > MAX_FEEDBACK_CHARS)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Feedback must be at most {MAX_FEEDBACK_CHARS} characters"),
        )));
    }

    let (xp, coins) = compute_grade_reward(&assignment, submission.is_late, req.score, rules);
    let input = GradeSubmissionInput {
        submission_id: submission.id,
        graded_by: user.id,
        score: req.score,
        feedback,
        reward: RewardGrant {
            user_id: submission.student_id,
            xp_delta: xp,
            coin_delta: coins,
            source: LedgerSource::Assignment,
            reference_id: Some(assignment.id),
        },
    };

    let result = match storage.grade_submission(input, rules.xp_per_level).await {
        Ok(result) => result,
        Err(e) => return Ok(error_response_with(&e, ErrorCode::SubmissionNotFound)),
    };
    info!(
        "Submission {} graded {} by {} (first grading: {})",
        submission.id,
        req.score,
        user.id,
        result.balance.is_some()
    );

    dispatch_notifications(
        &storage,
        vec![graded_notification(&result.submission, &assignment)],
    )
    .await;

    // 重复评分不再发奖励
    let rewards = match result.balance {
        Some(balance) => Some(
            settle_reward(
                &storage,
                submission.student_id,
                xp,
                coins,
                balance,
                rules.xp_per_level,
            )
            .await,
        ),
        None => None,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeSubmissionResponse {
            submission: result.submission,
            rewards,
        },
        "Submission graded successfully",
    )))
}

fn graded_notification(submission: &Submission, assignment: &Assignment) -> CreateNotificationRequest {
    let score = submission.score.unwrap_or_default();
    CreateNotificationRequest::new(
        submission.student_id,
        NotificationType::SubmissionGraded,
        format!("Graded: {}", assignment.title),
    )
    .content(format!("Score {} / {}", score, assignment.max_score))
    .reference(ReferenceType::Submission, submission.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(max_score: f64, xp_reward: i32, coin_reward: i32) -> Assignment {
        let now = chrono::Utc::now();
        Assignment {
            id: 1,
            class_id: 1,
            created_by: 1,
            title: "Fractions".to_string(),
            description: None,
            max_score,
            due_at: None,
            xp_reward,
            coin_reward,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_marks_on_time() {
        let rules = GamificationConfig::default();
        let (xp, coins) = compute_grade_reward(&assignment(100.0, 50, 20), false, 100.0, &rules);
        assert_eq!(xp, 50 + rules.on_time_bonus_xp);
        assert_eq!(coins, 20);
    }

    #[test]
    fn test_late_gets_no_bonus() {
        let rules = GamificationConfig::default();
        let (xp, _) = compute_grade_reward(&assignment(100.0, 50, 20), true, 100.0, &rules);
        assert_eq!(xp, 50);
    }

    #[test]
    fn test_xp_is_rounded_proportionally() {
        let rules = GamificationConfig::default();
        // 50 * 7/9 = 38.89
        let (xp, _) = compute_grade_reward(&assignment(9.0, 50, 0), true, 7.0, &rules);
        assert_eq!(xp, 39);
    }

    #[test]
    fn test_coin_threshold_is_inclusive() {
        let rules = GamificationConfig::default();
        let (_, at_threshold) = compute_grade_reward(&assignment(10.0, 10, 15), true, 6.0, &rules);
        let (_, below) = compute_grade_reward(&assignment(10.0, 10, 15), true, 5.5, &rules);
        assert_eq!(at_threshold, 15);
        assert_eq!(below, 0);
    }

    #[test]
    fn test_zero_score_keeps_on_time_bonus() {
        let rules = GamificationConfig::default();
        let (xp, coins) = compute_grade_reward(&assignment(100.0, 50, 20), false, 0.0, &rules);
        assert_eq!(xp, rules.on_time_bonus_xp);
        assert_eq!(coins, 0);
    }
}
