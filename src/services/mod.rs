pub mod assignments;
pub mod auth;
pub mod badges;
pub mod class_users;
pub mod classes;
pub mod collectibles;
pub mod games;
pub mod integrations;
pub mod leaderboard;
pub mod notifications;
pub mod progression;
pub mod raffles;
pub mod submissions;
pub mod tutor;
pub mod users;
pub mod websocket;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use badges::BadgeService;
pub use class_users::ClassUserService;
pub use classes::ClassService;
pub use collectibles::CollectibleService;
pub use games::GameService;
pub use integrations::IntegrationService;
pub use leaderboard::LeaderboardService;
pub use notifications::NotificationService;
pub use progression::ProgressService;
pub use raffles::RaffleService;
pub use submissions::SubmissionService;
pub use tutor::TutorService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 取当前登录用户，未登录时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}
