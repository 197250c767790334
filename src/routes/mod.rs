pub mod auth;

pub mod users;

pub mod classes;

pub mod class_users;

pub mod assignments;

pub mod submissions;

pub mod progression;

pub mod badges;

pub mod collectibles;

pub mod games;

pub mod leaderboard;

pub mod raffles;

pub mod notifications;

pub mod integrations;

pub mod tutor;

pub mod websocket;

pub mod frontend;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use badges::configure_badges_routes;
pub use classes::configure_classes_routes;
pub use collectibles::configure_collectibles_routes;
pub use frontend::configure_frontend_routes;
pub use games::configure_games_routes;
pub use integrations::configure_integrations_routes;
pub use leaderboard::configure_leaderboard_routes;
pub use notifications::configure_notifications_routes;
pub use progression::configure_progress_routes;
pub use raffles::configure_raffles_routes;
pub use submissions::configure_submissions_routes;
pub use tutor::configure_tutor_routes;
pub use users::configure_user_routes;
pub use websocket::configure_websocket_routes;
