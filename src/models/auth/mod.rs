pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, RegisterRequest};
pub use responses::{
    LoginResponse, RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
