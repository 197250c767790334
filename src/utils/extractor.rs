//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，解析失败直接返回统一格式的 400 响应。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let message = format!("Invalid path parameter: {name}");
            InternalError::from_response(
                message.clone(),
                HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
            )
            .into()
        })
}

macro_rules! safe_i64_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_i64(req, $param).map($name))
            }
        }
    };
}

safe_i64_extractor!(
    /// `{id}`
    SafeIdI64,
    "id"
);
safe_i64_extractor!(
    /// `{class_id}`
    SafeClassIdI64,
    "class_id"
);
safe_i64_extractor!(
    /// `{user_id}`
    SafeUserIdI64,
    "user_id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default()
            .param("class_id", "42")
            .to_http_request();
        let id = SafeClassIdI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeClassIdI64(42));
    }

    #[actix_web::test]
    async fn test_rejects_non_positive_and_garbage() {
        for raw in ["0", "-3", "abc", "1; DROP TABLE users"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIdI64::extract(&req).await.is_err(), "{raw}");
        }

        let req = TestRequest::default().to_http_request();
        assert!(SafeUserIdI64::extract(&req).await.is_err());
    }
}
