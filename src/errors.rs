//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_classquest_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ClassQuestError {
            $($variant(String),)*
        }

        impl ClassQuestError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ClassQuestError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ClassQuestError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ClassQuestError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ClassQuestError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ClassQuestError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_classquest_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Resource Conflict"),
    InsufficientCoins("E015", "Insufficient Coins"),
    InvalidState("E016", "Invalid State"),
    ExternalService("E017", "External Service Error"),
}

impl ClassQuestError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ClassQuestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClassQuestError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ClassQuestError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            // 自定义错误直接保留原文
            sea_orm::DbErr::Custom(msg) => ClassQuestError::DatabaseOperation(msg),
            other => ClassQuestError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ClassQuestError {
    fn from(err: std::io::Error) -> Self {
        ClassQuestError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ClassQuestError {
    fn from(err: serde_json::Error) -> Self {
        ClassQuestError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ClassQuestError {
    fn from(err: chrono::ParseError) -> Self {
        ClassQuestError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for ClassQuestError {
    fn from(err: reqwest::Error) -> Self {
        ClassQuestError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassQuestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ClassQuestError::cache_connection("test").code(), "E001");
        assert_eq!(ClassQuestError::database_config("test").code(), "E003");
        assert_eq!(ClassQuestError::validation("test").code(), "E007");
        assert_eq!(ClassQuestError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_domain_error_codes() {
        assert_eq!(ClassQuestError::conflict("dup").code(), "E014");
        assert_eq!(ClassQuestError::insufficient_coins("poor").code(), "E015");
        assert_eq!(ClassQuestError::invalid_state("drawn").code(), "E016");
        assert_eq!(
            ClassQuestError::external_service("down").error_type(),
            "External Service Error"
        );
    }

    #[test]
    fn test_db_err_conversion() {
        let err: ClassQuestError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), "boom");

        let err: ClassQuestError = sea_orm::DbErr::RecordNotInserted.into();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), sea_orm::DbErr::RecordNotInserted.to_string());
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ClassQuestError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            ClassQuestError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ClassQuestError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = ClassQuestError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
