//! 应用配置
//!
//! 加载顺序：`config.toml` → `config.{APP_ENV}.toml` → `CLASSQUEST_*` 环境变量。

mod r#impl;
mod structs;

pub use structs::*;
