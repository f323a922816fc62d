//! 应用配置
//!
//! 静态配置按以下顺序叠加：`config.toml` -> `config.<APP_ENV>.toml` ->
//! `TUTORHUB_*` 环境变量 -> 常用环境变量（`DATABASE_URL`、`JWT_SECRET` 等）。

mod r#impl;
mod structs;

pub use structs::*;
