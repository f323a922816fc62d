//! TutorHub - 补习机构排课与运营管理后端
//!
//! 基于 Actix Web 与 SeaORM 构建。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `crud`: 通用资源 CRUD（校验、分页、筛选）
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 请求与响应模型
//! - `routes`: API 路由层
//! - `runtime`: 启动与关闭
//! - `services`: 业务逻辑层（导入、看板、通知等）
//! - `storage`: 数据存储层
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod crud;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
