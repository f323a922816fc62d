//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层和 CRUD 工厂使用这些实体进行读写，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod booths;
pub mod branches;
pub mod class_sessions;
pub mod class_types;
pub mod courses;
pub mod evaluations;
pub mod grades;
pub mod line_channels;
pub mod notifications;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod time_slots;
pub mod users;
