use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::models::{
    branches::entities::Branch,
    class_sessions::entities::ClassSession,
    courses::entities::Course,
    dashboard::responses::{BranchTotals, EntityTotals},
    notifications::entities::{Notification, NotificationStatus, ReminderSummary},
    students::entities::Student,
    teachers::entities::Teacher,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 底层数据库连接，供通用 CRUD 与导入使用
    fn connection(&self) -> &DatabaseConnection;
    // 数据库连通性检查
    async fn ping(&self) -> bool;

    /// 用户管理方法
    // 创建用户（密码需已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息（登录）
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 仪表盘统计方法
    // 各实体总数
    async fn count_entities(&self) -> Result<EntityTotals>;
    // 按校区统计，branch_id 为空时返回全部校区
    async fn branch_totals(&self, branch_id: Option<i64>, date: &str) -> Result<Vec<BranchTotals>>;
    // 某日课次数（不含已取消）
    async fn count_sessions_on(&self, date: &str, branch_id: Option<i64>) -> Result<u64>;
    // 按状态统计通知
    async fn count_notifications_by_status(&self, status: NotificationStatus) -> Result<u64>;
    async fn get_branch_by_id(&self, id: i64) -> Result<Option<Branch>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    // 讲师在日期区间内的课次
    async fn list_teacher_sessions(
        &self,
        teacher_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClassSession>>;
    // 学生在日期区间内的课次
    async fn list_student_sessions(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClassSession>>;
    // 讲师在某日有效选课中的学生数（去重）
    async fn count_teacher_students(&self, teacher_id: i64, date: &str) -> Result<u64>;
    // 学生在某日有效的选课
    async fn list_active_courses(&self, student_id: i64, date: &str) -> Result<Vec<Course>>;

    /// 通知方法
    // 为某日的课次生成提醒
    async fn enqueue_session_reminders(&self, date: &str) -> Result<ReminderSummary>;
    // 将通知重置为待发送
    async fn reset_notification(&self, id: i64) -> Result<Option<Notification>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
