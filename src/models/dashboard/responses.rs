use serde::Serialize;
use ts_rs::TS;

use crate::models::{
    branches::entities::Branch, class_sessions::entities::ClassSession, courses::entities::Course,
    students::entities::Student, teachers::entities::Teacher,
};

// 各实体总数
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct EntityTotals {
    pub users: u64,
    pub branches: u64,
    pub teachers: u64,
    pub students: u64,
    pub subjects: u64,
    pub grades: u64,
    pub class_types: u64,
    pub evaluations: u64,
    pub booths: u64,
    pub time_slots: u64,
    pub courses: u64,
    pub class_sessions: u64,
    pub line_channels: u64,
}

// 单个校区的统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct BranchTotals {
    pub branch_id: i64,
    pub branch_name: String,
    pub students: u64,
    pub teachers: u64,
    pub booths: u64,
    pub sessions_today: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AdminDashboard {
    pub date: String,
    pub totals: EntityTotals,
    pub sessions_today: u64,
    pub pending_notifications: u64,
    pub failed_notifications: u64,
    pub branches: Vec<BranchTotals>,
}

// 教务人员只看到所属校区（未分配校区时看到全部）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StaffDashboard {
    pub date: String,
    pub branch: Option<Branch>,
    pub students: u64,
    pub teachers: u64,
    pub booths: u64,
    pub sessions_today: u64,
    pub pending_notifications: u64,
    pub branches: Vec<BranchTotals>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub date: String,
    pub teacher: Teacher,
    pub today_sessions: Vec<ClassSession>,
    pub upcoming_sessions: Vec<ClassSession>,
    pub student_count: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub date: String,
    pub student: Student,
    pub active_courses: Vec<Course>,
    pub upcoming_sessions: Vec<ClassSession>,
}

// 按角色区分的仪表盘
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Staff(StaffDashboard),
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
}
