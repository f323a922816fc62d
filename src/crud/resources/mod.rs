//! 各资源的 CRUD 实现

mod booths;
mod branches;
mod class_sessions;
mod class_types;
mod courses;
mod evaluations;
mod grades;
mod line_channels;
mod notifications;
mod students;
mod subjects;
mod teachers;
mod time_slots;

pub use booths::BoothResource;
pub use branches::BranchResource;
pub use class_sessions::ClassSessionResource;
pub use class_types::ClassTypeResource;
pub use courses::CourseResource;
pub use evaluations::EvaluationResource;
pub use grades::GradeResource;
pub use line_channels::LineChannelResource;
pub use notifications::NotificationResource;
pub use students::StudentResource;
pub use subjects::SubjectResource;
pub use teachers::TeacherResource;
pub use time_slots::TimeSlotResource;

pub(crate) use courses::course_active_on;
pub(crate) use teachers::normalize_email;

/// 测试数据构造
#[cfg(test)]
pub(crate) mod fixtures {
    use sea_orm::DatabaseConnection;

    use super::*;
    use crate::crud::store;
    use crate::entity::{
        booths, branches, class_sessions, courses, grades, students, subjects, teachers,
    };
    use crate::models::booths::requests::CreateBoothRequest;
    use crate::models::branches::requests::CreateBranchRequest;
    use crate::models::class_sessions::requests::CreateClassSessionRequest;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::grades::requests::CreateGradeRequest;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::teachers::requests::CreateTeacherRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    pub async fn db() -> DatabaseConnection {
        SeaOrmStorage::new_in_memory().await.unwrap().db
    }

    pub async fn branch(db: &DatabaseConnection, name: &str) -> branches::Model {
        let req = CreateBranchRequest {
            name: name.into(),
            address: None,
            phone: None,
            notes: None,
            display_order: None,
        };
        store::create::<BranchResource, _>(db, req).await.unwrap()
    }

    pub async fn booth(db: &DatabaseConnection, branch_id: i64, name: &str) -> booths::Model {
        let req = CreateBoothRequest {
            branch_id,
            name: name.into(),
            is_active: None,
            notes: None,
        };
        store::create::<BoothResource, _>(db, req).await.unwrap()
    }

    pub async fn subject(db: &DatabaseConnection, name: &str) -> subjects::Model {
        let req = CreateSubjectRequest {
            name: name.into(),
            notes: None,
        };
        store::create::<SubjectResource, _>(db, req).await.unwrap()
    }

    pub async fn grade(db: &DatabaseConnection, name: &str) -> grades::Model {
        let req = CreateGradeRequest {
            name: name.into(),
            school_level: None,
            grade_year: None,
            notes: None,
        };
        store::create::<GradeResource, _>(db, req).await.unwrap()
    }

    pub async fn teacher(
        db: &DatabaseConnection,
        branch_id: Option<i64>,
        name: &str,
        line_id: Option<&str>,
    ) -> teachers::Model {
        let req = CreateTeacherRequest {
            user_id: None,
            branch_id,
            name: name.into(),
            kana_name: None,
            email: None,
            phone: None,
            line_id: line_id.map(Into::into),
            notes: None,
        };
        store::create::<TeacherResource, _>(db, req).await.unwrap()
    }

    pub async fn student(
        db: &DatabaseConnection,
        branch_id: Option<i64>,
        name: &str,
        line_id: Option<&str>,
    ) -> students::Model {
        let req = CreateStudentRequest {
            user_id: None,
            branch_id,
            grade_id: None,
            name: name.into(),
            kana_name: None,
            school_name: None,
            email: None,
            parent_email: None,
            parent_phone: None,
            line_id: line_id.map(Into::into),
            status: None,
            notes: None,
        };
        store::create::<StudentResource, _>(db, req).await.unwrap()
    }

    pub async fn course(
        db: &DatabaseConnection,
        student_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
        start_date: &str,
        end_date: Option<&str>,
    ) -> courses::Model {
        let req = CreateCourseRequest {
            student_id,
            subject_id,
            class_type_id: None,
            teacher_id,
            start_date: start_date.into(),
            end_date: end_date.map(Into::into),
            sessions_per_week: None,
            notes: None,
        };
        store::create::<CourseResource, _>(db, req).await.unwrap()
    }

    pub async fn session(
        db: &DatabaseConnection,
        branch_id: i64,
        teacher_id: i64,
        student_id: Option<i64>,
        date: &str,
        start_time: &str,
        end_time: &str,
    ) -> class_sessions::Model {
        let req = CreateClassSessionRequest {
            branch_id,
            teacher_id,
            student_id,
            subject_id: None,
            class_type_id: None,
            booth_id: None,
            evaluation_id: None,
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            status: None,
            notes: None,
        };
        store::create::<ClassSessionResource, _>(db, req).await.unwrap()
    }
}
