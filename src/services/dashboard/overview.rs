use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, NaiveDate};

use super::DashboardService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::dashboard::responses::{
    AdminDashboard, DashboardResponse, StaffDashboard, StudentDashboard, TeacherDashboard,
};
use crate::models::notifications::entities::NotificationStatus;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 近期课次覆盖的天数（不含今天）
const UPCOMING_DAYS: i64 = 7;

fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub async fn get_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    let today = AppConfig::get().today();

    match build_dashboard(storage.as_ref(), &user, today).await {
        Ok(Some(dashboard)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Dashboard retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LinkedRecordNotFound,
            format!("No {} record is linked to this account", user.role),
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

/// 讲师或学生账号没有关联档案时返回 None
pub async fn build_dashboard(
    storage: &dyn Storage,
    user: &User,
    today: NaiveDate,
) -> Result<Option<DashboardResponse>> {
    let dashboard = match user.role {
        UserRole::Admin => Some(DashboardResponse::Admin(admin(storage, today).await?)),
        UserRole::Staff => Some(DashboardResponse::Staff(
            staff(storage, user.branch_id, today).await?,
        )),
        UserRole::Teacher => teacher(storage, user.id, today)
            .await?
            .map(DashboardResponse::Teacher),
        UserRole::Student => student(storage, user.id, today)
            .await?
            .map(DashboardResponse::Student),
    };
    Ok(dashboard)
}

async fn admin(storage: &dyn Storage, today: NaiveDate) -> Result<AdminDashboard> {
    let date = ymd(today);
    Ok(AdminDashboard {
        totals: storage.count_entities().await?,
        sessions_today: storage.count_sessions_on(&date, None).await?,
        pending_notifications: storage
            .count_notifications_by_status(NotificationStatus::Pending)
            .await?,
        failed_notifications: storage
            .count_notifications_by_status(NotificationStatus::Failed)
            .await?,
        branches: storage.branch_totals(None, &date).await?,
        date,
    })
}

async fn staff(
    storage: &dyn Storage,
    branch_id: Option<i64>,
    today: NaiveDate,
) -> Result<StaffDashboard> {
    let date = ymd(today);
    let branch = match branch_id {
        Some(id) => storage.get_branch_by_id(id).await?,
        None => None,
    };
    let branches = storage.branch_totals(branch_id, &date).await?;

    Ok(StaffDashboard {
        branch,
        students: branches.iter().map(|b| b.students).sum(),
        teachers: branches.iter().map(|b| b.teachers).sum(),
        booths: branches.iter().map(|b| b.booths).sum(),
        sessions_today: storage.count_sessions_on(&date, branch_id).await?,
        pending_notifications: storage
            .count_notifications_by_status(NotificationStatus::Pending)
            .await?,
        branches,
        date,
    })
}

async fn teacher(
    storage: &dyn Storage,
    user_id: i64,
    today: NaiveDate,
) -> Result<Option<TeacherDashboard>> {
    let Some(teacher) = storage.get_teacher_by_user_id(user_id).await? else {
        return Ok(None);
    };

    let date = ymd(today);
    let from = ymd(today + Duration::days(1));
    let to = ymd(today + Duration::days(UPCOMING_DAYS));

    Ok(Some(TeacherDashboard {
        today_sessions: storage.list_teacher_sessions(teacher.id, &date, &date).await?,
        upcoming_sessions: storage.list_teacher_sessions(teacher.id, &from, &to).await?,
        student_count: storage.count_teacher_students(teacher.id, &date).await?,
        teacher,
        date,
    }))
}

async fn student(
    storage: &dyn Storage,
    user_id: i64,
    today: NaiveDate,
) -> Result<Option<StudentDashboard>> {
    let Some(student) = storage.get_student_by_user_id(user_id).await? else {
        return Ok(None);
    };

    let date = ymd(today);
    let to = ymd(today + Duration::days(UPCOMING_DAYS));

    Ok(Some(StudentDashboard {
        active_courses: storage.list_active_courses(student.id, &date).await?,
        upcoming_sessions: storage.list_student_sessions(student.id, &date, &to).await?,
        student,
        date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::fixtures;
    use crate::models::users::entities::UserStatus;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    fn user(id: i64, role: UserRole, branch_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            branch_id,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_staff_dashboard_is_branch_scoped() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let db = &storage.db;
        let shibuya = fixtures::branch(db, "渋谷校").await;
        let shinjuku = fixtures::branch(db, "新宿校").await;
        let teacher = fixtures::teacher(db, Some(shibuya.id), "佐藤", None).await;
        fixtures::student(db, Some(shibuya.id), "田中", None).await;
        fixtures::student(db, Some(shinjuku.id), "鈴木", None).await;
        fixtures::session(db, shibuya.id, teacher.id, None, "2024-05-01", "10:00", "11:00").await;

        let staff_user = user(1, UserRole::Staff, Some(shibuya.id));
        let dashboard = build_dashboard(&storage, &staff_user, day("2024-05-01"))
            .await
            .unwrap()
            .unwrap();
        match dashboard {
            DashboardResponse::Staff(staff) => {
                assert_eq!(staff.branch.unwrap().id, shibuya.id);
                assert_eq!(staff.students, 1);
                assert_eq!(staff.teachers, 1);
                assert_eq!(staff.sessions_today, 1);
                assert_eq!(staff.branches.len(), 1);
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }

        let admin_user = user(2, UserRole::Admin, None);
        match build_dashboard(&storage, &admin_user, day("2024-05-01"))
            .await
            .unwrap()
            .unwrap()
        {
            DashboardResponse::Admin(admin) => {
                assert_eq!(admin.totals.students, 2);
                assert_eq!(admin.branches.len(), 2);
                assert_eq!(admin.sessions_today, 1);
            }
            other => panic!("unexpected dashboard: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlinked_teacher_and_student_get_none() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let today = day("2024-05-01");
        for role in [UserRole::Teacher, UserRole::Student] {
            let result = build_dashboard(&storage, &user(9, role, None), today)
                .await
                .unwrap();
            assert!(result.is_none());
        }
    }
}
