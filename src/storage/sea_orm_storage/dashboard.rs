use super::SeaOrmStorage;
use crate::crud::resources::course_active_on;
use crate::entity::{
    booths, branches, class_sessions, class_types, courses, evaluations, grades, line_channels,
    notifications, students, subjects, teachers, time_slots, users,
};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    branches::entities::Branch,
    class_sessions::entities::{ClassSession, SessionStatus},
    courses::entities::Course,
    dashboard::responses::{BranchTotals, EntityTotals},
    notifications::entities::NotificationStatus,
    students::entities::Student,
    teachers::entities::Teacher,
};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

fn db_err(context: &str) -> impl FnOnce(sea_orm::DbErr) -> TutorHubError + '_ {
    move |e| TutorHubError::database_operation(format!("{context}: {e}"))
}

// 当天未取消的课次
fn sessions_on(date: &str) -> Select<class_sessions::Entity> {
    class_sessions::Entity::find()
        .filter(class_sessions::Column::Date.eq(date))
        .filter(class_sessions::Column::Status.ne(SessionStatus::Cancelled.as_str()))
}

impl SeaOrmStorage {
    async fn count_table<E>(&self, table: &str) -> Result<u64>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        E::find()
            .count(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("统计 {table} 失败: {e}")))
    }

    /// 各实体总数
    pub async fn count_entities_impl(&self) -> Result<EntityTotals> {
        Ok(EntityTotals {
            users: self.count_table::<users::Entity>("users").await?,
            branches: self.count_table::<branches::Entity>("branches").await?,
            teachers: self.count_table::<teachers::Entity>("teachers").await?,
            students: self.count_table::<students::Entity>("students").await?,
            subjects: self.count_table::<subjects::Entity>("subjects").await?,
            grades: self.count_table::<grades::Entity>("grades").await?,
            class_types: self.count_table::<class_types::Entity>("class_types").await?,
            evaluations: self.count_table::<evaluations::Entity>("evaluations").await?,
            booths: self.count_table::<booths::Entity>("booths").await?,
            time_slots: self.count_table::<time_slots::Entity>("time_slots").await?,
            courses: self.count_table::<courses::Entity>("courses").await?,
            class_sessions: self
                .count_table::<class_sessions::Entity>("class_sessions")
                .await?,
            line_channels: self
                .count_table::<line_channels::Entity>("line_channels")
                .await?,
        })
    }

    /// 按校区统计，`branch_id` 为空时返回全部校区
    pub async fn branch_totals_impl(
        &self,
        branch_id: Option<i64>,
        date: &str,
    ) -> Result<Vec<BranchTotals>> {
        let mut select = branches::Entity::find()
            .order_by_asc(branches::Column::DisplayOrder)
            .order_by_asc(branches::Column::Id);
        if let Some(id) = branch_id {
            select = select.filter(branches::Column::Id.eq(id));
        }
        let branch_list = select.all(&self.db).await.map_err(db_err("查询校区失败"))?;

        let mut totals = Vec::with_capacity(branch_list.len());
        for branch in branch_list {
            let students = students::Entity::find()
                .filter(students::Column::BranchId.eq(branch.id))
                .count(&self.db)
                .await
                .map_err(db_err("统计学生失败"))?;
            let teachers = teachers::Entity::find()
                .filter(teachers::Column::BranchId.eq(branch.id))
                .count(&self.db)
                .await
                .map_err(db_err("统计讲师失败"))?;
            let booths = booths::Entity::find()
                .filter(booths::Column::BranchId.eq(branch.id))
                .count(&self.db)
                .await
                .map_err(db_err("统计座位失败"))?;
            let sessions_today = self.count_sessions_on_impl(date, Some(branch.id)).await?;

            totals.push(BranchTotals {
                branch_id: branch.id,
                branch_name: branch.name,
                students,
                teachers,
                booths,
                sessions_today,
            });
        }
        Ok(totals)
    }

    /// 某日未取消的课次数
    pub async fn count_sessions_on_impl(&self, date: &str, branch_id: Option<i64>) -> Result<u64> {
        let mut select = sessions_on(date);
        if let Some(id) = branch_id {
            select = select.filter(class_sessions::Column::BranchId.eq(id));
        }
        select.count(&self.db).await.map_err(db_err("统计课次失败"))
    }

    pub async fn count_notifications_by_status_impl(
        &self,
        status: NotificationStatus,
    ) -> Result<u64> {
        notifications::Entity::find()
            .filter(notifications::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err("统计通知失败"))
    }

    pub async fn get_branch_by_id_impl(&self, id: i64) -> Result<Option<Branch>> {
        let result = branches::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询校区失败"))?;
        Ok(result.map(|m| m.into_branch()))
    }

    /// 通过登录账号找到讲师档案
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = teachers::Entity::find()
            .filter(teachers::Column::UserId.eq(user_id))
            .order_by_asc(teachers::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err("查询讲师失败"))?;
        Ok(result.map(|m| m.into_teacher()))
    }

    /// 通过登录账号找到学生档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = students::Entity::find()
            .filter(students::Column::UserId.eq(user_id))
            .order_by_asc(students::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生失败"))?;
        Ok(result.map(|m| m.into_student()))
    }

    async fn list_sessions_between(
        &self,
        select: Select<class_sessions::Entity>,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClassSession>> {
        let sessions = select
            .filter(class_sessions::Column::Date.gte(from))
            .filter(class_sessions::Column::Date.lte(to))
            .filter(class_sessions::Column::Status.ne(SessionStatus::Cancelled.as_str()))
            .order_by_asc(class_sessions::Column::Date)
            .order_by_asc(class_sessions::Column::StartTime)
            .order_by_asc(class_sessions::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询课次失败"))?;
        Ok(sessions.into_iter().map(|m| m.into_class_session()).collect())
    }

    pub async fn list_teacher_sessions_impl(
        &self,
        teacher_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClassSession>> {
        let select = class_sessions::Entity::find()
            .filter(class_sessions::Column::TeacherId.eq(teacher_id));
        self.list_sessions_between(select, from, to).await
    }

    pub async fn list_student_sessions_impl(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClassSession>> {
        let select = class_sessions::Entity::find()
            .filter(class_sessions::Column::StudentId.eq(student_id));
        self.list_sessions_between(select, from, to).await
    }

    /// 讲师负责的有效选课中的学生数，同一学生只算一次
    pub async fn count_teacher_students_impl(&self, teacher_id: i64, date: &str) -> Result<u64> {
        let student_ids: Vec<i64> = courses::Entity::find()
            .select_only()
            .column(courses::Column::StudentId)
            .distinct()
            .filter(courses::Column::TeacherId.eq(teacher_id))
            .filter(course_active_on(date))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err("统计讲师学生失败"))?;
        Ok(student_ids.len() as u64)
    }

    pub async fn list_active_courses_impl(&self, student_id: i64, date: &str) -> Result<Vec<Course>> {
        let result = courses::Entity::find()
            .filter(courses::Column::StudentId.eq(student_id))
            .filter(course_active_on(date))
            .order_by_asc(courses::Column::StartDate)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询选课失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::{ClassSessionResource, fixtures};
    use crate::crud::store;
    use crate::models::class_sessions::requests::UpdateClassSessionRequest;

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_branch_totals_skip_cancelled_sessions() {
        let storage = storage().await;
        let db = &storage.db;
        let shibuya = fixtures::branch(db, "渋谷校").await;
        let shinjuku = fixtures::branch(db, "新宿校").await;
        fixtures::booth(db, shibuya.id, "A1").await;
        fixtures::booth(db, shibuya.id, "A2").await;
        let teacher = fixtures::teacher(db, Some(shibuya.id), "佐藤", None).await;
        let student = fixtures::student(db, Some(shibuya.id), "田中", None).await;
        fixtures::student(db, Some(shinjuku.id), "鈴木", None).await;

        let date = "2024-05-01";
        fixtures::session(db, shibuya.id, teacher.id, Some(student.id), date, "16:00", "17:00")
            .await;
        let cancelled =
            fixtures::session(db, shibuya.id, teacher.id, None, date, "18:00", "19:00").await;
        let req = UpdateClassSessionRequest {
            status: Some(SessionStatus::Cancelled),
            ..Default::default()
        };
        store::update::<ClassSessionResource, _>(db, cancelled.id, req)
            .await
            .unwrap();

        let totals = storage.branch_totals_impl(None, date).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].branch_name, "渋谷校");
        assert_eq!(totals[0].students, 1);
        assert_eq!(totals[0].teachers, 1);
        assert_eq!(totals[0].booths, 2);
        assert_eq!(totals[0].sessions_today, 1);
        assert_eq!(totals[1].sessions_today, 0);

        let only = storage
            .branch_totals_impl(Some(shinjuku.id), date)
            .await
            .unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].students, 1);

        let entities = storage.count_entities_impl().await.unwrap();
        assert_eq!(entities.branches, 2);
        assert_eq!(entities.class_sessions, 2);
        assert_eq!(storage.count_sessions_on_impl(date, None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_teacher_student_count_is_distinct_and_dated() {
        let storage = storage().await;
        let db = &storage.db;
        let teacher = fixtures::teacher(db, None, "佐藤", None).await;
        let tanaka = fixtures::student(db, None, "田中", None).await;
        let suzuki = fixtures::student(db, None, "鈴木", None).await;
        let math = fixtures::subject(db, "数学").await;
        let english = fixtures::subject(db, "英語").await;

        fixtures::course(db, tanaka.id, math.id, Some(teacher.id), "2024-04-01", None).await;
        fixtures::course(db, tanaka.id, english.id, Some(teacher.id), "2024-04-01", None).await;
        fixtures::course(
            db,
            suzuki.id,
            math.id,
            Some(teacher.id),
            "2024-04-01",
            Some("2024-04-30"),
        )
        .await;

        let count = storage
            .count_teacher_students_impl(teacher.id, "2024-04-15")
            .await
            .unwrap();
        assert_eq!(count, 2);
        let count = storage
            .count_teacher_students_impl(teacher.id, "2024-05-15")
            .await
            .unwrap();
        assert_eq!(count, 1);

        let active = storage
            .list_active_courses_impl(suzuki.id, "2024-05-15")
            .await
            .unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_between_are_ordered() {
        let storage = storage().await;
        let db = &storage.db;
        let branch = fixtures::branch(db, "渋谷校").await;
        let teacher = fixtures::teacher(db, Some(branch.id), "佐藤", None).await;
        fixtures::session(db, branch.id, teacher.id, None, "2024-05-02", "10:00", "11:00").await;
        fixtures::session(db, branch.id, teacher.id, None, "2024-05-01", "18:00", "19:00").await;
        fixtures::session(db, branch.id, teacher.id, None, "2024-05-01", "16:00", "17:00").await;
        fixtures::session(db, branch.id, teacher.id, None, "2024-05-09", "16:00", "17:00").await;

        let sessions = storage
            .list_teacher_sessions_impl(teacher.id, "2024-05-01", "2024-05-07")
            .await
            .unwrap();
        let keys: Vec<_> = sessions
            .iter()
            .map(|s| (s.date.as_str(), s.start_time.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-05-01", "16:00"),
                ("2024-05-01", "18:00"),
                ("2024-05-02", "10:00"),
            ]
        );
    }
}
