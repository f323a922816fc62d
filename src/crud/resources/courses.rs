use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, merge_opt};
use crate::entity::courses;
use crate::models::courses::entities::Course;
use crate::models::courses::requests::{CourseFilter, CreateCourseRequest, UpdateCourseRequest};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;
use crate::utils::validate::check_date_order;

pub struct CourseResource;

/// 在 `date` 当天仍有效的选课：已开始且未结束（无结束日期视为长期有效）
///
/// 日期均为 `YYYY-MM-DD`，按字符串比较即按日期比较。
pub(crate) fn course_active_on(date: &str) -> Condition {
    Condition::all()
        .add(courses::Column::StartDate.lte(date))
        .add(
            Condition::any()
                .add(courses::Column::EndDate.is_null())
                .add(courses::Column::EndDate.gte(date)),
        )
}

impl CrudResource for CourseResource {
    type Entity = courses::Entity;
    type Model = courses::Model;
    type ActiveModel = courses::ActiveModel;
    type Create = CreateCourseRequest;
    type Update = UpdateCourseRequest;
    type Filter = CourseFilter;
    type Output = Course;

    const TABLE: &'static str = "courses";
    const PATH: &'static str = "/api/v1/courses";
    const LABEL: &'static str = "Course";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::teacher_roles()
    }

    fn id_column() -> courses::Column {
        courses::Column::Id
    }

    fn new_model(req: CreateCourseRequest, now: i64) -> courses::ActiveModel {
        courses::ActiveModel {
            student_id: Set(req.student_id),
            subject_id: Set(req.subject_id),
            class_type_id: Set(req.class_type_id),
            teacher_id: Set(req.teacher_id),
            start_date: Set(req.start_date.trim().to_string()),
            end_date: Set(normalize_opt(req.end_date)),
            sessions_per_week: Set(req.sessions_per_week.unwrap_or(1)),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut courses::Model,
        req: UpdateCourseRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(start) = req.start_date {
            model.start_date = start.trim().to_string();
        }
        merge_opt(&mut model.end_date, req.end_date);
        if let Some(end) = &model.end_date {
            check_date_order(&model.start_date, end)?;
        }

        if let Some(student_id) = req.student_id {
            model.student_id = student_id;
        }
        if let Some(subject_id) = req.subject_id {
            model.subject_id = subject_id;
        }
        if let Some(class_type_id) = req.class_type_id {
            model.class_type_id = class_type_id;
        }
        if let Some(teacher_id) = req.teacher_id {
            model.teacher_id = teacher_id;
        }
        if let Some(per_week) = req.sessions_per_week {
            model.sessions_per_week = per_week;
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: courses::Model) -> Course {
        model.into_course()
    }

    fn filter(select: Select<courses::Entity>, filter: &CourseFilter) -> Select<courses::Entity> {
        let mut select = select;
        if let Some(student_id) = filter.student_id {
            select = select.filter(courses::Column::StudentId.eq(student_id));
        }
        if let Some(teacher_id) = filter.teacher_id {
            select = select.filter(courses::Column::TeacherId.eq(teacher_id));
        }
        if let Some(subject_id) = filter.subject_id {
            select = select.filter(courses::Column::SubjectId.eq(subject_id));
        }
        if let Some(date) = filter.active_on.as_deref().map(str::trim)
            && !date.is_empty()
        {
            select = select.filter(course_active_on(date));
        }
        select
    }

    fn search_columns() -> Vec<courses::Column> {
        vec![courses::Column::Notes]
    }

    fn order(select: Select<courses::Entity>) -> Select<courses::Entity> {
        select
            .order_by_desc(courses::Column::StartDate)
            .order_by_asc(courses::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, UpdateOutcome};

    #[tokio::test]
    async fn test_active_on_filter() {
        let db = fixtures::db().await;
        let student = fixtures::student(&db, None, "田中", None).await;
        let math = fixtures::subject(&db, "数学").await;
        let english = fixtures::subject(&db, "英語").await;
        let science = fixtures::subject(&db, "理科").await;
        fixtures::course(&db, student.id, math.id, None, "2024-04-01", None).await;
        fixtures::course(&db, student.id, english.id, None, "2024-04-01", Some("2024-06-30")).await;
        fixtures::course(&db, student.id, science.id, None, "2024-09-01", None).await;

        let params = ListParams {
            filter: CourseFilter {
                active_on: Some("2024-06-30".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = store::list::<CourseResource>(&db, params).await.unwrap();
        let mut subjects: Vec<_> = page.items.iter().map(|c| c.subject_id).collect();
        subjects.sort();
        assert_eq!(subjects, vec![math.id, english.id]);

        let params = ListParams {
            filter: CourseFilter {
                active_on: Some("2024-07-01".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = store::list::<CourseResource>(&db, params).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].subject_id, math.id);
    }

    #[tokio::test]
    async fn test_end_date_checked_against_stored_start() {
        let db = fixtures::db().await;
        let student = fixtures::student(&db, None, "田中", None).await;
        let math = fixtures::subject(&db, "数学").await;
        let course = fixtures::course(&db, student.id, math.id, None, "2024-04-01", None).await;
        assert_eq!(course.sessions_per_week, 1);

        let req = UpdateCourseRequest {
            end_date: Some("2024-03-31".into()),
            ..Default::default()
        };
        match store::update::<CourseResource, _>(&db, course.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Invalid(err) => assert_eq!(err.code, "end_date"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
