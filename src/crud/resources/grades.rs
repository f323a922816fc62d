use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{grades, students};
use crate::models::grades::entities::{Grade, SchoolLevel};
use crate::models::grades::requests::{CreateGradeRequest, GradeFilter, UpdateGradeRequest};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;

pub struct GradeResource;

impl CrudResource for GradeResource {
    type Entity = grades::Entity;
    type Model = grades::Model;
    type ActiveModel = grades::ActiveModel;
    type Create = CreateGradeRequest;
    type Update = UpdateGradeRequest;
    type Filter = GradeFilter;
    type Output = Grade;

    const TABLE: &'static str = "grades";
    const PATH: &'static str = "/api/v1/grades";
    const LABEL: &'static str = "Grade";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::all_roles()
    }

    fn id_column() -> grades::Column {
        grades::Column::Id
    }

    fn dependents() -> Vec<Dependent> {
        vec![Dependent::restrict::<students::Entity>(
            students::Column::GradeId,
        )]
    }

    fn new_model(req: CreateGradeRequest, now: i64) -> grades::ActiveModel {
        grades::ActiveModel {
            name: Set(req.name.trim().to_string()),
            school_level: Set(req.school_level.unwrap_or(SchoolLevel::Other).to_string()),
            grade_year: Set(req.grade_year),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut grades::Model,
        req: UpdateGradeRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        if let Some(level) = req.school_level {
            model.school_level = level.to_string();
        }
        if req.grade_year.is_some() {
            model.grade_year = req.grade_year;
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: grades::Model) -> Grade {
        model.into_grade()
    }

    fn filter(select: Select<grades::Entity>, filter: &GradeFilter) -> Select<grades::Entity> {
        match filter.school_level {
            Some(level) => select.filter(grades::Column::SchoolLevel.eq(level.as_str())),
            None => select,
        }
    }

    fn search_columns() -> Vec<grades::Column> {
        vec![grades::Column::Name]
    }

    fn order(select: Select<grades::Entity>) -> Select<grades::Entity> {
        select
            .order_by_asc(grades::Column::GradeYear)
            .order_by_asc(grades::Column::Id)
    }
}
