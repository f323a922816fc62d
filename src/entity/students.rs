//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub branch_id: Option<i64>,
    pub grade_id: Option<i64>,
    pub name: String,
    pub kana_name: Option<String>,
    pub school_name: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub line_id: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id"
    )]
    Grade,
    #[sea_orm(has_many = "super::courses::Entity")]
    Courses,
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::from_timestamp;
        use crate::models::students::entities::{Student, StudentStatus};

        Student {
            id: self.id,
            user_id: self.user_id,
            branch_id: self.branch_id,
            grade_id: self.grade_id,
            name: self.name,
            kana_name: self.kana_name,
            school_name: self.school_name,
            email: self.email,
            parent_email: self.parent_email,
            parent_phone: self.parent_phone,
            line_id: self.line_id,
            status: self
                .status
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Enrolled),
            notes: self.notes,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
