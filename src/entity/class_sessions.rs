//! 课次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub branch_id: i64,
    pub teacher_id: i64,
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub class_type_id: Option<i64>,
    pub booth_id: Option<i64>,
    pub evaluation_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branch,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class_session(self) -> crate::models::class_sessions::entities::ClassSession {
        use crate::models::class_sessions::entities::{ClassSession, SessionStatus};
        use crate::models::from_timestamp;

        ClassSession {
            id: self.id,
            branch_id: self.branch_id,
            teacher_id: self.teacher_id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            class_type_id: self.class_type_id,
            booth_id: self.booth_id,
            evaluation_id: self.evaluation_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self
                .status
                .parse::<SessionStatus>()
                .unwrap_or(SessionStatus::Scheduled),
            notes: self.notes,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
