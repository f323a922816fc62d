//! 时段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "time_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_time_slot(self) -> crate::models::time_slots::entities::TimeSlot {
        use crate::models::from_timestamp;
        use crate::models::time_slots::entities::TimeSlot;

        TimeSlot {
            id: self.id,
            branch_id: self.branch_id,
            name: self.name,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
