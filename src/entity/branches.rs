//! 校区实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub display_order: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booths::Entity")]
    Booths,
    #[sea_orm(has_many = "super::class_sessions::Entity")]
    ClassSessions,
}

impl Related<super::booths::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booths.def()
    }
}

impl Related<super::class_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_branch(self) -> crate::models::branches::entities::Branch {
        use crate::models::branches::entities::Branch;
        use crate::models::from_timestamp;

        Branch {
            id: self.id,
            name: self.name,
            address: self.address,
            phone: self.phone,
            notes: self.notes,
            display_order: self.display_order,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
