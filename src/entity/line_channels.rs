//! LINE 通道实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "line_channels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub channel_id: String,
    pub channel_secret: String,
    #[sea_orm(column_type = "Text")]
    pub channel_access_token: String,
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    // 密钥与 token 不出库
    pub fn into_line_channel(self) -> crate::models::line_channels::entities::LineChannel {
        use crate::models::from_timestamp;
        use crate::models::line_channels::entities::LineChannel;

        LineChannel {
            id: self.id,
            name: self.name,
            channel_id: self.channel_id,
            branch_id: self.branch_id,
            is_active: self.is_active,
            description: self.description,
            has_secret: !self.channel_secret.is_empty(),
            has_access_token: !self.channel_access_token.is_empty(),
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
