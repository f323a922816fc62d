use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{line_channels, notifications};
use crate::models::line_channels::entities::LineChannel;
use crate::models::line_channels::requests::{
    CreateLineChannelRequest, LineChannelFilter, UpdateLineChannelRequest,
};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;

pub struct LineChannelResource;

impl CrudResource for LineChannelResource {
    type Entity = line_channels::Entity;
    type Model = line_channels::Model;
    type ActiveModel = line_channels::ActiveModel;
    type Create = CreateLineChannelRequest;
    type Update = UpdateLineChannelRequest;
    type Filter = LineChannelFilter;
    type Output = LineChannel;

    const TABLE: &'static str = "line_channels";
    const PATH: &'static str = "/api/v1/line-channels";
    const LABEL: &'static str = "LINE channel";

    // 涉及密钥，仅管理员可见
    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::admin_roles()
    }

    fn write_roles() -> &'static [&'static UserRole] {
        UserRole::admin_roles()
    }

    fn id_column() -> line_channels::Column {
        line_channels::Column::Id
    }

    fn dependents() -> Vec<Dependent> {
        vec![Dependent::restrict::<notifications::Entity>(
            notifications::Column::LineChannelId,
        )]
    }

    fn new_model(req: CreateLineChannelRequest, now: i64) -> line_channels::ActiveModel {
        line_channels::ActiveModel {
            name: Set(req.name.trim().to_string()),
            channel_id: Set(req.channel_id.trim().to_string()),
            channel_secret: Set(req.channel_secret.trim().to_string()),
            channel_access_token: Set(req.channel_access_token.trim().to_string()),
            branch_id: Set(req.branch_id),
            is_active: Set(req.is_active.unwrap_or(true)),
            description: Set(normalize_opt(req.description)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut line_channels::Model,
        req: UpdateLineChannelRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        if let Some(channel_id) = req.channel_id {
            model.channel_id = channel_id.trim().to_string();
        }
        if let Some(secret) = req.channel_secret {
            model.channel_secret = secret.trim().to_string();
        }
        if let Some(token) = req.channel_access_token {
            model.channel_access_token = token.trim().to_string();
        }
        if let Some(branch_id) = req.branch_id {
            model.branch_id = branch_id;
        }
        if let Some(is_active) = req.is_active {
            model.is_active = is_active;
        }
        merge_opt(&mut model.description, req.description);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: line_channels::Model) -> LineChannel {
        model.into_line_channel()
    }

    fn filter(
        select: Select<line_channels::Entity>,
        filter: &LineChannelFilter,
    ) -> Select<line_channels::Entity> {
        let mut select = select;
        if let Some(branch_id) = filter.branch_id {
            select = select.filter(line_channels::Column::BranchId.eq(branch_id));
        }
        if let Some(is_active) = filter.is_active {
            select = select.filter(line_channels::Column::IsActive.eq(is_active));
        }
        select
    }

    fn search_columns() -> Vec<line_channels::Column> {
        vec![line_channels::Column::Name, line_channels::Column::ChannelId]
    }

    fn order(select: Select<line_channels::Entity>) -> Select<line_channels::Entity> {
        select.order_by_asc(line_channels::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::fixtures;
    use crate::crud::store;

    #[tokio::test]
    async fn test_secrets_are_not_serialized() {
        let db = fixtures::db().await;
        let req = CreateLineChannelRequest {
            name: "渋谷校LINE".into(),
            channel_id: "1650000000".into(),
            channel_secret: "top-secret".into(),
            channel_access_token: "access-token-value".into(),
            branch_id: None,
            is_active: None,
            description: None,
        };
        let model = store::create::<LineChannelResource, _>(&db, req)
            .await
            .unwrap();
        assert!(model.is_active);

        let json = serde_json::to_string(&LineChannelResource::to_output(model)).unwrap();
        assert!(!json.contains("top-secret"));
        assert!(!json.contains("access-token-value"));
        assert!(json.contains("\"has_secret\":true"));
    }
}
