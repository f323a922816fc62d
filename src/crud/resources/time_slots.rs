use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, merge_opt};
use crate::entity::time_slots;
use crate::models::normalize_opt;
use crate::models::time_slots::entities::TimeSlot;
use crate::models::time_slots::requests::{
    CreateTimeSlotRequest, TimeSlotFilter, UpdateTimeSlotRequest,
};
use crate::models::users::entities::UserRole;
use crate::utils::validate::check_time_order;

pub struct TimeSlotResource;

impl CrudResource for TimeSlotResource {
    type Entity = time_slots::Entity;
    type Model = time_slots::Model;
    type ActiveModel = time_slots::ActiveModel;
    type Create = CreateTimeSlotRequest;
    type Update = UpdateTimeSlotRequest;
    type Filter = TimeSlotFilter;
    type Output = TimeSlot;

    const TABLE: &'static str = "time_slots";
    const PATH: &'static str = "/api/v1/time-slots";
    const LABEL: &'static str = "Time slot";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::all_roles()
    }

    fn id_column() -> time_slots::Column {
        time_slots::Column::Id
    }

    fn new_model(req: CreateTimeSlotRequest, now: i64) -> time_slots::ActiveModel {
        time_slots::ActiveModel {
            branch_id: Set(req.branch_id),
            name: Set(req.name.trim().to_string()),
            start_time: Set(req.start_time.trim().to_string()),
            end_time: Set(req.end_time.trim().to_string()),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut time_slots::Model,
        req: UpdateTimeSlotRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(start) = req.start_time {
            model.start_time = start.trim().to_string();
        }
        if let Some(end) = req.end_time {
            model.end_time = end.trim().to_string();
        }
        check_time_order(&model.start_time, &model.end_time)?;

        if let Some(branch_id) = req.branch_id {
            model.branch_id = branch_id;
        }
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: time_slots::Model) -> TimeSlot {
        model.into_time_slot()
    }

    fn filter(
        select: Select<time_slots::Entity>,
        filter: &TimeSlotFilter,
    ) -> Select<time_slots::Entity> {
        match filter.branch_id {
            Some(branch_id) => select.filter(time_slots::Column::BranchId.eq(branch_id)),
            None => select,
        }
    }

    fn search_columns() -> Vec<time_slots::Column> {
        vec![time_slots::Column::Name]
    }

    fn order(select: Select<time_slots::Entity>) -> Select<time_slots::Entity> {
        select
            .order_by_asc(time_slots::Column::StartTime)
            .order_by_asc(time_slots::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, UpdateOutcome};

    #[tokio::test]
    async fn test_partial_update_checks_merged_times() {
        let db = fixtures::db().await;
        let req = CreateTimeSlotRequest {
            branch_id: None,
            name: "1限".into(),
            start_time: "16:00".into(),
            end_time: "17:20".into(),
            notes: None,
        };
        let slot = store::create::<TimeSlotResource, _>(&db, req).await.unwrap();

        // 只改结束时间，但早于已有的开始时间
        let req = UpdateTimeSlotRequest {
            end_time: Some("15:30".into()),
            ..Default::default()
        };
        match store::update::<TimeSlotResource, _>(&db, slot.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Invalid(err) => assert_eq!(err.code, "end_time"),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let req = UpdateTimeSlotRequest {
            end_time: Some("17:30".into()),
            ..Default::default()
        };
        match store::update::<TimeSlotResource, _>(&db, slot.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Updated(model) => {
                assert_eq!(model.start_time, "16:00");
                assert_eq!(model.end_time, "17:30");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
