//! Database queries for the stage history.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entity::shipment_stage_event::{self as stage_event, ActiveModel, Entity as StageEvent};
use crate::error::{AppError, AppResult};
use crate::models::Stage;

use super::DbPool;

/// Insert one stage event on `conn`, which may be a transaction.
pub(crate) async fn record<C: ConnectionTrait>(
    conn: &C,
    shipment_id: Uuid,
    stage: Stage,
    previous: Option<Stage>,
    location: Option<(&str, &str)>,
    note: Option<&str>,
) -> Result<stage_event::Model, DbErr> {
    let (city, country) = match location {
        Some((city, country)) => (Some(city.to_string()), Some(country.to_string())),
        None => (None, None),
    };

    ActiveModel {
        id: Set(Uuid::now_v7()),
        shipment_id: Set(shipment_id),
        stage: Set(stage.as_str().to_string()),
        previous_stage: Set(previous.map(|s| s.as_str().to_string())),
        location_city: Set(city),
        location_country: Set(country),
        note: Set(note.map(str::to_string)),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
}

impl DbPool {
    /// Stage history of a shipment, oldest first.
    pub async fn list_stage_events(&self, shipment_id: Uuid) -> AppResult<Vec<stage_event::Model>> {
        StageEvent::find()
            .filter(stage_event::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(stage_event::Column::CreatedAt)
            .order_by_asc(stage_event::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list stage events: {}", e)))
    }
}
