//! Database queries for shipments.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::shipment::{self, ActiveModel, Entity as Shipment};
use crate::entity::shipment_document::{self as document, Entity as ShipmentDocument};
use crate::entity::shipment_media::{self as media, Entity as ShipmentMedia};
use crate::entity::shipment_stage_event::{self as stage_event, Entity as StageEvent};
use crate::error::{AppError, AppResult};
use crate::models::{ShipmentFields, Stage, StageChange};

use super::{DbPool, stage_events};

/// Escape character for `LIKE` patterns built from user input.
const LIKE_ESCAPE: char = '\\';

/// `%term%` with `\`, `%` and `_` escaped so the term matches literally.
fn substring_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Rows removed by a cascading shipment delete.
#[derive(Debug, Clone)]
pub struct DeletedShipment {
    pub shipment: shipment::Model,
    pub media: Vec<media::Model>,
    pub documents: Vec<document::Model>,
}

fn write_error(action: &str, tracking_id: &str, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(format!(
            "Shipment with tracking id {} already exists",
            tracking_id
        )),
        _ => AppError::Database(format!("Failed to {} shipment: {}", action, err)),
    }
}

fn apply_fields(active: &mut ActiveModel, fields: &ShipmentFields, created: NaiveDate) {
    active.tracking_id = Set(fields.tracking_id.clone());
    active.shipment_name = Set(fields.shipment_name.clone());
    active.origin_country = Set(fields.origin_country.clone());
    active.origin_city = Set(fields.origin_city.clone());
    active.destination_country = Set(fields.destination_country.clone());
    active.destination_city = Set(fields.destination_city.clone());
    active.current_location_country = Set(fields.current_location_country.clone());
    active.current_location_city = Set(fields.current_location_city.clone());
    active.transport_mode = Set(fields.transport_mode.as_str().to_string());
    active.status = Set(fields.status.as_str().to_string());
    active.estimated_delivery = Set(Some(fields.resolve_estimated_delivery(created)));
    active.package_count = Set(fields.package_count);
    active.package_type = Set(fields.package_type.clone());
    active.weight_kg = Set(fields.weight_kg);
    active.dimensions = Set(fields.dimensions.clone());
    active.declared_value = Set(fields.declared_value);
    active.contents = Set(fields.contents.clone());
    active.hs_code = Set(fields.hs_code.clone());
    active.shipper_name = Set(fields.shipper_name.clone());
    active.shipper_address = Set(fields.shipper_address.clone());
    active.buyer_name = Set(fields.buyer_name.clone());
    active.buyer_address = Set(fields.buyer_address.clone());
    active.customer_delivery_address = Set(fields.customer_delivery_address.clone());
    active.shipment_notes = Set(fields.shipment_notes.clone());
    active.pickup_dispatched_through = Set(fields.pickup_dispatched_through.clone());
    active.transit_dispatched_through = Set(fields.transit_dispatched_through.clone());
    active.warehouse_dispatched_through = Set(fields.warehouse_dispatched_through.clone());
    active.customer_dispatched_through = Set(fields.customer_dispatched_through.clone());
}

fn stored_stage(model: &shipment::Model) -> Stage {
    Stage::parse(&model.status).unwrap_or(Stage::FIRST)
}

impl DbPool {
    /// Insert a shipment together with its initial stage event.
    pub async fn insert_shipment(&self, fields: &ShipmentFields) -> AppResult<shipment::Model> {
        if self
            .find_shipment_by_tracking_id(&fields.tracking_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Shipment with tracking id {} already exists",
                fields.tracking_id
            )));
        }

        let now = Utc::now();
        let mut active = ActiveModel {
            id: Set(Uuid::now_v7()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_fields(&mut active, fields, now.date_naive());

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let model = active
            .insert(&txn)
            .await
            .map_err(|e| write_error("insert", &fields.tracking_id, e))?;

        stage_events::record(&txn, model.id, fields.status, None, None, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to record stage event: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit shipment: {}", e)))?;

        Ok(model)
    }

    /// Get a shipment by ID.
    pub async fn get_shipment(&self, id: Uuid) -> AppResult<Option<shipment::Model>> {
        Shipment::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get shipment: {}", e)))
    }

    /// Get a shipment by ID or fail with `NotFound`.
    pub async fn require_shipment(&self, id: Uuid) -> AppResult<shipment::Model> {
        self.get_shipment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shipment {}", id)))
    }

    /// Look up a shipment by its normalized tracking id.
    pub async fn find_shipment_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> AppResult<Option<shipment::Model>> {
        Shipment::find()
            .filter(shipment::Column::TrackingId.eq(tracking_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find shipment: {}", e)))
    }

    /// List shipments, newest first.
    pub async fn list_shipments(
        &self,
        stage: Option<Stage>,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<shipment::Model>, u64)> {
        let mut select = Shipment::find();

        if let Some(stage) = stage {
            select = select.filter(shipment::Column::Status.eq(stage.as_str()));
        }

        if let Some(term) = search {
            select = select.filter(shipment::Column::TrackingId.like(substring_pattern(term)));
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count shipments: {}", e)))?;

        let shipments = select
            .order_by_desc(shipment::Column::CreatedAt)
            .order_by_desc(shipment::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list shipments: {}", e)))?;

        Ok((shipments, total))
    }

    /// Overwrite every editable field. Returns the updated row and the previous
    /// stage when the status changed.
    pub async fn update_shipment(
        &self,
        id: Uuid,
        fields: &ShipmentFields,
    ) -> AppResult<(shipment::Model, Option<Stage>)> {
        let existing = self.require_shipment(id).await?;

        if existing.tracking_id != fields.tracking_id
            && self
                .find_shipment_by_tracking_id(&fields.tracking_id)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Shipment with tracking id {} already exists",
                fields.tracking_id
            )));
        }

        let previous = stored_stage(&existing);
        let created = existing.created_at.date_naive();
        let mut active: ActiveModel = existing.into();
        apply_fields(&mut active, fields, created);
        active.updated_at = Set(Utc::now());

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let model = active
            .update(&txn)
            .await
            .map_err(|e| write_error("update", &fields.tracking_id, e))?;

        let changed = previous != fields.status;
        if changed {
            stage_events::record(&txn, id, fields.status, Some(previous), None, None)
                .await
                .map_err(|e| AppError::Database(format!("Failed to record stage event: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit shipment: {}", e)))?;

        Ok((model, changed.then_some(previous)))
    }

    /// Move a shipment to another stage and record the event.
    /// Returns the updated row and the stage it left.
    pub async fn change_shipment_stage(
        &self,
        id: Uuid,
        change: &StageChange,
    ) -> AppResult<(shipment::Model, Stage)> {
        let existing = self.require_shipment(id).await?;
        let previous = stored_stage(&existing);

        let mut active: ActiveModel = existing.into();
        active.status = Set(change.stage.as_str().to_string());
        if let Some((city, country)) = &change.location {
            active.current_location_city = Set(city.clone());
            active.current_location_country = Set(country.clone());
        }
        active.updated_at = Set(Utc::now());

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let model = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update shipment stage: {}", e)))?;

        stage_events::record(
            &txn,
            id,
            change.stage,
            Some(previous),
            change
                .location
                .as_ref()
                .map(|(city, country)| (city.as_str(), country.as_str())),
            change.note.as_deref(),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to record stage event: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit stage change: {}", e)))?;

        Ok((model, previous))
    }

    /// Delete a shipment and every dependent row in one transaction.
    ///
    /// Storage objects are left to the caller; the returned rows name them.
    pub async fn delete_shipment_cascade(&self, id: Uuid) -> AppResult<DeletedShipment> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let shipment = Shipment::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get shipment: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Shipment {}", id)))?;

        let media = ShipmentMedia::find()
            .filter(media::Column::ShipmentId.eq(id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list media: {}", e)))?;

        let documents = ShipmentDocument::find()
            .filter(document::Column::ShipmentId.eq(id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list documents: {}", e)))?;

        ShipmentMedia::delete_many()
            .filter(media::Column::ShipmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete media: {}", e)))?;

        ShipmentDocument::delete_many()
            .filter(document::Column::ShipmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete documents: {}", e)))?;

        StageEvent::delete_many()
            .filter(stage_event::Column::ShipmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete stage events: {}", e)))?;

        Shipment::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete shipment: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit delete: {}", e)))?;

        Ok(DeletedShipment {
            shipment,
            media,
            documents,
        })
    }

    /// Total shipment count and the number at the final stage.
    pub async fn shipment_counts(&self) -> AppResult<(u64, u64)> {
        let total = Shipment::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count shipments: {}", e)))?;

        let delivered = Shipment::find()
            .filter(shipment::Column::Status.eq(Stage::FINAL.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count shipments: {}", e)))?;

        Ok((total, delivered))
    }

    /// The `n` most recently created shipments.
    pub async fn recent_shipments(&self, n: u64) -> AppResult<Vec<shipment::Model>> {
        Shipment::find()
            .order_by_desc(shipment::Column::CreatedAt)
            .order_by_desc(shipment::Column::Id)
            .limit(n)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list recent shipments: {}", e)))
    }
}
