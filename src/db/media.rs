//! Database queries for shipment media.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::shipment_media::{self as media, ActiveModel, Entity as ShipmentMedia};
use crate::error::{AppError, AppResult};
use crate::models::Stage;

use super::{DbPool, NewAttachment};

impl DbPool {
    /// Insert a media row for an object that is already stored.
    pub async fn insert_media(&self, new: NewAttachment, stage: Stage) -> AppResult<media::Model> {
        let model = ActiveModel {
            id: Set(new.id),
            shipment_id: Set(new.shipment_id),
            stage: Set(stage.as_str().to_string()),
            file_name: Set(new.file_name),
            content_type: Set(new.content_type),
            file_size: Set(new.file_size),
            bucket: Set(new.bucket),
            object_key: Set(new.object_key),
            public_url: Set(new.public_url),
            checksum_sha256: Set(new.checksum_sha256),
            created_at: Set(Utc::now()),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert media: {}", e)))
    }

    /// All media of a shipment in upload order.
    pub async fn list_media(&self, shipment_id: Uuid) -> AppResult<Vec<media::Model>> {
        ShipmentMedia::find()
            .filter(media::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(media::Column::CreatedAt)
            .order_by_asc(media::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list media: {}", e)))
    }

    /// Get one media row, scoped to its shipment.
    pub async fn get_media(
        &self,
        shipment_id: Uuid,
        media_id: Uuid,
    ) -> AppResult<Option<media::Model>> {
        ShipmentMedia::find_by_id(media_id)
            .filter(media::Column::ShipmentId.eq(shipment_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get media: {}", e)))
    }

    /// Delete a media row. Returns `false` if it did not exist.
    pub async fn delete_media(&self, media_id: Uuid) -> AppResult<bool> {
        let result = ShipmentMedia::delete_by_id(media_id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete media: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
