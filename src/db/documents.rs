//! Database queries for shipment documents.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::shipment_document::{self as document, ActiveModel, Entity as ShipmentDocument};
use crate::error::{AppError, AppResult};
use crate::models::DocumentType;

use super::{DbPool, NewAttachment};

fn active_model(new: NewAttachment, document_type: DocumentType) -> ActiveModel {
    ActiveModel {
        id: Set(new.id),
        shipment_id: Set(new.shipment_id),
        document_type: Set(document_type.as_str().to_string()),
        file_name: Set(new.file_name),
        content_type: Set(new.content_type),
        file_size: Set(new.file_size),
        bucket: Set(new.bucket),
        object_key: Set(new.object_key),
        public_url: Set(new.public_url),
        checksum_sha256: Set(new.checksum_sha256),
        created_at: Set(Utc::now()),
    }
}

impl DbPool {
    /// Insert a document row for an object that is already stored.
    pub async fn insert_document(
        &self,
        new: NewAttachment,
        document_type: DocumentType,
    ) -> AppResult<document::Model> {
        active_model(new, document_type)
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert document: {}", e)))
    }

    /// Insert a document and drop any earlier rows of the same type in one
    /// transaction. Returns the new row and the rows it replaced.
    pub async fn replace_document(
        &self,
        new: NewAttachment,
        document_type: DocumentType,
    ) -> AppResult<(document::Model, Vec<document::Model>)> {
        let shipment_id = new.shipment_id;
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let replaced = ShipmentDocument::find()
            .filter(document::Column::ShipmentId.eq(shipment_id))
            .filter(document::Column::DocumentType.eq(document_type.as_str()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list documents: {}", e)))?;

        if !replaced.is_empty() {
            ShipmentDocument::delete_many()
                .filter(document::Column::ShipmentId.eq(shipment_id))
                .filter(document::Column::DocumentType.eq(document_type.as_str()))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to delete documents: {}", e)))?;
        }

        let model = active_model(new, document_type)
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert document: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit document: {}", e)))?;

        Ok((model, replaced))
    }

    /// All documents of a shipment in upload order.
    pub async fn list_documents(&self, shipment_id: Uuid) -> AppResult<Vec<document::Model>> {
        ShipmentDocument::find()
            .filter(document::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(document::Column::CreatedAt)
            .order_by_asc(document::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list documents: {}", e)))
    }

    /// Get one document row, scoped to its shipment.
    pub async fn get_document(
        &self,
        shipment_id: Uuid,
        document_id: Uuid,
    ) -> AppResult<Option<document::Model>> {
        ShipmentDocument::find_by_id(document_id)
            .filter(document::Column::ShipmentId.eq(shipment_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get document: {}", e)))
    }

    /// Delete a document row. Returns `false` if it did not exist.
    pub async fn delete_document(&self, document_id: Uuid) -> AppResult<bool> {
        let result = ShipmentDocument::delete_by_id(document_id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete document: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
