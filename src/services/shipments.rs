//! Shipment workflows that span the database and object storage.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::{shipment, shipment_document, shipment_media, shipment_stage_event};
use crate::error::{AppError, AppResult};
use crate::models::{
    DeleteShipmentResponse, DocumentResponse, MediaResponse, ShipmentResponse, Stage, StageInfo,
    StageProgress, TimelineEntry, TrackingResponse, eta_progress_percent, mark_stages,
    normalize_tracking_id,
};
use crate::services::storage::Storage;
use crate::services::upload::remove_objects;

/// Delete a shipment with all dependent rows, then clean up its stored objects.
pub async fn delete_shipment(
    pool: &DbPool,
    storage: &Storage,
    id: Uuid,
) -> AppResult<(shipment::Model, DeleteShipmentResponse)> {
    let deleted = pool.delete_shipment_cascade(id).await?;

    let objects = deleted
        .media
        .iter()
        .map(|m| (m.bucket.as_str(), m.object_key.as_str()))
        .chain(
            deleted
                .documents
                .iter()
                .map(|d| (d.bucket.as_str(), d.object_key.as_str())),
        );
    let orphaned_objects = remove_objects(storage, objects).await;

    if !orphaned_objects.is_empty() {
        warn!(
            "Shipment {} deleted with {} orphaned object(s)",
            id,
            orphaned_objects.len()
        );
    }
    info!(
        "Shipment deleted: id={}, tracking_id={}, media={}, documents={}",
        id,
        deleted.shipment.tracking_id,
        deleted.media.len(),
        deleted.documents.len()
    );

    let response = DeleteShipmentResponse {
        id,
        deleted_media: deleted.media.len() as u64,
        deleted_documents: deleted.documents.len() as u64,
        orphaned_objects,
    };
    Ok((deleted.shipment, response))
}

/// Load everything the public tracking page shows.
pub async fn track(pool: &DbPool, raw_tracking_id: &str) -> AppResult<TrackingResponse> {
    if raw_tracking_id.trim().is_empty() {
        return Err(AppError::InvalidInput("tracking_id is required".to_string()));
    }
    let tracking_id = normalize_tracking_id(raw_tracking_id)?;

    let shipment = pool
        .find_shipment_by_tracking_id(&tracking_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Shipment with tracking id {}", tracking_id)))?;

    let media = pool.list_media(shipment.id).await?;
    let documents = pool.list_documents(shipment.id).await?;
    let events = pool.list_stage_events(shipment.id).await?;

    Ok(build_tracking(shipment, media, documents, events, Utc::now()))
}

/// Assemble the tracking view from loaded rows.
pub fn build_tracking(
    shipment: shipment::Model,
    media: Vec<shipment_media::Model>,
    documents: Vec<shipment_document::Model>,
    events: Vec<shipment_stage_event::Model>,
    now: DateTime<Utc>,
) -> TrackingResponse {
    let shipment = ShipmentResponse::from(shipment);
    let current = shipment.status;

    // Latest event per stage; events arrive oldest first
    let mut reached: HashMap<Stage, DateTime<Utc>> = HashMap::new();
    for event in events {
        if let Some(stage) = Stage::parse(&event.stage) {
            reached.insert(stage, event.created_at);
        }
    }

    let mut media_by_stage: HashMap<Stage, Vec<MediaResponse>> = HashMap::new();
    for item in media.into_iter().map(MediaResponse::from) {
        media_by_stage.entry(item.stage).or_default().push(item);
    }

    let timeline = mark_stages(current)
        .into_iter()
        .map(|mark| TimelineEntry {
            stage: mark.stage,
            label: mark.stage.label().to_string(),
            index: mark.stage.index(),
            completed: mark.completed,
            current: mark.current,
            reached_at: if mark.completed {
                reached.get(&mark.stage).copied()
            } else {
                None
            },
            dispatched_through: shipment.dispatched_through(mark.stage).map(str::to_string),
            media: if mark.completed {
                media_by_stage.remove(&mark.stage).unwrap_or_default()
            } else {
                Vec::new()
            },
        })
        .collect();

    TrackingResponse {
        current_stage: StageInfo::from(current),
        stage_progress: StageProgress::for_stage(current),
        eta_progress_percent: eta_progress_percent(
            shipment.created_at,
            shipment.estimated_delivery,
            now,
        ),
        timeline,
        documents: documents.into_iter().map(DocumentResponse::from).collect(),
        shipment,
    }
}
