//! WebSocket event types for real-time admin updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DocumentType, Stage};

/// Event pushed to connected admin clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum WsEvent {
    ShipmentCreated(ShipmentPayload),
    ShipmentUpdated(ShipmentPayload),
    StageChanged(StageChangedPayload),
    ShipmentDeleted(ShipmentDeletedPayload),
    AttachmentUploaded(AttachmentPayload),
    AttachmentDeleted(AttachmentPayload),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentPayload {
    pub shipment_id: Uuid,
    pub tracking_id: String,
    pub status: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageChangedPayload {
    pub shipment_id: Uuid,
    pub tracking_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_stage: Option<Stage>,
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentDeletedPayload {
    pub shipment_id: Uuid,
    pub tracking_id: String,
}

/// Which kind of attachment an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Media,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub shipment_id: Uuid,
    pub attachment_id: Uuid,
    pub kind: AttachmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
}

/// Wrapper that includes timestamp with every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEventMessage {
    #[serde(flatten)]
    pub event: WsEvent,
    pub timestamp: DateTime<Utc>,
}

impl WsEventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: WsEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

impl WsEvent {
    pub fn shipment_created(shipment_id: Uuid, tracking_id: &str, status: Stage) -> Self {
        WsEvent::ShipmentCreated(ShipmentPayload {
            shipment_id,
            tracking_id: tracking_id.to_string(),
            status,
        })
    }

    pub fn shipment_updated(shipment_id: Uuid, tracking_id: &str, status: Stage) -> Self {
        WsEvent::ShipmentUpdated(ShipmentPayload {
            shipment_id,
            tracking_id: tracking_id.to_string(),
            status,
        })
    }

    pub fn stage_changed(
        shipment_id: Uuid,
        tracking_id: &str,
        previous_stage: Option<Stage>,
        stage: Stage,
    ) -> Self {
        WsEvent::StageChanged(StageChangedPayload {
            shipment_id,
            tracking_id: tracking_id.to_string(),
            previous_stage,
            stage,
        })
    }

    pub fn shipment_deleted(shipment_id: Uuid, tracking_id: &str) -> Self {
        WsEvent::ShipmentDeleted(ShipmentDeletedPayload {
            shipment_id,
            tracking_id: tracking_id.to_string(),
        })
    }

    pub fn media_uploaded(shipment_id: Uuid, media_id: Uuid, stage: Stage) -> Self {
        WsEvent::AttachmentUploaded(AttachmentPayload {
            shipment_id,
            attachment_id: media_id,
            kind: AttachmentKind::Media,
            stage: Some(stage),
            document_type: None,
        })
    }

    pub fn document_uploaded(
        shipment_id: Uuid,
        document_id: Uuid,
        document_type: DocumentType,
    ) -> Self {
        WsEvent::AttachmentUploaded(AttachmentPayload {
            shipment_id,
            attachment_id: document_id,
            kind: AttachmentKind::Document,
            stage: None,
            document_type: Some(document_type),
        })
    }

    pub fn attachment_deleted(shipment_id: Uuid, attachment_id: Uuid, kind: AttachmentKind) -> Self {
        WsEvent::AttachmentDeleted(AttachmentPayload {
            shipment_id,
            attachment_id,
            kind,
            stage: None,
            document_type: None,
        })
    }
}
