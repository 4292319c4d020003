//! Domain models for the shipment tracking server.

pub mod attachment;
pub mod document;
pub mod shipment;
pub mod stage;
pub mod transport;
pub mod ws_event;

// Re-export commonly used types
pub use attachment::{
    DocumentListResponse, DocumentResponse, DocumentUploadResponse, MediaResponse,
    MediaUploadQuery, MediaUploadResponse, RejectedFile,
};
pub use document::{DocumentType, missing_required};
pub use shipment::{
    ChangeStageRequest, DashboardResponse, DeleteShipmentResponse, ListShipmentsQuery,
    ShipmentFields, ShipmentListResponse, ShipmentRequest, ShipmentResponse, StageChange,
    StageEventResponse, TimelineEntry, TrackingResponse, eta_progress_percent,
    normalize_tracking_id,
};
pub use stage::{Stage, StageInfo, StageMark, StageProgress, mark_stages};
pub use transport::TransportMode;
pub use ws_event::{AttachmentKind, WsEvent, WsEventMessage};
