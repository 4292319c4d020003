//! SeaORM entity definitions.

pub mod shipment;
pub mod shipment_document;
pub mod shipment_media;
pub mod shipment_stage_event;
