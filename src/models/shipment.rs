//! Shipment request/response models and input validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    DocumentResponse, MediaResponse, Stage, StageInfo, StageProgress, TransportMode,
};
use crate::entity::{shipment, shipment_stage_event};
use crate::error::{AppError, AppResult};

/// Longest accepted tracking id.
pub const MAX_TRACKING_ID_LEN: usize = 64;

/// Trim and upper-case a tracking id, rejecting anything outside `[A-Z0-9-_]`.
pub fn normalize_tracking_id(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if !trimmed.is_ascii() {
        return Err(AppError::InvalidInput(
            "tracking_id may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    let id = trimmed.to_ascii_uppercase();
    if id.is_empty() {
        return Err(AppError::InvalidInput("tracking_id is required".to_string()));
    }
    if id.len() > MAX_TRACKING_ID_LEN {
        return Err(AppError::InvalidInput(format!(
            "tracking_id must be at most {} characters",
            MAX_TRACKING_ID_LEN
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidInput(
            "tracking_id may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(id)
}

/// Trim optional text; blank becomes `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(field: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(value)
}

fn non_negative(field: &str, value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::InvalidInput(format!(
            "{} must be a non-negative number",
            field
        ))),
        other => Ok(other),
    }
}

/// Body for creating a shipment or overwriting an existing one.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ShipmentRequest {
    /// Public tracking identifier (normalized to upper case).
    pub tracking_id: String,
    #[serde(default)]
    pub shipment_name: Option<String>,
    pub origin_country: String,
    pub origin_city: String,
    pub destination_country: String,
    pub destination_city: String,
    pub current_location_country: String,
    pub current_location_city: String,
    /// Free text such as "Air Freight" or "sea"; defaults to air.
    #[serde(default)]
    pub transport_mode: Option<String>,
    /// Stage key or label; defaults to the first stage.
    #[serde(default)]
    pub status: Option<String>,
    /// Computed from the transport mode when omitted.
    #[serde(default)]
    pub estimated_delivery: Option<NaiveDate>,
    #[serde(default)]
    pub package_count: Option<i32>,
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub declared_value: Option<f64>,
    #[serde(default)]
    pub contents: Option<String>,
    #[serde(default)]
    pub hs_code: Option<String>,
    #[serde(default)]
    pub shipper_name: Option<String>,
    #[serde(default)]
    pub shipper_address: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub buyer_address: Option<String>,
    #[serde(default)]
    pub customer_delivery_address: Option<String>,
    #[serde(default)]
    pub shipment_notes: Option<String>,
    #[serde(default)]
    pub pickup_dispatched_through: Option<String>,
    #[serde(default)]
    pub transit_dispatched_through: Option<String>,
    #[serde(default)]
    pub warehouse_dispatched_through: Option<String>,
    #[serde(default)]
    pub customer_dispatched_through: Option<String>,
}

/// Validated, normalized shipment fields ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentFields {
    pub tracking_id: String,
    pub shipment_name: Option<String>,
    pub origin_country: String,
    pub origin_city: String,
    pub destination_country: String,
    pub destination_city: String,
    pub current_location_country: String,
    pub current_location_city: String,
    pub transport_mode: TransportMode,
    pub status: Stage,
    pub estimated_delivery: Option<NaiveDate>,
    pub package_count: i32,
    pub package_type: Option<String>,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<String>,
    pub declared_value: Option<f64>,
    pub contents: Option<String>,
    pub hs_code: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_address: Option<String>,
    pub customer_delivery_address: Option<String>,
    pub shipment_notes: Option<String>,
    pub pickup_dispatched_through: Option<String>,
    pub transit_dispatched_through: Option<String>,
    pub warehouse_dispatched_through: Option<String>,
    pub customer_dispatched_through: Option<String>,
}

impl ShipmentFields {
    /// Delivery date to store: the explicit one, or `created + eta_days`.
    pub fn resolve_estimated_delivery(&self, created: NaiveDate) -> NaiveDate {
        self.estimated_delivery
            .unwrap_or_else(|| self.transport_mode.estimate_delivery(created))
    }
}

impl ShipmentRequest {
    /// Validate and normalize the request.
    pub fn validate(self) -> AppResult<ShipmentFields> {
        let tracking_id = normalize_tracking_id(&self.tracking_id)?;

        let status = match clean(self.status) {
            Some(raw) => Stage::parse(&raw)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown stage: {}", raw)))?,
            None => Stage::FIRST,
        };

        let transport_mode = clean(self.transport_mode)
            .map(|raw| TransportMode::classify(&raw))
            .unwrap_or_default();

        let package_count = self.package_count.unwrap_or(1);
        if package_count < 1 {
            return Err(AppError::InvalidInput(
                "package_count must be at least 1".to_string(),
            ));
        }

        Ok(ShipmentFields {
            tracking_id,
            shipment_name: clean(self.shipment_name),
            origin_country: required("origin_country", self.origin_country)?,
            origin_city: required("origin_city", self.origin_city)?,
            destination_country: required("destination_country", self.destination_country)?,
            destination_city: required("destination_city", self.destination_city)?,
            current_location_country: required(
                "current_location_country",
                self.current_location_country,
            )?,
            current_location_city: required("current_location_city", self.current_location_city)?,
            transport_mode,
            status,
            estimated_delivery: self.estimated_delivery,
            package_count,
            package_type: clean(self.package_type),
            weight_kg: non_negative("weight_kg", self.weight_kg)?,
            dimensions: clean(self.dimensions),
            declared_value: non_negative("declared_value", self.declared_value)?,
            contents: clean(self.contents),
            hs_code: clean(self.hs_code),
            shipper_name: clean(self.shipper_name),
            shipper_address: clean(self.shipper_address),
            buyer_name: clean(self.buyer_name),
            buyer_address: clean(self.buyer_address),
            customer_delivery_address: clean(self.customer_delivery_address),
            shipment_notes: clean(self.shipment_notes),
            pickup_dispatched_through: clean(self.pickup_dispatched_through),
            transit_dispatched_through: clean(self.transit_dispatched_through),
            warehouse_dispatched_through: clean(self.warehouse_dispatched_through),
            customer_dispatched_through: clean(self.customer_dispatched_through),
        })
    }
}

/// Shipment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub tracking_id: String,
    pub shipment_name: Option<String>,
    pub origin_country: String,
    pub origin_city: String,
    pub destination_country: String,
    pub destination_city: String,
    pub current_location_country: String,
    pub current_location_city: String,
    pub transport_mode: TransportMode,
    pub status: Stage,
    pub estimated_delivery: Option<NaiveDate>,
    pub package_count: i32,
    pub package_type: Option<String>,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<String>,
    pub declared_value: Option<f64>,
    pub contents: Option<String>,
    pub hs_code: Option<String>,
    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_address: Option<String>,
    pub customer_delivery_address: Option<String>,
    pub shipment_notes: Option<String>,
    pub pickup_dispatched_through: Option<String>,
    pub transit_dispatched_through: Option<String>,
    pub warehouse_dispatched_through: Option<String>,
    pub customer_dispatched_through: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShipmentResponse {
    /// Carrier recorded for the hand-off that completes `stage`, if any.
    pub fn dispatched_through(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::PickupCompletedAtOrigin => self.pickup_dispatched_through.as_deref(),
            Stage::InTransitToIndia => self.transit_dispatched_through.as_deref(),
            Stage::DispatchedToBefachWarehouse => self.warehouse_dispatched_through.as_deref(),
            Stage::DispatchedToCustomerWarehouse => self.customer_dispatched_through.as_deref(),
            _ => None,
        }
    }
}

impl From<shipment::Model> for ShipmentResponse {
    fn from(m: shipment::Model) -> Self {
        Self {
            id: m.id,
            tracking_id: m.tracking_id,
            shipment_name: m.shipment_name,
            origin_country: m.origin_country,
            origin_city: m.origin_city,
            destination_country: m.destination_country,
            destination_city: m.destination_city,
            current_location_country: m.current_location_country,
            current_location_city: m.current_location_city,
            transport_mode: TransportMode::parse(&m.transport_mode),
            status: Stage::parse(&m.status).unwrap_or(Stage::FIRST),
            estimated_delivery: m.estimated_delivery,
            package_count: m.package_count,
            package_type: m.package_type,
            weight_kg: m.weight_kg,
            dimensions: m.dimensions,
            declared_value: m.declared_value,
            contents: m.contents,
            hs_code: m.hs_code,
            shipper_name: m.shipper_name,
            shipper_address: m.shipper_address,
            buyer_name: m.buyer_name,
            buyer_address: m.buyer_address,
            customer_delivery_address: m.customer_delivery_address,
            shipment_notes: m.shipment_notes,
            pickup_dispatched_through: m.pickup_dispatched_through,
            transit_dispatched_through: m.transit_dispatched_through,
            warehouse_dispatched_through: m.warehouse_dispatched_through,
            customer_dispatched_through: m.customer_dispatched_through,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Query parameters for listing shipments.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListShipmentsQuery {
    /// Filter by stage key or label.
    #[serde(default)]
    pub status: Option<String>,
    /// Substring of the tracking id.
    #[serde(default)]
    pub q: Option<String>,
    /// Maximum results to return (1-100).
    #[serde(default = "default_limit")]
    pub limit: i32,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    20
}

impl Default for ListShipmentsQuery {
    fn default() -> Self {
        Self {
            status: None,
            q: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ListShipmentsQuery {
    pub fn clamped_limit(&self) -> i32 {
        self.limit.clamp(1, 100)
    }

    pub fn clamped_offset(&self) -> i32 {
        self.offset.max(0)
    }

    /// Parsed status filter.
    pub fn stage_filter(&self) -> AppResult<Option<Stage>> {
        match clean(self.status.clone()) {
            Some(raw) => Stage::parse(&raw)
                .map(Some)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown stage: {}", raw))),
            None => Ok(None),
        }
    }

    /// Tracking id search term, normalized the same way stored ids are.
    pub fn search_term(&self) -> Option<String> {
        clean(self.q.clone()).map(|q| q.to_ascii_uppercase())
    }
}

/// Shipment list response with pagination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShipmentListResponse {
    pub shipments: Vec<ShipmentResponse>,
    /// Total number of shipments matching the filter.
    pub total: u64,
    pub limit: i32,
    pub offset: i32,
}

/// Body for moving a shipment to another stage.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangeStageRequest {
    /// Stage key or label.
    pub stage: String,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub location_country: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Validated stage change.
#[derive(Debug, Clone, PartialEq)]
pub struct StageChange {
    pub stage: Stage,
    /// `(city, country)` of the new current location.
    pub location: Option<(String, String)>,
    pub note: Option<String>,
}

impl ChangeStageRequest {
    pub fn validate(self) -> AppResult<StageChange> {
        let stage = Stage::parse(&self.stage)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown stage: {}", self.stage)))?;

        let location = match (clean(self.location_city), clean(self.location_country)) {
            (Some(city), Some(country)) => Some((city, country)),
            (None, None) => None,
            _ => {
                return Err(AppError::InvalidInput(
                    "location_city and location_country must be given together".to_string(),
                ));
            }
        };

        Ok(StageChange {
            stage,
            location,
            note: clean(self.note),
        })
    }
}

/// One recorded stage change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StageEventResponse {
    pub id: Uuid,
    pub stage: Stage,
    pub previous_stage: Option<Stage>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<shipment_stage_event::Model> for StageEventResponse {
    fn from(m: shipment_stage_event::Model) -> Self {
        Self {
            id: m.id,
            stage: Stage::parse(&m.stage).unwrap_or(Stage::FIRST),
            previous_stage: m.previous_stage.as_deref().and_then(Stage::parse),
            location_city: m.location_city,
            location_country: m.location_country,
            note: m.note,
            created_at: m.created_at,
        }
    }
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub total: u64,
    /// Shipments not yet at the final stage.
    pub active: u64,
    /// Shipments at the final stage.
    pub delivered: u64,
    /// Newest shipments.
    pub recent: Vec<ShipmentResponse>,
}

/// Result of a cascading shipment delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteShipmentResponse {
    pub id: Uuid,
    pub deleted_media: u64,
    pub deleted_documents: u64,
    /// `bucket/key` of objects that could not be removed from storage.
    pub orphaned_objects: Vec<String>,
}

/// One row of the public timeline.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimelineEntry {
    pub stage: Stage,
    pub label: String,
    pub index: usize,
    pub completed: bool,
    pub current: bool,
    /// When the stage was last entered; `null` if it was never recorded.
    pub reached_at: Option<DateTime<Utc>>,
    pub dispatched_through: Option<String>,
    /// Media tagged with this stage. Empty for stages not yet completed.
    pub media: Vec<MediaResponse>,
}

/// Public tracking view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrackingResponse {
    pub shipment: ShipmentResponse,
    pub current_stage: StageInfo,
    pub stage_progress: StageProgress,
    /// Elapsed share of the creation-to-ETA window, 0-100.
    pub eta_progress_percent: u8,
    pub timeline: Vec<TimelineEntry>,
    pub documents: Vec<DocumentResponse>,
}

/// Percentage of the time between `created_at` and the end of `eta` that has passed at `now`.
pub fn eta_progress_percent(
    created_at: DateTime<Utc>,
    eta: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> u8 {
    let Some(eta) = eta else {
        return 0;
    };
    let Some(end) = eta.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()) else {
        return 0;
    };
    if now >= end {
        return 100;
    }
    let window = (end - created_at).num_seconds();
    if window <= 0 {
        return 100;
    }
    let elapsed = (now - created_at).num_seconds().clamp(0, window);
    ((elapsed as f64 / window as f64) * 100.0).round() as u8
}
