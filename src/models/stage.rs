//! Shipment stages and progress computation.
//!
//! The stage list is fixed and ordered. A shipment's progress is the position
//! of its current stage in that list; every stage at or before it counts as
//! completed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named step in the life of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ProductInsuranceCompleted,
    SupplierPaymentProcessed,
    AwaitingPackagingApproval,
    PickupCompletedAtOrigin,
    InTransitToIndia,
    PendingCustomerClearance,
    CustomsClearanceCompleted,
    DispatchedToBefachWarehouse,
    DispatchedToCustomerWarehouse,
}

impl Stage {
    /// Every stage, in shipment order.
    pub const ALL: [Stage; 9] = [
        Stage::ProductInsuranceCompleted,
        Stage::SupplierPaymentProcessed,
        Stage::AwaitingPackagingApproval,
        Stage::PickupCompletedAtOrigin,
        Stage::InTransitToIndia,
        Stage::PendingCustomerClearance,
        Stage::CustomsClearanceCompleted,
        Stage::DispatchedToBefachWarehouse,
        Stage::DispatchedToCustomerWarehouse,
    ];

    /// Stage a new shipment starts in.
    pub const FIRST: Stage = Stage::ProductInsuranceCompleted;

    /// Stage that marks a shipment as delivered.
    pub const FINAL: Stage = Stage::DispatchedToCustomerWarehouse;

    /// Stable key used in storage paths, query strings and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductInsuranceCompleted => "product_insurance_completed",
            Self::SupplierPaymentProcessed => "supplier_payment_processed",
            Self::AwaitingPackagingApproval => "awaiting_packaging_approval",
            Self::PickupCompletedAtOrigin => "pickup_completed_at_origin",
            Self::InTransitToIndia => "in_transit_to_india",
            Self::PendingCustomerClearance => "pending_customer_clearance",
            Self::CustomsClearanceCompleted => "customs_clearance_completed",
            Self::DispatchedToBefachWarehouse => "dispatched_to_befach_warehouse",
            Self::DispatchedToCustomerWarehouse => "dispatched_to_customer_warehouse",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductInsuranceCompleted => "Product Insurance Completed",
            Self::SupplierPaymentProcessed => "Supplier Payment Processed",
            Self::AwaitingPackagingApproval => "Awaiting Packaging Approval from Customer",
            Self::PickupCompletedAtOrigin => "Pickup Completed at Origin",
            Self::InTransitToIndia => "In Transit to India",
            Self::PendingCustomerClearance => "Pending Customer Clearance",
            Self::CustomsClearanceCompleted => "Customs Clearance Completed",
            Self::DispatchedToBefachWarehouse => "Dispatched to Befach Warehouse",
            Self::DispatchedToCustomerWarehouse => "Dispatched to Customer Warehouse",
        }
    }

    /// Short labels used by older tracking pages.
    fn legacy_label(&self) -> Option<&'static str> {
        match self {
            Self::ProductInsuranceCompleted => Some("Product Insurance"),
            Self::SupplierPaymentProcessed => Some("Supplier Payment"),
            Self::AwaitingPackagingApproval => Some("Packaging Approval from Customer"),
            Self::PickupCompletedAtOrigin => Some("Pickup at Origin"),
            Self::CustomsClearanceCompleted => Some("Customs Clearance"),
            Self::DispatchedToBefachWarehouse => Some("Dispatch to Befach Warehouse"),
            Self::DispatchedToCustomerWarehouse => Some("Dispatch to Customer Warehouse"),
            Self::InTransitToIndia | Self::PendingCustomerClearance => None,
        }
    }

    /// Parse a stage from its key, its label, or a legacy label.
    ///
    /// Matching ignores case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|stage| {
            stage.as_str().eq_ignore_ascii_case(needle)
                || stage.label().eq_ignore_ascii_case(needle)
                || stage
                    .legacy_label()
                    .is_some_and(|legacy| legacy.eq_ignore_ascii_case(needle))
        })
    }

    /// Zero-based position in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    pub fn is_final(&self) -> bool {
        *self == Self::FINAL
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stage descriptor returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StageInfo {
    pub key: Stage,
    pub label: String,
    pub index: usize,
}

impl From<Stage> for StageInfo {
    fn from(stage: Stage) -> Self {
        Self {
            key: stage,
            label: stage.label().to_string(),
            index: stage.index(),
        }
    }
}

/// Completed-stage counters for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StageProgress {
    /// Number of stages at or before the current one.
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, rounded to the nearest whole percent.
    pub percent: u8,
}

impl StageProgress {
    pub fn for_stage(stage: Stage) -> Self {
        let total = Stage::ALL.len();
        let completed = stage.index() + 1;
        let percent = ((completed * 100) as f64 / total as f64).round() as u8;
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Per-stage view of the ordered list relative to a current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMark {
    pub stage: Stage,
    pub completed: bool,
    pub current: bool,
}

/// Mark each stage as completed/current relative to `current`.
pub fn mark_stages(current: Stage) -> Vec<StageMark> {
    let current_index = current.index();
    Stage::ALL
        .into_iter()
        .enumerate()
        .map(|(index, stage)| StageMark {
            stage,
            completed: index <= current_index,
            current: index == current_index,
        })
        .collect()
}
