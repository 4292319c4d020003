//! Shipment document types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of paperwork attached to a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    CommercialInvoice,
    BillOfLading,
    PackingList,
    OtherDocuments,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::CommercialInvoice,
        DocumentType::BillOfLading,
        DocumentType::PackingList,
        DocumentType::OtherDocuments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommercialInvoice => "commercial_invoice",
            Self::BillOfLading => "bill_of_lading",
            Self::PackingList => "packing_list",
            Self::OtherDocuments => "other_documents",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "commercial_invoice" => Some(Self::CommercialInvoice),
            "bill_of_lading" => Some(Self::BillOfLading),
            "packing_list" => Some(Self::PackingList),
            "other_documents" | "other" => Some(Self::OtherDocuments),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CommercialInvoice => "Commercial Invoice",
            Self::BillOfLading => "Bill of Lading",
            Self::PackingList => "Packing List",
            Self::OtherDocuments => "Other Documents",
        }
    }

    /// Every shipment is expected to carry one of these.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::OtherDocuments)
    }

    /// Single-slot types hold at most one document; a new upload replaces the old one.
    pub fn is_single_slot(&self) -> bool {
        self.is_required()
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Required document types missing from `present`.
pub fn missing_required(present: &[DocumentType]) -> Vec<DocumentType> {
    DocumentType::ALL
        .into_iter()
        .filter(|t| t.is_required() && !present.contains(t))
        .collect()
}
