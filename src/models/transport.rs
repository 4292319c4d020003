//! Transport modes and their delivery estimates.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a shipment travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Air,
    Sea,
    Road,
    Rail,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Sea => "sea",
            Self::Road => "road",
            Self::Rail => "rail",
        }
    }

    /// Classify free text ("Air Freight", "Ship", "Train"...) into a mode.
    ///
    /// Anything unrecognised is treated as road transport.
    pub fn classify(s: &str) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("air") || lower.contains("plane") {
            Self::Air
        } else if lower.contains("sea") || lower.contains("ship") {
            Self::Sea
        } else if lower.contains("rail") || lower.contains("train") {
            Self::Rail
        } else {
            Self::Road
        }
    }

    /// Parse a value stored by this server. Unknown values fall back to classification.
    pub fn parse(s: &str) -> Self {
        match s {
            "air" => Self::Air,
            "sea" => Self::Sea,
            "road" => Self::Road,
            "rail" => Self::Rail,
            other => Self::classify(other),
        }
    }

    /// Typical door-to-door transit time in days.
    pub fn eta_days(&self) -> u64 {
        match self {
            Self::Air => 15,
            Self::Sea => 45,
            Self::Road | Self::Rail => 30,
        }
    }

    /// Estimated delivery date for a shipment that left on `from`.
    pub fn estimate_delivery(&self, from: NaiveDate) -> NaiveDate {
        from.checked_add_days(Days::new(self.eta_days()))
            .unwrap_or(from)
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
