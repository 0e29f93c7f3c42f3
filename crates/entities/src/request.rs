//! BloodRequest entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::BloodType;

/// How urgently the receiver needs blood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Seriousness {
    /// Can wait.
    Low,
    /// Needed soon.
    #[default]
    Moderate,
    /// Needed now.
    High,
}

impl Seriousness {
    /// Converts the seriousness to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }

    /// Parses a seriousness level from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MODERATE" => Some(Self::Moderate),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    /// Ordering weight, higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Moderate => 1,
            Self::High => 2,
        }
    }
}

/// Request lifecycle. `Open` moves to `Fulfilled` once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Still accepting donations.
    #[default]
    Open,
    /// All units have been donated.
    Fulfilled,
}

impl RequestStatus {
    /// Converts the status to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Fulfilled => "FULFILLED",
        }
    }
}

/// A receiver's need for blood at a hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// The receiver who posted the request.
    pub user_id: Uuid,
    /// Blood type needed.
    pub blood_type: BloodType,
    /// Hospital city or area, matched against donor location.
    pub hospital_area: String,
    /// Units still needed.
    pub units_needed: u32,
    /// Urgency.
    pub seriousness: Seriousness,
    /// Current status.
    pub status: RequestStatus,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl BloodRequest {
    /// Creates a new open request.
    pub fn new(
        user_id: Uuid,
        blood_type: BloodType,
        hospital_area: impl Into<String>,
        units_needed: u32,
        seriousness: Seriousness,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            blood_type,
            hospital_area: hospital_area.into(),
            units_needed,
            seriousness,
            status: RequestStatus::Open,
            created_at: Utc::now(),
        }
    }

    /// Whether the request still accepts donations.
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }

    /// Consumes one unit and closes the request once nothing is left.
    ///
    /// Returns the units still needed afterwards.
    pub fn consume_unit(&mut self) -> u32 {
        self.units_needed = self.units_needed.saturating_sub(1);
        if self.units_needed == 0 {
            self.status = RequestStatus::Fulfilled;
        }
        self.units_needed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(units: u32) -> BloodRequest {
        BloodRequest::new(
            Uuid::new_v4(),
            BloodType::APositive,
            "Delhi",
            units,
            Seriousness::High,
        )
    }

    #[test]
    fn test_consume_unit_keeps_partial_request_open() {
        let mut req = request(3);
        assert_eq!(req.consume_unit(), 2);
        assert!(req.is_open());
    }

    #[test]
    fn test_consume_last_unit_fulfills() {
        let mut req = request(1);
        assert_eq!(req.consume_unit(), 0);
        assert_eq!(req.status, RequestStatus::Fulfilled);

        // Stays fulfilled and never underflows.
        assert_eq!(req.consume_unit(), 0);
        assert_eq!(req.status, RequestStatus::Fulfilled);
    }

    #[test]
    fn test_seriousness_rank() {
        assert!(Seriousness::High.rank() > Seriousness::Moderate.rank());
        assert!(Seriousness::Moderate.rank() > Seriousness::Low.rank());
        assert_eq!(Seriousness::parse("high"), Some(Seriousness::High));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(request(2)).unwrap();
        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["hospitalArea"], "Delhi");
        assert_eq!(json["unitsNeeded"], 2);
    }
}
