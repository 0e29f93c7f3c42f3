//! Donation entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Units recorded by a single donation.
pub const UNITS_PER_DONATION: u32 = 1;

/// An immutable record of a donor giving blood against a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Unique identifier.
    pub id: Uuid,
    /// The donor.
    pub donor_id: Uuid,
    /// The request this donation counts towards.
    pub request_id: Uuid,
    /// When the donation happened.
    pub donation_date: DateTime<Utc>,
    /// Units given.
    pub units_contributed: u32,
}

impl Donation {
    /// Creates a single-unit donation made at `donation_date`.
    pub fn new(donor_id: Uuid, request_id: Uuid, donation_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            donor_id,
            request_id,
            donation_date,
            units_contributed: UNITS_PER_DONATION,
        }
    }
}
