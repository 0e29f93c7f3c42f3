//! Matching engine for the blood bank.
//!
//! - [`compatibility`]: which donor blood types may supply which receivers
//! - [`eligibility`]: whether a donor is medically cleared to give blood now
//! - [`matcher`]: open requests a donor can serve in their own area
//! - [`fulfillment`]: recording a donation against a request as one commit
//! - [`requests`]: posting, filtering and ordering blood requests
//! - [`dashboard`]: activity summaries

pub mod compatibility;
pub mod dashboard;
pub mod eligibility;
mod error;
pub mod fulfillment;
pub mod matcher;
pub mod requests;

pub use compatibility::{can_donate_to, validate_blood_type};
pub use eligibility::{is_donor_eligible, DonorProfile, Eligibility, IneligibilityReason};
pub use error::*;
pub use fulfillment::FulfillmentService;
pub use matcher::find_compatible_requests;
pub use requests::{NewBloodRequest, RequestFilter, RequestService};
