//! Recording a donation against a blood request.
//!
//! A donation touches three collections: a new [`Donation`] is appended, the
//! request loses one unit (closing when none are left) and the donor's
//! `last_donated_date` moves to now. All three are computed on one snapshot
//! and written in a single commit, so a reader never sees a partial donation.

use std::sync::Arc;

use blood_store::BloodStore;
use chrono::{DateTime, Utc};
use entities::{BloodRequest, Donation, User};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::compatibility::is_compatible;
use crate::eligibility::{is_donor_eligible, DonorProfile};
use crate::{MatchingError, MatchingResult};

/// Records donations against a store.
pub struct FulfillmentService<S> {
    store: Arc<S>,
}

impl<S> Clone for FulfillmentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BloodStore> FulfillmentService<S> {
    /// Creates a new fulfillment service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Records one unit donated by `donor_id` towards `request_id`, now.
    pub async fn record_donation(
        &self,
        donor_id: Uuid,
        request_id: Uuid,
    ) -> MatchingResult<Donation> {
        self.record_donation_at(donor_id, request_id, Utc::now()).await
    }

    /// Records one unit donated by `donor_id` towards `request_id` at `now`.
    ///
    /// The request and donor are re-read from the store, so a request closed
    /// since the caller listed it is rejected with
    /// [`MatchingError::RequestClosed`]. Nothing is written on any error.
    pub async fn record_donation_at(
        &self,
        donor_id: Uuid,
        request_id: Uuid,
        now: DateTime<Utc>,
    ) -> MatchingResult<Donation> {
        let mut snapshot = self.store.snapshot().await?;

        let request = snapshot
            .request(request_id)
            .ok_or_else(|| MatchingError::not_found("BloodRequest", request_id))?;
        let donor = snapshot
            .user(donor_id)
            .ok_or_else(|| MatchingError::not_found("User", donor_id))?;

        if !request.is_open() {
            warn!(%request_id, %donor_id, "Donation rejected, request already fulfilled");
            return Err(MatchingError::RequestClosed {
                id: request_id.to_string(),
            });
        }
        check_donor(donor, request, now)?;

        let donation = Donation::new(donor_id, request_id, now);
        snapshot.donations.push(donation.clone());

        let request = snapshot
            .request_mut(request_id)
            .ok_or_else(|| MatchingError::not_found("BloodRequest", request_id))?;
        let units_remaining = request.consume_unit();
        let request_status = request.status;

        let donor = snapshot
            .user_mut(donor_id)
            .ok_or_else(|| MatchingError::not_found("User", donor_id))?;
        donor.last_donated_date = Some(now);
        let donor = donor.clone();
        if snapshot
            .current_user
            .as_ref()
            .is_some_and(|u| u.id == donor_id)
        {
            snapshot.current_user = Some(donor);
        }

        if let Err(e) = self.store.commit(snapshot).await {
            if e.is_conflict() {
                warn!(%request_id, %donor_id, error = %e, "Donation lost a race with another write");
            } else {
                error!(%request_id, %donor_id, error = %e, "Failed to record donation");
            }
            return Err(e.into());
        }

        info!(
            donation_id = %donation.id,
            %donor_id,
            %request_id,
            units_remaining,
            status = request_status.as_str(),
            "Donation recorded"
        );
        Ok(donation)
    }
}

fn check_donor(donor: &User, request: &BloodRequest, now: DateTime<Utc>) -> MatchingResult<()> {
    if !donor.is_donor() {
        return Err(MatchingError::validation("Only donors can record donations"));
    }

    if !is_compatible(donor.blood_type, request.blood_type) {
        return Err(MatchingError::validation(format!(
            "{} blood cannot be given to a {} request",
            donor.blood_type, request.blood_type
        )));
    }

    let verdict = is_donor_eligible(&DonorProfile::from(donor), now);
    if let Some(reason) = verdict.reason {
        return Err(MatchingError::validation(format!("Donor is not eligible: {reason}")));
    }

    Ok(())
}
