//! Posting, filtering and ordering blood requests.

use std::sync::Arc;

use blood_store::BloodStore;
use entities::{BloodRequest, BloodType, Seriousness};
use tracing::info;
use uuid::Uuid;

use crate::{MatchingError, MatchingResult};

/// Most units a single request may ask for.
pub const MAX_UNITS_PER_REQUEST: u32 = 10;

/// Fields a receiver fills in to post a request.
#[derive(Debug, Clone)]
pub struct NewBloodRequest {
    /// Needed blood type, any case.
    pub blood_type: String,
    /// Hospital city or area.
    pub hospital_area: String,
    /// Units needed, 1 to 10.
    pub units_needed: u32,
    /// Urgency.
    pub seriousness: Seriousness,
}

impl NewBloodRequest {
    /// Checks every field, returning the parsed blood type.
    ///
    /// All problems are reported together.
    pub fn validate(&self) -> MatchingResult<BloodType> {
        let mut problems = Vec::new();

        let blood_type = BloodType::parse(&self.blood_type);
        if blood_type.is_none() {
            problems.push("Please select a valid blood type".to_string());
        }
        if self.hospital_area.trim().is_empty() {
            problems.push("Hospital area is required".to_string());
        }
        if !(1..=MAX_UNITS_PER_REQUEST).contains(&self.units_needed) {
            problems.push(format!(
                "Units needed must be between 1 and {MAX_UNITS_PER_REQUEST}"
            ));
        }

        match blood_type {
            Some(blood_type) if problems.is_empty() => Ok(blood_type),
            _ => Err(MatchingError::Validation(problems.join("; "))),
        }
    }
}

/// Which requests a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestFilter {
    /// Every request.
    #[default]
    All,
    /// Only open requests.
    Open,
    /// Only the viewer's own requests.
    Mine,
}

impl RequestFilter {
    /// Parses a filter name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "open" => Some(Self::Open),
            "mine" | "my" => Some(Self::Mine),
            _ => None,
        }
    }
}

/// Applies `filter` for the user `viewer_id`, keeping input order.
///
/// A non-empty `blood_type` search keeps only requests whose blood type
/// contains it, ignoring case, so `"b"` finds B and AB requests.
pub fn filter_requests<'a>(
    requests: &'a [BloodRequest],
    filter: RequestFilter,
    viewer_id: Uuid,
    blood_type: Option<&str>,
) -> Vec<&'a BloodRequest> {
    let search = blood_type
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());

    requests
        .iter()
        .filter(|r| match filter {
            RequestFilter::All => true,
            RequestFilter::Open => r.is_open(),
            RequestFilter::Mine => r.user_id == viewer_id,
        })
        .filter(|r| {
            search
                .as_deref()
                .is_none_or(|s| r.blood_type.as_str().contains(s))
        })
        .collect()
}

/// Orders requests most urgent first, oldest first within the same urgency.
pub fn sort_by_urgency(requests: &mut [&BloodRequest]) {
    requests.sort_by(|a, b| {
        b.seriousness
            .rank()
            .cmp(&a.seriousness.rank())
            .then(a.created_at.cmp(&b.created_at))
    });
}

/// Creates blood requests on behalf of receivers.
pub struct RequestService<S> {
    store: Arc<S>,
}

impl<S> Clone for RequestService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BloodStore> RequestService<S> {
    /// Creates a new request service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Posts a new open request owned by `receiver_id`.
    pub async fn create_request(
        &self,
        receiver_id: Uuid,
        new: NewBloodRequest,
    ) -> MatchingResult<BloodRequest> {
        let blood_type = new.validate()?;

        let mut snapshot = self.store.snapshot().await?;
        let receiver = snapshot
            .user(receiver_id)
            .ok_or_else(|| MatchingError::not_found("User", receiver_id))?;
        if !receiver.is_receiver() {
            return Err(MatchingError::validation(
                "Only receivers can post blood requests",
            ));
        }

        let request = BloodRequest::new(
            receiver_id,
            blood_type,
            new.hospital_area.trim(),
            new.units_needed,
            new.seriousness,
        );
        snapshot.requests.push(request.clone());
        self.store.commit(snapshot).await?;

        info!(
            request_id = %request.id,
            %receiver_id,
            blood_type = %request.blood_type,
            units_needed = request.units_needed,
            seriousness = request.seriousness.as_str(),
            "Blood request created"
        );
        Ok(request)
    }

    /// Lists stored requests matching `filter` for `viewer_id`, optionally
    /// narrowed by a blood type search.
    pub async fn list_requests(
        &self,
        filter: RequestFilter,
        viewer_id: Uuid,
        blood_type: Option<&str>,
    ) -> MatchingResult<Vec<BloodRequest>> {
        let requests = self.store.load_requests().await?;
        Ok(filter_requests(&requests, filter, viewer_id, blood_type)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use blood_store::MemoryBloodStore;
    use chrono::Duration;
    use entities::{RequestStatus, User, UserRole};

    use super::*;

    fn new_request(blood_type: &str, units: u32) -> NewBloodRequest {
        NewBloodRequest {
            blood_type: blood_type.to_string(),
            hospital_area: "  Chennai ".to_string(),
            units_needed: units,
            seriousness: Seriousness::High,
        }
    }

    fn user(role: UserRole) -> User {
        User::new("Lata", "lata@gmail.com", role, BloodType::OPositive, 44, "Chennai")
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let bad = NewBloodRequest {
            blood_type: "Q+".to_string(),
            hospital_area: "   ".to_string(),
            units_needed: 11,
            seriousness: Seriousness::Low,
        };
        match bad.validate() {
            Err(MatchingError::Validation(msg)) => {
                assert!(msg.contains("blood type"));
                assert!(msg.contains("Hospital area"));
                assert!(msg.contains("between 1 and 10"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }

        assert!(new_request("ab-", 0).validate().is_err());
        assert_eq!(new_request("ab-", 10).validate().unwrap(), BloodType::AbNegative);
    }

    #[tokio::test]
    async fn test_receiver_creates_open_request() {
        let receiver = user(UserRole::Receiver);
        let store = Arc::new(MemoryBloodStore::with_data(
            vec![receiver.clone()],
            Vec::new(),
            Vec::new(),
        ));
        let service = RequestService::new(store.clone());

        let request = service
            .create_request(receiver.id, new_request("b-", 4))
            .await
            .unwrap();

        assert_eq!(request.blood_type, BloodType::BNegative);
        assert_eq!(request.hospital_area, "Chennai");
        assert_eq!(request.status, RequestStatus::Open);
        assert_eq!(store.load_requests().await.unwrap(), vec![request]);
    }

    #[tokio::test]
    async fn test_donor_cannot_create_request() {
        let donor = user(UserRole::Donor);
        let store = Arc::new(MemoryBloodStore::with_data(
            vec![donor.clone()],
            Vec::new(),
            Vec::new(),
        ));
        let service = RequestService::new(store.clone());

        let err = service
            .create_request(donor.id, new_request("A+", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::Validation(_)));

        let err = service
            .create_request(Uuid::new_v4(), new_request("A+", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::NotFound { .. }));
        assert!(store.load_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_filter_requests() {
        let me = Uuid::new_v4();
        let mine = BloodRequest::new(me, BloodType::APositive, "Goa", 1, Seriousness::Low);
        let mut closed = BloodRequest::new(me, BloodType::APositive, "Goa", 1, Seriousness::Low);
        closed.consume_unit();
        let theirs =
            BloodRequest::new(Uuid::new_v4(), BloodType::APositive, "Goa", 1, Seriousness::Low);
        let requests = vec![mine, closed, theirs];

        assert_eq!(filter_requests(&requests, RequestFilter::All, me, None).len(), 3);
        assert_eq!(filter_requests(&requests, RequestFilter::Open, me, None).len(), 2);
        assert_eq!(filter_requests(&requests, RequestFilter::Mine, me, None).len(), 2);
        assert_eq!(RequestFilter::parse("MY"), Some(RequestFilter::Mine));
    }

    #[test]
    fn test_filter_requests_by_blood_type_search() {
        let owner = Uuid::new_v4();
        let request = |blood_type| BloodRequest::new(owner, blood_type, "Goa", 1, Seriousness::Low);
        let mut closed_ab = request(BloodType::AbNegative);
        closed_ab.consume_unit();
        let requests = vec![
            request(BloodType::BPositive),
            request(BloodType::APositive),
            closed_ab,
            request(BloodType::ONegative),
        ];

        let types = |filter: RequestFilter, search: Option<&str>| -> Vec<BloodType> {
            filter_requests(&requests, filter, owner, search)
                .iter()
                .map(|r| r.blood_type)
                .collect()
        };

        assert_eq!(
            types(RequestFilter::All, Some("b")),
            vec![BloodType::BPositive, BloodType::AbNegative]
        );
        assert_eq!(types(RequestFilter::Open, Some("b")), vec![BloodType::BPositive]);
        assert_eq!(types(RequestFilter::All, Some(" o- ")), vec![BloodType::ONegative]);
        assert_eq!(types(RequestFilter::All, Some("+")).len(), 2);
        assert_eq!(types(RequestFilter::All, Some("")).len(), 4);
        assert!(types(RequestFilter::All, Some("c")).is_empty());
    }

    #[test]
    fn test_sort_by_urgency() {
        let owner = Uuid::new_v4();
        let mut low = BloodRequest::new(owner, BloodType::APositive, "Goa", 1, Seriousness::Low);
        let mut old_high =
            BloodRequest::new(owner, BloodType::APositive, "Goa", 1, Seriousness::High);
        let new_high = BloodRequest::new(owner, BloodType::APositive, "Goa", 1, Seriousness::High);
        old_high.created_at = new_high.created_at - Duration::hours(2);
        low.created_at = new_high.created_at - Duration::days(1);

        let mut sorted = vec![&low, &new_high, &old_high];
        sort_by_urgency(&mut sorted);

        let ids: Vec<Uuid> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![old_high.id, new_high.id, low.id]);
    }
}
