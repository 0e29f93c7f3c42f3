//! Activity summaries for the dashboard.

use blood_store::BloodStore;
use chrono::{DateTime, Utc};
use entities::{BloodRequest, Donation, Seriousness, User, UserRole};

use crate::eligibility::{is_donor_eligible, DonorProfile, Eligibility};
use crate::MatchingResult;

/// Donations shown in the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Requests shown in the urgent list.
pub const URGENT_REQUESTS_LIMIT: usize = 3;

const UNKNOWN: &str = "Unknown";

/// Headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppStats {
    /// Donations ever recorded.
    pub total_donations: usize,
    /// Requests still open.
    pub open_requests: usize,
    /// Users registered as donors.
    pub registered_donors: usize,
    /// Users registered as receivers.
    pub registered_receivers: usize,
    /// All users.
    pub total_users: usize,
}

impl AppStats {
    /// Counts the given collections.
    pub fn compute(users: &[User], requests: &[BloodRequest], donations: &[Donation]) -> Self {
        let count_role = |role: UserRole| users.iter().filter(|u| u.role == role).count();
        Self {
            total_donations: donations.len(),
            open_requests: requests.iter().filter(|r| r.is_open()).count(),
            registered_donors: count_role(UserRole::Donor),
            registered_receivers: count_role(UserRole::Receiver),
            total_users: users.len(),
        }
    }
}

/// A donation joined with who gave and what blood type it went to.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    /// The donation.
    pub donation: Donation,
    /// Donor name, or "Unknown" when the donor no longer resolves.
    pub donor_name: String,
    /// Requested blood type, or "Unknown" when the request no longer resolves.
    pub blood_type: String,
}

/// The `limit` most recent donations, newest first.
pub fn recent_activity(
    users: &[User],
    requests: &[BloodRequest],
    donations: &[Donation],
    limit: usize,
) -> Vec<ActivityEntry> {
    let mut recent: Vec<&Donation> = donations.iter().collect();
    recent.sort_by(|a, b| b.donation_date.cmp(&a.donation_date));

    recent
        .into_iter()
        .take(limit)
        .map(|donation| ActivityEntry {
            donation: donation.clone(),
            donor_name: users
                .iter()
                .find(|u| u.id == donation.donor_id)
                .map_or_else(|| UNKNOWN.to_string(), |u| u.name.clone()),
            blood_type: requests
                .iter()
                .find(|r| r.id == donation.request_id)
                .map_or_else(|| UNKNOWN.to_string(), |r| r.blood_type.to_string()),
        })
        .collect()
}

/// A donation joined with the request it went to and who asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationDetails {
    /// The donation.
    pub donation: Donation,
    /// Receiver who posted the request.
    pub requester_name: String,
    /// Requested blood type.
    pub blood_type: String,
    /// Hospital area of the request.
    pub location: String,
}

/// Resolves each donation's request and requester, in input order.
///
/// Anything that no longer resolves reads as "Unknown".
pub fn donation_details(
    users: &[User],
    requests: &[BloodRequest],
    donations: &[Donation],
) -> Vec<DonationDetails> {
    donations
        .iter()
        .map(|donation| {
            let request = requests.iter().find(|r| r.id == donation.request_id);
            let requester = request.and_then(|r| users.iter().find(|u| u.id == r.user_id));
            DonationDetails {
                donation: donation.clone(),
                requester_name: requester
                    .map_or_else(|| UNKNOWN.to_string(), |u| u.name.clone()),
                blood_type: request
                    .map_or_else(|| UNKNOWN.to_string(), |r| r.blood_type.to_string()),
                location: request
                    .map_or_else(|| UNKNOWN.to_string(), |r| r.hospital_area.clone()),
            }
        })
        .collect()
}

/// Open high-seriousness requests, oldest first, at most `limit`.
pub fn urgent_requests(requests: &[BloodRequest], limit: usize) -> Vec<&BloodRequest> {
    let mut urgent: Vec<&BloodRequest> = requests
        .iter()
        .filter(|r| r.is_open() && r.seriousness == Seriousness::High)
        .collect();
    urgent.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    urgent.truncate(limit);
    urgent
}

/// What one user sees about themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    /// Requests the user posted.
    pub requests: Vec<BloodRequest>,
    /// Donations the user made.
    pub donations: Vec<Donation>,
    /// Current verdict, for donors only.
    pub eligibility: Option<Eligibility>,
}

/// Builds the personal summary for `user` at `now`.
pub fn user_summary(
    user: &User,
    requests: &[BloodRequest],
    donations: &[Donation],
    now: DateTime<Utc>,
) -> UserSummary {
    UserSummary {
        requests: requests
            .iter()
            .filter(|r| r.user_id == user.id)
            .cloned()
            .collect(),
        donations: donations
            .iter()
            .filter(|d| d.donor_id == user.id)
            .cloned()
            .collect(),
        eligibility: user
            .is_donor()
            .then(|| is_donor_eligible(&DonorProfile::from(user), now)),
    }
}

/// Everything the shared dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Headline counters.
    pub stats: AppStats,
    /// Latest donations.
    pub recent_activity: Vec<ActivityEntry>,
    /// Oldest urgent open requests.
    pub urgent_requests: Vec<BloodRequest>,
}

impl Dashboard {
    /// Reads the store once and builds the dashboard.
    pub async fn load<S: BloodStore + ?Sized>(store: &S) -> MatchingResult<Self> {
        let snapshot = store.snapshot().await?;
        Ok(Self {
            stats: AppStats::compute(&snapshot.users, &snapshot.requests, &snapshot.donations),
            recent_activity: recent_activity(
                &snapshot.users,
                &snapshot.requests,
                &snapshot.donations,
                RECENT_ACTIVITY_LIMIT,
            ),
            urgent_requests: urgent_requests(&snapshot.requests, URGENT_REQUESTS_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use blood_store::MemoryBloodStore;
    use chrono::{Duration, TimeZone};
    use entities::BloodType;
    use uuid::Uuid;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap()
    }

    fn user(name: &str, role: UserRole) -> User {
        User::new(
            name,
            format!("{}@gmail.com", name.to_lowercase()),
            role,
            BloodType::OPositive,
            30,
            "Kochi",
        )
    }

    fn request(owner: Uuid, seriousness: Seriousness, age_hours: i64) -> BloodRequest {
        let mut r = BloodRequest::new(owner, BloodType::OPositive, "Kochi", 2, seriousness);
        r.created_at = now() - Duration::hours(age_hours);
        r
    }

    #[test]
    fn test_stats() {
        let users = vec![
            user("Anu", UserRole::Donor),
            user("Binu", UserRole::Donor),
            user("Chitra", UserRole::Receiver),
        ];
        let mut closed = request(users[2].id, Seriousness::Low, 1);
        closed.consume_unit();
        closed.consume_unit();
        let requests = vec![request(users[2].id, Seriousness::High, 1), closed];
        let donations = vec![Donation::new(users[0].id, requests[1].id, now())];

        let stats = AppStats::compute(&users, &requests, &donations);
        assert_eq!(
            stats,
            AppStats {
                total_donations: 1,
                open_requests: 1,
                registered_donors: 2,
                registered_receivers: 1,
                total_users: 3,
            }
        );
    }

    #[test]
    fn test_recent_activity_newest_first_with_unknowns() {
        let donor = user("Anu", UserRole::Donor);
        let req = request(Uuid::new_v4(), Seriousness::High, 5);
        let donations: Vec<Donation> = (0..7)
            .map(|i| Donation::new(donor.id, req.id, now() - Duration::days(i)))
            .chain([Donation::new(Uuid::new_v4(), Uuid::new_v4(), now() + Duration::hours(1))])
            .collect();

        let feed = recent_activity(&[donor], &[req], &donations, RECENT_ACTIVITY_LIMIT);

        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].donor_name, "Unknown");
        assert_eq!(feed[0].blood_type, "Unknown");
        assert_eq!(feed[1].donor_name, "Anu");
        assert_eq!(feed[1].blood_type, "O+");
        assert!(feed
            .windows(2)
            .all(|w| w[0].donation.donation_date >= w[1].donation.donation_date));
    }

    #[test]
    fn test_donation_details_resolve_requester() {
        let donor = user("Anu", UserRole::Donor);
        let receiver = user("Chitra", UserRole::Receiver);
        let known = request(receiver.id, Seriousness::High, 2);
        let orphaned = request(Uuid::new_v4(), Seriousness::Low, 3);
        let donations = vec![
            Donation::new(donor.id, known.id, now()),
            Donation::new(donor.id, orphaned.id, now()),
            Donation::new(donor.id, Uuid::new_v4(), now()),
        ];

        let details = donation_details(&[donor, receiver], &[known, orphaned], &donations);

        assert_eq!(details.len(), 3);
        assert_eq!(details[0].requester_name, "Chitra");
        assert_eq!(details[0].blood_type, "O+");
        assert_eq!(details[0].location, "Kochi");

        assert_eq!(details[1].requester_name, "Unknown");
        assert_eq!(details[1].blood_type, "O+");

        assert_eq!(details[2].requester_name, "Unknown");
        assert_eq!(details[2].blood_type, "Unknown");
        assert_eq!(details[2].location, "Unknown");
        assert_eq!(details[2].donation, donations[2]);
    }

    #[test]
    fn test_urgent_requests_oldest_first() {
        let owner = Uuid::new_v4();
        let mut fulfilled = request(owner, Seriousness::High, 100);
        fulfilled.consume_unit();
        fulfilled.consume_unit();
        let requests = vec![
            request(owner, Seriousness::High, 1),
            request(owner, Seriousness::Moderate, 50),
            fulfilled,
            request(owner, Seriousness::High, 10),
            request(owner, Seriousness::High, 5),
            request(owner, Seriousness::High, 20),
        ];

        let urgent = urgent_requests(&requests, URGENT_REQUESTS_LIMIT);
        let ids: Vec<Uuid> = urgent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![requests[5].id, requests[3].id, requests[4].id]);
    }

    #[test]
    fn test_user_summary() {
        let donor = user("Anu", UserRole::Donor).with_last_donated_date(now() - Duration::days(30));
        let receiver = user("Chitra", UserRole::Receiver);
        let req = request(receiver.id, Seriousness::High, 1);
        let donations = vec![Donation::new(donor.id, req.id, now() - Duration::days(30))];
        let requests = vec![req];

        let donor_summary = user_summary(&donor, &requests, &donations, now());
        assert_eq!(donor_summary.donations.len(), 1);
        assert!(donor_summary.requests.is_empty());
        let verdict = donor_summary.eligibility.unwrap();
        assert!(!verdict.eligible);
        assert_eq!(verdict.days_until_eligible, Some(60));

        let receiver_summary = user_summary(&receiver, &requests, &donations, now());
        assert_eq!(receiver_summary.requests.len(), 1);
        assert!(receiver_summary.eligibility.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_load() {
        let receiver = user("Chitra", UserRole::Receiver);
        let store = MemoryBloodStore::with_data(
            vec![receiver.clone()],
            vec![request(receiver.id, Seriousness::High, 2)],
            Vec::new(),
        );

        let dashboard = Dashboard::load(&store).await.unwrap();
        assert_eq!(dashboard.stats.open_requests, 1);
        assert_eq!(dashboard.stats.registered_receivers, 1);
        assert_eq!(dashboard.urgent_requests.len(), 1);
        assert!(dashboard.recent_activity.is_empty());
    }
}
