//! Donor medical eligibility.
//!
//! Checks run in a fixed order and the first failure decides the verdict:
//! alcohol, smoking, age, then the cooldown since the last donation.

use std::fmt;

use chrono::{DateTime, Utc};
use entities::{Gender, User};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Youngest age allowed to donate.
pub const MIN_DONOR_AGE: u32 = 18;

/// Oldest age allowed to donate.
pub const MAX_DONOR_AGE: u32 = 65;

/// Days a male donor waits between donations.
pub const MALE_DONATION_GAP_DAYS: u32 = 90;

/// Days every other donor waits between donations.
pub const DEFAULT_DONATION_GAP_DAYS: u32 = 120;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// The donor attributes eligibility depends on.
///
/// Deserializes from a loosely shaped donor record: an age that is missing or
/// not a whole number becomes `None`, which fails the age check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    /// Age in years.
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    /// Declared gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// When the donor last gave blood.
    #[serde(default)]
    pub last_donated_date: Option<DateTime<Utc>>,
    /// Under the influence of alcohol.
    #[serde(default)]
    pub is_drunk: bool,
    /// Smoker.
    #[serde(default)]
    pub is_smoker: bool,
}

impl From<&User> for DonorProfile {
    fn from(user: &User) -> Self {
        Self {
            age: Some(user.age),
            gender: Some(user.gender),
            last_donated_date: user.last_donated_date,
            is_drunk: user.is_drunk,
            is_smoker: user.is_smoker,
        }
    }
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Why a donor cannot give blood right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibilityReason {
    /// Under the influence of alcohol.
    Intoxicated,
    /// Smoker.
    Smoker,
    /// Age missing or outside 18..=65.
    AgeOutOfRange,
    /// Too soon after the previous donation.
    Cooldown {
        /// Required gap for this donor.
        required_days: u32,
        /// Gender the gap was chosen for.
        gender: Option<Gender>,
    },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intoxicated => f.write_str("Currently under influence of alcohol"),
            Self::Smoker => f.write_str("Smokers not eligible"),
            Self::AgeOutOfRange => write!(
                f,
                "Age must be between {MIN_DONOR_AGE} and {MAX_DONOR_AGE}"
            ),
            Self::Cooldown {
                required_days,
                gender,
            } => write!(
                f,
                "Must wait {required_days} days between donations ({})",
                gender.map_or("Unspecified", |g| g.label())
            ),
        }
    }
}

/// Eligibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Whether the donor may give blood now.
    pub eligible: bool,
    /// Set when not eligible.
    pub reason: Option<IneligibilityReason>,
    /// Days left in the cooldown, only for [`IneligibilityReason::Cooldown`].
    pub days_until_eligible: Option<u32>,
}

impl Eligibility {
    fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
            days_until_eligible: None,
        }
    }

    fn ineligible(reason: IneligibilityReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            days_until_eligible: None,
        }
    }
}

/// Required gap between donations. Only `Male` gets the shorter gap.
pub fn required_gap_days(gender: Option<Gender>) -> u32 {
    match gender {
        Some(Gender::Male) => MALE_DONATION_GAP_DAYS,
        _ => DEFAULT_DONATION_GAP_DAYS,
    }
}

/// Whole days from `since` to `now`, where any partial day counts as a full
/// one. A `since` in the future counts as zero days.
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - since).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    (elapsed_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Evaluates whether `donor` may give blood at `now`.
pub fn is_donor_eligible(donor: &DonorProfile, now: DateTime<Utc>) -> Eligibility {
    if donor.is_drunk {
        return Eligibility::ineligible(IneligibilityReason::Intoxicated);
    }

    if donor.is_smoker {
        return Eligibility::ineligible(IneligibilityReason::Smoker);
    }

    match donor.age {
        Some(age) if (MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&age) => {}
        _ => return Eligibility::ineligible(IneligibilityReason::AgeOutOfRange),
    }

    if let Some(last) = donor.last_donated_date {
        let elapsed = days_since(last, now);
        let required = required_gap_days(donor.gender);

        if elapsed < i64::from(required) {
            // elapsed is in 0..required here, so the difference fits.
            let remaining = u32::try_from(i64::from(required) - elapsed).unwrap_or(required);
            return Eligibility {
                eligible: false,
                reason: Some(IneligibilityReason::Cooldown {
                    required_days: required,
                    gender: donor.gender,
                }),
                days_until_eligible: Some(remaining),
            };
        }
    }

    Eligibility::eligible()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn healthy(gender: Gender) -> DonorProfile {
        DonorProfile {
            age: Some(30),
            gender: Some(gender),
            ..Default::default()
        }
    }

    fn donated_days_ago(gender: Gender, days: i64) -> DonorProfile {
        DonorProfile {
            last_donated_date: Some(now() - Duration::days(days)),
            ..healthy(gender)
        }
    }

    #[test]
    fn test_healthy_first_time_donor_is_eligible() {
        let verdict = is_donor_eligible(&healthy(Gender::Female), now());
        assert!(verdict.eligible);
        assert!(verdict.reason.is_none());
        assert!(verdict.days_until_eligible.is_none());
    }

    #[test]
    fn test_drunk_wins_over_everything() {
        let donor = DonorProfile {
            age: Some(70),
            gender: Some(Gender::Male),
            last_donated_date: Some(now()),
            is_drunk: true,
            is_smoker: true,
        };
        let verdict = is_donor_eligible(&donor, now());
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, Some(IneligibilityReason::Intoxicated));
        assert!(verdict.days_until_eligible.is_none());
    }

    #[test]
    fn test_smoker_wins_over_age_and_cooldown() {
        let donor = DonorProfile {
            age: Some(12),
            last_donated_date: Some(now()),
            is_smoker: true,
            ..Default::default()
        };
        let verdict = is_donor_eligible(&donor, now());
        assert_eq!(verdict.reason, Some(IneligibilityReason::Smoker));
    }

    #[test]
    fn test_age_boundaries() {
        for (age, eligible) in [(17, false), (18, true), (65, true), (66, false)] {
            let donor = DonorProfile {
                age: Some(age),
                ..healthy(Gender::Male)
            };
            assert_eq!(is_donor_eligible(&donor, now()).eligible, eligible, "age {age}");
        }

        let missing = DonorProfile {
            age: None,
            ..healthy(Gender::Male)
        };
        assert_eq!(
            is_donor_eligible(&missing, now()).reason,
            Some(IneligibilityReason::AgeOutOfRange)
        );
    }

    #[test]
    fn test_age_wins_over_cooldown() {
        let donor = DonorProfile {
            age: Some(80),
            ..donated_days_ago(Gender::Male, 1)
        };
        assert_eq!(
            is_donor_eligible(&donor, now()).reason,
            Some(IneligibilityReason::AgeOutOfRange)
        );
    }

    #[test]
    fn test_male_cooldown_boundary() {
        assert!(is_donor_eligible(&donated_days_ago(Gender::Male, 90), now()).eligible);

        let verdict = is_donor_eligible(&donated_days_ago(Gender::Male, 89), now());
        assert!(!verdict.eligible);
        assert_eq!(verdict.days_until_eligible, Some(1));
        assert_eq!(
            verdict.reason,
            Some(IneligibilityReason::Cooldown {
                required_days: 90,
                gender: Some(Gender::Male),
            })
        );
    }

    #[test]
    fn test_female_cooldown_boundary() {
        assert!(is_donor_eligible(&donated_days_ago(Gender::Female, 120), now()).eligible);

        let verdict = is_donor_eligible(&donated_days_ago(Gender::Female, 119), now());
        assert!(!verdict.eligible);
        assert_eq!(verdict.days_until_eligible, Some(1));
    }

    #[test]
    fn test_other_gender_uses_longer_gap() {
        let verdict = is_donor_eligible(&donated_days_ago(Gender::Other, 100), now());
        assert_eq!(verdict.days_until_eligible, Some(20));

        let unspecified = DonorProfile {
            gender: None,
            ..donated_days_ago(Gender::Other, 100)
        };
        assert_eq!(
            is_donor_eligible(&unspecified, now()).days_until_eligible,
            Some(20)
        );
    }

    #[test]
    fn test_partial_day_counts_as_full_day() {
        let donor = DonorProfile {
            last_donated_date: Some(now() - Duration::days(89) - Duration::milliseconds(1)),
            ..healthy(Gender::Male)
        };
        assert!(is_donor_eligible(&donor, now()).eligible);

        let just_donated = DonorProfile {
            last_donated_date: Some(now() - Duration::hours(1)),
            ..healthy(Gender::Male)
        };
        assert_eq!(
            is_donor_eligible(&just_donated, now()).days_until_eligible,
            Some(89)
        );
    }

    #[test]
    fn test_future_donation_date_counts_as_today() {
        let donor = DonorProfile {
            last_donated_date: Some(now() + Duration::days(3)),
            ..healthy(Gender::Male)
        };
        assert_eq!(days_since(now() + Duration::days(3), now()), 0);
        assert_eq!(is_donor_eligible(&donor, now()).days_until_eligible, Some(90));

        // Further out than the gap itself still waits the full gap.
        let far_future = DonorProfile {
            last_donated_date: Some(now() + Duration::days(100)),
            ..healthy(Gender::Male)
        };
        let verdict = is_donor_eligible(&far_future, now());
        assert!(!verdict.eligible);
        assert_eq!(verdict.days_until_eligible, Some(90));
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            IneligibilityReason::Intoxicated.to_string(),
            "Currently under influence of alcohol"
        );
        assert_eq!(
            IneligibilityReason::AgeOutOfRange.to_string(),
            "Age must be between 18 and 65"
        );
        assert_eq!(
            IneligibilityReason::Cooldown {
                required_days: 120,
                gender: Some(Gender::Female),
            }
            .to_string(),
            "Must wait 120 days between donations (Female)"
        );
    }

    #[test]
    fn test_profile_from_loose_record() {
        let profile: DonorProfile =
            serde_json::from_str(r#"{"age": "34", "gender": "MALE", "isSmoker": false}"#)
                .unwrap();
        assert_eq!(profile.age, Some(34));
        assert!(is_donor_eligible(&profile, now()).eligible);

        let profile: DonorProfile = serde_json::from_str(r#"{"age": "old"}"#).unwrap();
        assert_eq!(profile.age, None);
        assert_eq!(
            is_donor_eligible(&profile, now()).reason,
            Some(IneligibilityReason::AgeOutOfRange)
        );

        assert!(serde_json::from_str::<DonorProfile>(r#"{"gender": "ROBOT"}"#).is_err());
    }
}
