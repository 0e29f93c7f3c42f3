//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::BloodType;

/// Role chosen at signup. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Gives blood against open requests.
    Donor,
    /// Posts blood requests.
    Receiver,
}

impl UserRole {
    /// Converts the role to a string for display and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "DONOR",
            Self::Receiver => "RECEIVER",
        }
    }

    /// Parses a role from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DONOR" => Some(Self::Donor),
            "RECEIVER" => Some(Self::Receiver),
            _ => None,
        }
    }
}

/// Gender as declared at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    /// Male.
    #[default]
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

impl Gender {
    /// Converts the gender to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Parses a gender from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A registered donor or receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address, always lowercase.
    pub email: String,
    /// Salted password hash.
    pub password_hash: String,
    /// Age in years.
    pub age: u32,
    /// Free-text city or area, matched against request hospital areas.
    pub location: String,
    /// Blood type.
    pub blood_type: BloodType,
    /// Donor or receiver.
    pub role: UserRole,
    /// Gender, which decides the donation cooldown.
    pub gender: Gender,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When the donor last gave blood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_donated_date: Option<DateTime<Utc>>,
    /// Donor declared being under the influence of alcohol.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_drunk: bool,
    /// Donor declared being a smoker.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_smoker: bool,
}

impl User {
    /// Creates a new user. The email is normalized to lowercase.
    pub fn new(
        name: impl Into<String>,
        email: impl AsRef<str>,
        role: UserRole,
        blood_type: BloodType,
        age: u32,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.as_ref().trim().to_lowercase(),
            password_hash: String::new(),
            age,
            location: location.into(),
            blood_type,
            role,
            gender: Gender::default(),
            created_at: Utc::now(),
            last_donated_date: None,
            is_drunk: false,
            is_smoker: false,
        }
    }

    /// Sets the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Sets the stored password hash.
    pub fn with_password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    /// Sets the last donation date.
    pub fn with_last_donated_date(mut self, date: DateTime<Utc>) -> Self {
        self.last_donated_date = Some(date);
        self
    }

    /// Sets the lifestyle flags.
    pub fn with_lifestyle(mut self, is_drunk: bool, is_smoker: bool) -> Self {
        self.is_drunk = is_drunk;
        self.is_smoker = is_smoker;
        self
    }

    /// Whether this user registered as a donor.
    pub fn is_donor(&self) -> bool {
        self.role == UserRole::Donor
    }

    /// Whether this user registered as a receiver.
    pub fn is_receiver(&self) -> bool {
        self.role == UserRole::Receiver
    }
}
