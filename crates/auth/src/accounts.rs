//! Signup, login and logout.

use std::sync::Arc;

use blood_store::BloodStore;
use chrono::{DateTime, Utc};
use entities::{BloodType, Gender, User, UserRole};
use tracing::{info, warn};

use crate::{
    hash_password, validate_age, validate_email, validate_name, validate_password,
    verify_password, AuthError, AuthResult, ValidationErrors,
};

/// Signup form input.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email, any case.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Must repeat `password`.
    pub confirm_password: String,
    /// Age in years.
    pub age: u32,
    /// City or area.
    pub location: String,
    /// Blood type, any case.
    pub blood_type: String,
    /// Donor or receiver.
    pub role: UserRole,
    /// Gender.
    pub gender: Gender,
    /// Donors only: previous donation.
    pub last_donated_date: Option<DateTime<Utc>>,
    /// Donors only.
    pub is_drunk: bool,
    /// Donors only.
    pub is_smoker: bool,
}

impl NewUser {
    /// Validates every field, returning the parsed blood type.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<BloodType, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validate_name(&self.name) {
            errors.add("name", "Name must contain only letters and spaces");
        }
        if !validate_email(&self.email.trim().to_lowercase()) {
            errors.add("email", "Invalid email format (must be @gmail.com)");
        }
        if let Err(message) = validate_password(&self.password) {
            errors.add("password", message);
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }
        if !validate_age(self.age) {
            errors.add("age", "Age must be between 18 and 65 years");
        }
        if self.location.trim().is_empty() {
            errors.add("location", "Location is required");
        }
        let blood_type = BloodType::parse(&self.blood_type);
        if blood_type.is_none() {
            errors.add("bloodType", "Please select a valid blood type");
        }

        if self.role == UserRole::Donor {
            if self.is_drunk {
                errors.add("general", "Donors who are currently drunk cannot register");
            }
            if self.is_smoker {
                errors.add("general", "Smokers cannot register as blood donors");
            }
            if self.last_donated_date.is_some_and(|d| d > now) {
                errors.add("lastDonatedDate", "Last donation date cannot be in the future");
            }
        }

        match blood_type {
            Some(blood_type) if errors.is_empty() => Ok(blood_type),
            _ => Err(errors),
        }
    }
}

/// Manages accounts and the logged-in session.
pub struct AccountService<S> {
    store: Arc<S>,
}

impl<S> Clone for AccountService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BloodStore> AccountService<S> {
    /// Creates a new account service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Registers a new user and logs them in.
    pub async fn signup(&self, new: NewUser) -> AuthResult<User> {
        self.signup_at(new, Utc::now()).await
    }

    /// Registers a new user as of `now` and logs them in.
    pub async fn signup_at(&self, new: NewUser, now: DateTime<Utc>) -> AuthResult<User> {
        let blood_type = new.validate(now).map_err(AuthError::Validation)?;

        let mut snapshot = self.store.snapshot().await?;
        if snapshot.user_by_email(&new.email).is_some() {
            warn!("Signup rejected, email already registered");
            return Err(AuthError::EmailTaken);
        }

        let mut user = User::new(
            new.name.trim(),
            &new.email,
            new.role,
            blood_type,
            new.age,
            new.location.trim(),
        )
        .with_gender(new.gender)
        .with_password_hash(hash_password(&new.password));
        user.created_at = now;
        if new.role == UserRole::Donor {
            user.last_donated_date = new.last_donated_date;
            user.is_drunk = new.is_drunk;
            user.is_smoker = new.is_smoker;
        }

        snapshot.users.push(user.clone());
        snapshot.current_user = Some(user.clone());
        self.store.commit(snapshot).await?;

        info!(
            user_id = %user.id,
            role = user.role.as_str(),
            blood_type = %user.blood_type,
            "User registered"
        );
        Ok(user)
    }

    /// Logs in with an email (any case) and password.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let snapshot = self.store.snapshot().await?;
        let user = snapshot
            .user_by_email(email)
            .filter(|u| verify_password(password, &u.password_hash))
            .cloned()
            .ok_or_else(|| {
                warn!("Login failed");
                AuthError::InvalidCredentials
            })?;

        self.store.save_current_user(Some(&user)).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Ends the session.
    pub async fn logout(&self) -> AuthResult<()> {
        self.store.save_current_user(None).await?;
        info!("User logged out");
        Ok(())
    }

    /// The logged-in user, read fresh from the users collection.
    ///
    /// A session whose user no longer exists counts as logged out.
    pub async fn current_user(&self) -> AuthResult<Option<User>> {
        let snapshot = self.store.snapshot().await?;
        Ok(snapshot
            .current_user
            .as_ref()
            .and_then(|session| snapshot.user(session.id))
            .cloned())
    }
}
