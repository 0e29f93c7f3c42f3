//! Accounts for the blood bank.
//!
//! This crate provides:
//! - Signup field validation
//! - Salted password hashing
//! - Signup, login and logout against a [`blood_store::BloodStore`]

mod accounts;
mod error;
mod password;
mod validation;

pub use accounts::*;
pub use error::*;
pub use password::*;
pub use validation::*;
