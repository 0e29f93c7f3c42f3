//! Core entity definitions for the blood bank.
//!
//! This crate defines the records shared by every other crate in the
//! workspace: users (donors and receivers), blood requests, donations and the
//! ABO/Rh blood type they are all keyed on.

mod blood;
mod donation;
mod request;
mod user;

pub use blood::*;
pub use donation::*;
pub use request::*;
pub use user::*;
