//! Storage for the blood bank.
//!
//! This crate provides a storage abstraction over the three collections the
//! application keeps (`users`, `bloodRequests`, `donations`) plus the
//! `currentUser` session entry. It ships an in-memory backend for tests and a
//! JSON document backend for the command line app.

mod error;
mod file;
mod memory;
mod traits;

pub use error::*;
pub use file::*;
pub use memory::*;
pub use traits::*;
