//! Human-readable procedure markup.
//!
//! A small heading-and-property format for procedure documents:
//!
//! ```text
//! # Onboard Customer
//!
//! - Version: 1.0
//!
//! ## Description
//!
//! Brings a new customer into the system.
//!
//! ## Trigger
//!
//! - Type: webhook
//!   - path: onboard
//!
//! ## Steps
//!
//! ### 1. Create Account
//! - ID: create
//! - Type: action
//! - Action: http_request
//! - Parameters:
//!   - url: https://crm.example.com/accounts
//! - Next: notify
//! ```
//!
//! Parsing never fails. Serialization is deterministic, and parsing what it writes
//! yields the same document.

mod parser;
mod serializer;
mod value;

pub use parser::parse_markup;
pub use serializer::{DisplayMarkup, serialize_to_markup};
