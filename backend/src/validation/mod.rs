//! Input validation for request payloads.
//!
//! Payload structs derive [`Validate`] and plug in the shared rules
//! from [`rules`], so every endpoint reports the same messages.

pub mod rules;

pub use validator::Validate;
