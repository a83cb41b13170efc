//! Shared types: currency, project status, roles.
//! Use chrono date types for timestamps and dates, not raw strings.

pub mod currency;
pub mod status;

pub use currency::Currency;
pub use status::{ProjectStatus, Role};
