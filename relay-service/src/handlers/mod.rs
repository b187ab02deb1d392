//! HTTP handlers.

pub mod generate;
pub mod health;

pub use generate::generate_response;
pub use health::{health_check, readiness_check};
