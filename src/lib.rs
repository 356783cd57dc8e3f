//! This crate validates cryptographically attested poll submissions.
//! A polltaker signs the poll as EIP-712 typed data; the validator checks the
//! poll's structure, dates, options and qualifying events, then confirms that
//! the signature recovers to the claimed account.

pub mod types; // Poll submissions, event records and validation results.
pub mod validation; // The ordered validation pipeline and its stages.
pub mod state; // The shared catalog of allow-listed events.
pub mod api; // HTTP endpoints wrapping the validator.
pub mod config; // Defines and loads service configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use validation::PollValidator;
