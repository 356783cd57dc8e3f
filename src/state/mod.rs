//! State Management Module
//!
//! This module holds the in-memory catalog of allow-listed events that poll
//! submissions are checked against.

mod catalog;
pub use catalog::EventCatalog;
