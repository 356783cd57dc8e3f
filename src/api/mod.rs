//! API Module
//!
//! This module exposes the HTTP endpoints clients use to submit polls and
//! to manage the allow-listed event catalog.

mod server;
pub use server::Server;
