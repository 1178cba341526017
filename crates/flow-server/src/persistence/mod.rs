//! Persistence layer for the flow measure service.
//!
//! SQLite-backed storage for regions, events, users, and flow measures.

pub mod db;
pub mod events;
pub mod firs;
pub mod measures;
pub mod users;

pub use db::{init_database, Database};
