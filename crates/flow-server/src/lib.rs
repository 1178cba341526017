//! Shared library surface for the flow measure server and its tests.

pub mod api;
pub mod config;
pub mod loops;
pub mod notifier;
pub mod persistence;
pub mod state;
