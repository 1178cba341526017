//! Flow CLI - command line tools for the flow measure system.
//!
//! Binaries:
//! - preview_message: render the Discord embed for a measure locally
//! - post_measure: submit a flow measure draft to a running server

pub mod client;
pub mod sample;
