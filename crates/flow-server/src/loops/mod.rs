//! Background loops.

pub mod lifecycle_loop;

pub use lifecycle_loop::{advance_lifecycle, run_lifecycle_loop};
