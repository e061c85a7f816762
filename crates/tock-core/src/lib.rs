//! # tock-core
//!
//! Core types shared across all tock crates.
//!
//! - Entity structs for tasks, timesheets and report rows
//! - The tri-state run status published by the status monitor
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
