//! CLI commands for genpatch
//!
//! - **regen**: re-export the securelevel commit range and reconcile the
//!   series manifest

pub mod regen;

pub use regen::run_regen;
