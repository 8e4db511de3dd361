//! Common utilities for the wallaby markup engine.
//!
//! This crate provides shared infrastructure used by the parsing crates:
//! - **Warning System** - deduplicated colored terminal output for
//!   recoverable anomalies
//! - **URL resolution** - base-URI handling for relative URLs

pub mod url;
pub mod warning;
