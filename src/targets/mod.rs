//! Target Groups
//!
//! The value types exchanged with Prometheus HTTP service discovery: a group
//! of scrape addresses sharing one label set.

pub mod group;

pub use group::*;
