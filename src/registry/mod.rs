//! Target Registry Module
//!
//! In-memory, deduplicated, insertion-ordered registry of target groups with
//! change events for interested subscribers.

pub mod target_registry;
pub mod events;

pub use target_registry::*;
pub use events::*;
