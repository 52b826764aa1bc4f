//! API Module
//!
//! HTTP surface of the service: the Prometheus HTTP SD endpoint, target
//! management routes and bearer authentication.

pub mod auth;
pub mod server;
pub mod rest;

pub use auth::*;
pub use server::*;
pub use rest::*;
