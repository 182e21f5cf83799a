//! AgentVerify Platform Bridge
//!
//! Treats the external social platform as an opaque capability: fetch a
//! profile by username, fetch recent posts by username. Response shapes are
//! normalized once at this boundary; everything past it works with explicit
//! types.

pub mod client;
pub mod error;
pub mod schema;

pub use client::{HttpPlatformClient, PlatformClient};
pub use error::PlatformError;
pub use schema::{PlatformPost, PlatformProfile};
