//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → origin.rs origin_gate (reject Origin outside the allow-list, 403)
//!     → origin.rs CorsLayer (preflight + Access-Control-* headers)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unknown or unreadable Origin is rejected
//! - No Origin header means same-origin or non-browser client: allowed
//! - The allow-list is fixed at startup

pub mod origin;

pub use origin::{origin_gate, OriginPolicy};
