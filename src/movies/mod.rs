//! Movie records: shape, validation and storage.
//!
//! # Data Flow
//! ```text
//! JSON payload
//!     → schema.rs (constraint table → MovieDraft / MoviePatch or ShapeError)
//!     → store.rs (append / overlay + replace / remove)
//!     → Movie (serialized back to the client)
//!
//! Startup:
//!     seed file → seed.rs (full validation per record) → MovieStore
//! ```
//!
//! # Design Decisions
//! - The store is a plain value; the HTTP layer owns it and decides how it is shared
//! - Ids are assigned here, never taken from a create or update payload
//! - Every write goes through the validator, seed records included

pub mod model;
pub mod schema;
pub mod seed;
pub mod store;

pub use model::{Genre, Movie, MovieDraft, MovieId, MoviePatch};
pub use schema::{MovieSchema, ShapeError};
pub use seed::{load_seed, SeedError};
pub use store::{MovieStore, StoreError};
