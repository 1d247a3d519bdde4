//! Gym Admin API
//!
//! Administrative backend for a gym: coaches, members, membership types,
//! membership cards, appointments, contracts, activity logs and system settings.
//!
//! Every list endpoint shares one query contract (`skip`/`limit` plus
//! per-entity filter keys) implemented in [`query`], and every response is
//! wrapped in the same [`models::Envelope`]. The [`client`] module mirrors the
//! contract from the consumer side.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod query;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod uploads;

pub use config::Settings;
pub use error::{ApiResult, AppError};
pub use routes::create_router;
pub use state::{AppState, SharedState};
