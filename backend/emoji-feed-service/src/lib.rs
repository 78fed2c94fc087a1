/// Emoji Feed Service Library
///
/// Emoji-only posts for the Nova social platform: create, delete, the global
/// and per-author feeds, and top-ten rankings over the most recent posts.
/// Users are owned by the external identity provider and resolved per request.
///
/// # Modules
///
/// - `handlers`: HTTP handlers, one per RPC procedure
/// - `models`: Posts, authors and ranking shapes
/// - `services`: Feed assembly, rankings and post lifecycle
/// - `db`: Post store trait and its PostgreSQL implementation
/// - `directory`: Identity directory trait and its HTTP adapter
/// - `auth` / `middleware`: Bearer token verification and the actor extractor
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod auth;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
