//! A small poll site: list questions, show one with its choices, take votes and show
//! the tallies.
//!
//! Pages are plain HTML served by axum. Storage sits behind [`store::PollStore`], backed
//! by PostgreSQL through sqlx or, when no database is configured, by an in-memory store.

#[macro_use]
extern crate tracing;

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod polls;
pub mod routes;
pub mod startup;
pub mod store;
pub mod templates;

pub use config::Config;
pub use startup::{AppState, build_router};
