//! NetConfig: switch configuration generator service.
//!
//! `generator` is the pure validate/render pipeline; the remaining modules
//! are the HTTP service around it (auth, history store, routes).

pub mod auth;
pub mod config;
pub mod db;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod router;

use config::Config;
use db::Store;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub config: Config,
}
