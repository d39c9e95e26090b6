//! Web server adapter.
//!
//! Serves the decision series for the configured symbol as JSON, plus a static
//! page that renders it.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::domain::config::SignalSettings;
use crate::domain::system::TradingSystem;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub system: Arc<TradingSystem>,
    pub settings: SignalSettings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/data", get(handlers::data))
        .route("/symbols", get(handlers::symbols))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}
