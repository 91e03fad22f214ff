//! Web dashboard adapter.
//!
//! Axum server with an HTMX-enhanced page for entering trades into an
//! in-memory session, filtering them, exporting CSV and viewing charts.

mod error;
mod handlers;
mod session;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use session::DashboardSession;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

use crate::adapters::chart_svg::ChartSize;

pub struct AppState {
    pub session: Mutex<DashboardSession>,
    pub chart_size: ChartSize,
}

impl AppState {
    pub fn new(session: DashboardSession, chart_size: ChartSize) -> Self {
        Self {
            session: Mutex::new(session),
            chart_size,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/trades", post(handlers::add_trade))
        .route("/export.csv", get(handlers::export_csv))
        .route("/charts/daily-pnl.svg", get(handlers::daily_pnl_chart))
        .route("/charts/strategy-pnl.svg", get(handlers::strategy_pnl_chart))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
