//! HTTP request handlers for web adapter.

use axum::{
    Form,
    extract::{RawQuery, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::Local;
use std::sync::{Arc, MutexGuard};

use crate::adapters::chart_svg;
use crate::adapters::csv_export::{self, CSV_MEDIA_TYPE, EXPORT_FILE_NAME};
use crate::domain::filter::TradeFilter;
use crate::domain::metrics;
use crate::domain::trade::{Trade, TradeForm};

use super::templates::{DashboardTemplate, respond};
use super::{AppState, DashboardSession, WebError, is_htmx_request};

const SVG_MEDIA_TYPE: &str = "image/svg+xml";

fn lock_session(state: &AppState) -> Result<MutexGuard<'_, DashboardSession>, WebError> {
    state
        .session
        .lock()
        .map_err(|_| WebError::internal("dashboard session is unavailable"))
}

fn snapshot(state: &AppState) -> Result<Vec<Trade>, WebError> {
    Ok(lock_session(state)?.trades().to_vec())
}

fn parse_filter(query: Option<&str>) -> Result<TradeFilter, WebError> {
    let Some(query) = query else {
        return Ok(TradeFilter::default());
    };
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let filter = TradeFilter::from_params(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    Ok(filter)
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let filter = parse_filter(query.as_deref())?;
    let trades = snapshot(&state)?;
    let template = DashboardTemplate::build(&trades, &filter, state.chart_size, None);
    respond(&template, "Dashboard", is_htmx_request(&headers))
}

pub async fn add_trade(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<TradeForm>,
) -> Result<Response, WebError> {
    let today = Local::now().date_naive();
    let trades = {
        let mut session = lock_session(&state)?;
        let trade = session.record(form, today)?;
        tracing::info!(symbol = %trade.symbol, pnl = trade.pnl, "trade recorded");
        session.trades().to_vec()
    };

    let template = DashboardTemplate::build(
        &trades,
        &TradeFilter::default(),
        state.chart_size,
        Some("Trade added successfully!"),
    );
    respond(&template, "Dashboard", is_htmx_request(&headers))
}

pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let filter = parse_filter(query.as_deref())?;
    let visible = filter.apply(&snapshot(&state)?);
    let body = csv_export::to_csv_string(&visible)?;
    tracing::debug!(rows = visible.len(), "csv export");

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{EXPORT_FILE_NAME}\""))
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(CSV_MEDIA_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn daily_pnl_chart(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let filter = parse_filter(query.as_deref())?;
    let visible = filter.apply(&snapshot(&state)?);
    let svg = chart_svg::daily_pnl_svg(&metrics::daily_pnl(&visible), state.chart_size);
    Ok(svg_response(svg))
}

pub async fn strategy_pnl_chart(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, WebError> {
    let filter = parse_filter(query.as_deref())?;
    let visible = filter.apply(&snapshot(&state)?);
    let svg = chart_svg::strategy_pie_svg(&metrics::strategy_pnl(&visible), state.chart_size);
    Ok(svg_response(svg))
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}

fn svg_response(svg: String) -> Response {
    ([(header::CONTENT_TYPE, SVG_MEDIA_TYPE)], svg).into_response()
}
