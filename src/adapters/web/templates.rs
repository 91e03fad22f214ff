//! HTML templates using Askama.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::adapters::chart_svg::{self, ChartSize};
use crate::adapters::table::{self, COLUMNS};
use crate::domain::filter::TradeFilter;
use crate::domain::metrics::{self, Metrics};
use crate::domain::trade::{Direction, MarketType, StrategyTag, Trade};

use super::WebError;

pub struct SummaryItem {
    pub label: &'static str,
    pub value: String,
}

pub struct FilterOption {
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub flash: Option<&'a str>,
    pub summary: Vec<SummaryItem>,
    pub columns: &'a [&'a str],
    pub rows: Vec<Vec<String>>,
    pub session_total: usize,
    pub directions: Vec<&'static str>,
    pub strategy_options: Vec<FilterOption>,
    pub market_options: Vec<FilterOption>,
    pub export_href: String,
    pub daily_svg: String,
    pub strategy_svg: String,
}

impl<'a> DashboardTemplate<'a> {
    /// Builds the dashboard view of `trades` restricted by `filter`.
    pub fn build(
        trades: &[Trade],
        filter: &TradeFilter,
        chart_size: ChartSize,
        flash: Option<&'a str>,
    ) -> Self {
        let visible = filter.apply(trades);
        let m = Metrics::compute(&visible);

        let summary = vec![
            SummaryItem {
                label: "Trades",
                value: m.total_trades.to_string(),
            },
            SummaryItem {
                label: "Win Rate",
                value: format!("{:.2}%", m.win_rate),
            },
            SummaryItem {
                label: "Total P&L",
                value: format!("{:.2}", m.total_pnl),
            },
            SummaryItem {
                label: "Average P&L",
                value: format!("{:.2}", m.avg_pnl),
            },
            SummaryItem {
                label: "Profit Factor",
                value: m.profit_factor_display(),
            },
            SummaryItem {
                label: "Reward/Risk",
                value: format!("{:.2}", m.reward_risk),
            },
        ];

        let query = filter.query_string();
        let export_href = if query.is_empty() {
            "/export.csv".to_string()
        } else {
            format!("/export.csv?{query}")
        };

        Self {
            flash,
            summary,
            columns: &COLUMNS,
            rows: visible.iter().map(table::row).collect(),
            session_total: trades.len(),
            directions: Direction::ALL.iter().map(|d| d.as_str()).collect(),
            strategy_options: StrategyTag::ALL
                .iter()
                .map(|s| FilterOption {
                    value: s.as_str(),
                    selected: filter.strategies.contains(s),
                })
                .collect(),
            market_options: MarketType::ALL
                .iter()
                .map(|mk| FilterOption {
                    value: mk.as_str(),
                    selected: filter.markets.contains(mk),
                })
                .collect(),
            export_href,
            daily_svg: chart_svg::daily_pnl_svg(&metrics::daily_pnl(&visible), chart_size),
            strategy_svg: chart_svg::strategy_pie_svg(&metrics::strategy_pnl(&visible), chart_size),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Renders `template` as a bare fragment for HTMX requests, otherwise
/// wrapped in the full page layout.
pub fn respond<T: Template>(template: &T, title: &str, htmx: bool) -> Result<Response, WebError> {
    let content = template.render()?;
    if htmx {
        return Ok(Html(content).into_response());
    }
    let page = BasePage {
        title,
        content: &content,
    };
    Ok(Html(page.render()?).into_response())
}
