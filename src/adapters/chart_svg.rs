//! SVG chart rendering for the dashboard.
//!
//! Both charts render a small "No data" placeholder instead of an empty plot.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt::Write;

use chrono::NaiveDate;

const PADDING: f64 = 40.0;
const POSITIVE_FILL: &str = "#2e7d32";
const NEGATIVE_FILL: &str = "#c62828";
const PALETTE: [&str; 6] = [
    "#1565c0", "#ef6c00", "#6a1b9a", "#00838f", "#ad1457", "#9e9d24",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
        }
    }
}

pub fn no_data_svg(size: ChartSize, title: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" class="no-data"><text x="{cx:.1}" y="20" text-anchor="middle" font-size="14">{title}</text><text x="{cx:.1}" y="{cy:.1}" text-anchor="middle" font-size="16" fill="#757575">No data</text></svg>"##,
        w = size.width,
        h = size.height,
        cx = size.width / 2.0,
        cy = size.height / 2.0,
        title = escape(title),
    )
}

/// Bar chart of summed P&L per calendar date, with a zero baseline.
pub fn daily_pnl_svg(daily: &BTreeMap<NaiveDate, f64>, size: ChartSize) -> String {
    const TITLE: &str = "Daily P&L";
    if daily.is_empty() {
        return no_data_svg(size, TITLE);
    }

    let plot_width = size.width - 2.0 * PADDING;
    let plot_height = size.height - 2.0 * PADDING;

    let hi = daily.values().copied().fold(0.0_f64, f64::max);
    let lo = daily.values().copied().fold(0.0_f64, f64::min);
    let range = hi - lo;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let y_of = |v: f64| size.height - PADDING - (v - lo) * scale_y;

    let slot = plot_width / daily.len() as f64;
    let bar_width = slot * 0.8;
    let baseline = y_of(0.0);

    let mut svg = svg_open(size, TITLE);
    for (i, (date, pnl)) in daily.iter().enumerate() {
        let x = PADDING + i as f64 * slot + (slot - bar_width) / 2.0;
        let top = y_of(pnl.max(0.0));
        let height = (y_of(pnl.min(0.0)) - top).max(0.0);
        let fill = if *pnl >= 0.0 { POSITIVE_FILL } else { NEGATIVE_FILL };
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{top:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{fill}"><title>{date}: {pnl:.2}</title></rect>"#,
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10">{}</text>"#,
            x + bar_width / 2.0,
            size.height - PADDING / 2.0,
            date.format("%m-%d"),
        );
    }
    let _ = write!(
        svg,
        r##"<line x1="{PADDING:.1}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="#424242" stroke-width="1"/>"##,
        size.width - PADDING,
    );
    svg.push_str("</svg>");
    svg
}

/// Pie chart of P&L share per strategy. Groups whose summed P&L is not
/// positive have no meaningful share and are left out.
pub fn strategy_pie_svg(by_strategy: &BTreeMap<String, f64>, size: ChartSize) -> String {
    const TITLE: &str = "P&L by Strategy";
    let slices: Vec<(&str, f64)> = by_strategy
        .iter()
        .filter(|(_, v)| **v > 0.0)
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    if slices.is_empty() {
        return no_data_svg(size, TITLE);
    }

    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    let radius = (size.height - 2.0 * PADDING).min(size.width / 2.0 - PADDING) / 2.0 + PADDING / 2.0;
    let cx = PADDING + radius;
    let cy = size.height / 2.0 + 10.0;
    let legend_x = cx + radius + 20.0;

    let mut svg = svg_open(size, TITLE);
    let mut angle = -PI / 2.0;
    for (i, (name, value)) in slices.iter().enumerate() {
        let share = value / total;
        let color = PALETTE[i % PALETTE.len()];

        if slices.len() == 1 {
            let _ = write!(
                svg,
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}"/>"#
            );
        } else {
            let sweep = share * 2.0 * PI;
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };
            let _ = write!(
                svg,
                r#"<path d="M {cx:.1} {cy:.1} L {x1:.2} {y1:.2} A {radius:.1} {radius:.1} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{color}"/>"#
            );
            angle = end;
        }

        let legend_y = PADDING + 10.0 + i as f64 * 18.0;
        let _ = write!(
            svg,
            r#"<rect x="{legend_x:.1}" y="{:.1}" width="10" height="10" fill="{color}"/><text x="{:.1}" y="{legend_y:.1}" font-size="12">{} ({:.1}%)</text>"#,
            legend_y - 9.0,
            legend_x + 16.0,
            escape(name),
            share * 100.0,
        );
    }
    svg.push_str("</svg>");
    svg
}

fn svg_open(size: ChartSize, title: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}"><text x="{cx:.1}" y="20" text-anchor="middle" font-size="14">{title}</text>"#,
        w = size.width,
        h = size.height,
        cx = size.width / 2.0,
        title = escape(title),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn empty_daily_chart_shows_no_data() {
        let svg = daily_pnl_svg(&BTreeMap::new(), ChartSize::default());
        assert!(svg.contains("No data"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn daily_chart_has_one_bar_per_date() {
        let daily = BTreeMap::from([(date(1), 6.0), (date(2), -4.0), (date(3), 10.0)]);
        let svg = daily_pnl_svg(&daily, ChartSize::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains(NEGATIVE_FILL));
        assert!(svg.contains("2024-01-01: 6.00"));
    }

    #[test]
    fn title_is_escaped() {
        let svg = daily_pnl_svg(&BTreeMap::new(), ChartSize::default());
        assert!(svg.contains("Daily P&amp;L"));
    }

    #[test]
    fn chart_uses_configured_size() {
        let size = ChartSize {
            width: 800.0,
            height: 400.0,
        };
        let svg = daily_pnl_svg(&BTreeMap::from([(date(1), 1.0)]), size);
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"400\""));
    }

    #[test]
    fn pie_has_slice_per_positive_strategy() {
        let grouped = BTreeMap::from([
            ("Breakout".to_string(), 30.0),
            ("Swing".to_string(), 10.0),
            ("Scalping".to_string(), -5.0),
        ]);
        let svg = strategy_pie_svg(&grouped, ChartSize::default());
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Breakout (75.0%)"));
        assert!(svg.contains("Swing (25.0%)"));
        assert!(!svg.contains("Scalping"));
    }

    #[test]
    fn single_slice_pie_is_full_circle() {
        let grouped = BTreeMap::from([("Breakout".to_string(), 30.0)]);
        let svg = strategy_pie_svg(&grouped, ChartSize::default());
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Breakout (100.0%)"));
    }

    #[test]
    fn pie_without_positive_groups_shows_no_data() {
        let grouped = BTreeMap::from([("Swing".to_string(), -3.0)]);
        let svg = strategy_pie_svg(&grouped, ChartSize::default());
        assert!(svg.contains("No data"));
    }
}
