//! Summary statistics over a trade sequence.
//!
//! Every ratio here has a defined value for a zero denominator: win rate and
//! reward/risk fall back to 0, profit factor to `f64::INFINITY`.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::trade::Trade;

/// Group key for trades recorded without a strategy tag.
pub const UNTAGGED: &str = "Untagged";

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    /// Percentage in `[0, 100]`.
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
    pub profit_factor: f64,
    pub reward_risk: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl Metrics {
    pub fn compute(trades: &[Trade]) -> Self {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades {
            let pnl = trade.pnl;
            if trade.is_win() {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            }
        }

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };

        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        Metrics {
            total_trades: trades.len(),
            trades_won,
            trades_lost,
            win_rate: win_rate(trades),
            total_pnl: total_profit(trades),
            avg_pnl: average_pnl(trades),
            profit_factor: profit_factor(trades),
            reward_risk: reward_risk(trades),
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
        }
    }

    /// Profit factor for display; infinity renders as a symbol rather than `inf`.
    pub fn profit_factor_display(&self) -> String {
        if self.profit_factor.is_infinite() {
            "∞".to_string()
        } else {
            format!("{:.2}", self.profit_factor)
        }
    }
}

/// Share of winning trades in percent. A trade with zero P&L counts as a loss.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let wins = trades.iter().filter(|t| t.is_win()).count();
    let losses = trades.len() - wins;
    let total = wins + losses;
    if total > 0 {
        wins as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

pub fn total_profit(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.pnl).sum()
}

pub fn average_pnl(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        0.0
    } else {
        total_profit(trades) / trades.len() as f64
    }
}

/// Gross profit over gross loss; `f64::INFINITY` when nothing lost money.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_profit: f64 = trades.iter().map(|t| t.pnl).filter(|p| *p > 0.0).sum();
    let gross_loss: f64 = trades
        .iter()
        .map(|t| t.pnl)
        .filter(|p| *p < 0.0)
        .sum::<f64>()
        .abs();

    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else {
        f64::INFINITY
    }
}

/// Mean P&L over the absolute mean stop-loss of the trades that carry one.
pub fn reward_risk(trades: &[Trade]) -> f64 {
    let stops: Vec<f64> = trades.iter().filter_map(|t| t.stop_loss).collect();
    if stops.is_empty() {
        return 0.0;
    }

    let mean_stop = (stops.iter().sum::<f64>() / stops.len() as f64).abs();
    if mean_stop > 0.0 {
        average_pnl(trades) / mean_stop
    } else {
        0.0
    }
}

pub fn daily_pnl(trades: &[Trade]) -> BTreeMap<NaiveDate, f64> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for trade in trades {
        *by_date.entry(trade.date).or_default() += trade.pnl;
    }
    by_date
}

pub fn strategy_pnl(trades: &[Trade]) -> BTreeMap<String, f64> {
    let mut by_strategy: BTreeMap<String, f64> = BTreeMap::new();
    for trade in trades {
        let key = trade
            .strategy
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| UNTAGGED.to_string());
        *by_strategy.entry(key).or_default() += trade.pnl;
    }
    by_strategy
}
