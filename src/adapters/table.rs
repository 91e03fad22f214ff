//! Column layout shared by the dashboard table and the CSV export.

use crate::domain::trade::Trade;

pub const COLUMNS: [&str; 12] = [
    "Date",
    "Symbol",
    "Direction",
    "Market",
    "Strategy",
    "Qty",
    "Entry Price",
    "Exit Price",
    "Stop Loss",
    "P&L",
    "P&L %",
    "Notes",
];

/// Display cells for one trade, in `COLUMNS` order.
pub fn row(trade: &Trade) -> Vec<String> {
    vec![
        trade.date.format("%Y-%m-%d").to_string(),
        trade.symbol.clone(),
        trade.direction.to_string(),
        trade.market.map(|m| m.to_string()).unwrap_or_default(),
        trade.strategy.map(|s| s.to_string()).unwrap_or_default(),
        trade.qty.to_string(),
        format!("{:.2}", trade.price),
        trade.exit_price.map(|p| format!("{p:.2}")).unwrap_or_default(),
        trade.stop_loss.map(|p| format!("{p:.2}")).unwrap_or_default(),
        format!("{:.2}", trade.pnl),
        format!("{:.2}", trade.pnl_pct()),
        trade.notes.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{Direction, MarketType, StrategyTag};
    use chrono::NaiveDate;

    #[test]
    fn row_matches_column_count_and_order() {
        let trade = Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            symbol: "ETH".into(),
            direction: Direction::Sell,
            qty: 3,
            price: 2000.0,
            pnl: 150.0,
            notes: "fade".into(),
            market: Some(MarketType::Crypto),
            exit_price: Some(2050.0),
            stop_loss: None,
            strategy: Some(StrategyTag::Scalping),
        };
        let cells = row(&trade);
        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], "2024-01-02");
        assert_eq!(cells[2], "SELL");
        assert_eq!(cells[3], "Crypto");
        assert_eq!(cells[4], "Scalping");
        assert_eq!(cells[7], "2050.00");
        assert_eq!(cells[8], "");
        assert_eq!(cells[10], "2.50");
        assert_eq!(cells[11], "fade");
    }
}
