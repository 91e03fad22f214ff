//! Trade record and the parser that builds one from user input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::JournalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "BUY", alias = "buy", alias = "Buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell", alias = "Sell")]
    Sell,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Buy, Direction::Sell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "LONG" => Ok(Direction::Buy),
            "SELL" | "SHORT" => Ok(Direction::Sell),
            other => Err(JournalError::invalid(
                "direction",
                format!("expected BUY or SELL, got '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketType {
    Equity,
    Options,
    Futures,
    Forex,
    Crypto,
}

impl MarketType {
    pub const ALL: [MarketType; 5] = [
        MarketType::Equity,
        MarketType::Options,
        MarketType::Futures,
        MarketType::Forex,
        MarketType::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Equity => "Equity",
            MarketType::Options => "Options",
            MarketType::Futures => "Futures",
            MarketType::Forex => "Forex",
            MarketType::Crypto => "Crypto",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MarketType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| JournalError::invalid("market", format!("unknown market type '{wanted}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyTag {
    Breakout,
    Swing,
    Scalping,
    Momentum,
    #[serde(rename = "Mean Reversion")]
    MeanReversion,
    Other,
}

impl StrategyTag {
    pub const ALL: [StrategyTag; 6] = [
        StrategyTag::Breakout,
        StrategyTag::Swing,
        StrategyTag::Scalping,
        StrategyTag::Momentum,
        StrategyTag::MeanReversion,
        StrategyTag::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyTag::Breakout => "Breakout",
            StrategyTag::Swing => "Swing",
            StrategyTag::Scalping => "Scalping",
            StrategyTag::Momentum => "Momentum",
            StrategyTag::MeanReversion => "Mean Reversion",
            StrategyTag::Other => "Other",
        }
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyTag {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| !c.is_whitespace() && *c != '_').collect();
        StrategyTag::ALL
            .into_iter()
            .find(|t| t.as_str().replace(' ', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| JournalError::invalid("strategy", format!("unknown strategy '{}'", s.trim())))
    }
}

/// A single closed trade as recorded in the journal.
///
/// Field order matches the on-disk JSON layout; the optional fields are
/// skipped when absent so console-only journals keep seven keys per trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub symbol: String,
    pub direction: Direction,
    pub qty: u32,
    pub price: f64,
    pub pnl: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyTag>,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    /// False when any numeric field is NaN or infinite. Such a trade cannot
    /// be written to the journal file and read back.
    pub fn has_finite_values(&self) -> bool {
        [Some(self.price), Some(self.pnl), self.exit_price, self.stop_loss]
            .into_iter()
            .flatten()
            .all(f64::is_finite)
    }

    /// Return on the entry price in percent; zero when the entry cost is zero.
    pub fn pnl_pct(&self) -> f64 {
        match self.exit_price {
            Some(exit) if self.price > 0.0 => (exit - self.price) / self.price * 100.0,
            Some(_) => 0.0,
            None => {
                let cost = self.price * self.qty as f64;
                if cost > 0.0 { self.pnl / cost * 100.0 } else { 0.0 }
            }
        }
    }
}

/// Realized P&L from entry and exit prices: `(exit - entry) * qty`.
pub fn derive_pnl(entry: f64, exit: f64, qty: u32) -> f64 {
    (exit - entry) * qty as f64
}

/// Raw field values as typed by the user, before validation.
///
/// Both front ends fill one of these; blank strings mean "not given".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TradeForm {
    pub date: String,
    pub symbol: String,
    pub direction: String,
    pub market: String,
    pub qty: String,
    pub price: String,
    pub exit_price: String,
    pub pnl: String,
    pub stop_loss: String,
    pub strategy: String,
    pub notes: String,
}

impl TradeForm {
    pub fn into_trade(self, today: NaiveDate) -> Result<Trade, JournalError> {
        let date = match self.date.trim() {
            "" => today,
            s => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| JournalError::invalid("date", format!("'{s}' is not a YYYY-MM-DD date")))?,
        };

        let symbol = self.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(JournalError::missing("symbol"));
        }

        let direction: Direction = required(&self.direction, "direction")?.parse()?;
        let market = optional(&self.market).map(str::parse::<MarketType>).transpose()?;
        let strategy = optional(&self.strategy).map(str::parse::<StrategyTag>).transpose()?;

        let qty_str = required(&self.qty, "qty")?;
        let qty: u32 = qty_str
            .parse()
            .map_err(|_| JournalError::invalid("qty", format!("'{qty_str}' is not a positive whole number")))?;
        if qty == 0 {
            return Err(JournalError::invalid("qty", "must be greater than zero"));
        }

        let price = parse_price(required(&self.price, "price")?, "price")?;
        let exit_price = optional(&self.exit_price)
            .map(|s| parse_price(s, "exit_price"))
            .transpose()?;
        let stop_loss = optional(&self.stop_loss)
            .map(|s| parse_number(s, "stop_loss"))
            .transpose()?;

        let pnl = match (optional(&self.pnl), exit_price) {
            (Some(s), _) => parse_number(s, "pnl")?,
            (None, Some(exit)) => derive_pnl(price, exit, qty),
            (None, None) => return Err(JournalError::missing("pnl")),
        };
        if !pnl.is_finite() {
            return Err(JournalError::invalid("pnl", "must be a finite number"));
        }

        Ok(Trade {
            date,
            symbol,
            direction,
            qty,
            price,
            pnl,
            notes: self.notes.trim().to_string(),
            market,
            exit_price,
            stop_loss,
            strategy,
        })
    }
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, JournalError> {
    optional(value).ok_or_else(|| JournalError::missing(field))
}

fn parse_number(value: &str, field: &str) -> Result<f64, JournalError> {
    let n: f64 = value
        .parse()
        .map_err(|_| JournalError::invalid(field, format!("'{value}' is not a number")))?;
    if !n.is_finite() {
        return Err(JournalError::invalid(field, "must be a finite number"));
    }
    Ok(n)
}

fn parse_price(value: &str, field: &str) -> Result<f64, JournalError> {
    let n = parse_number(value, field)?;
    if n < 0.0 {
        return Err(JournalError::invalid(field, "must not be negative"));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn console_form() -> TradeForm {
        TradeForm {
            date: "2024-01-01".into(),
            symbol: "nifty".into(),
            direction: "BUY".into(),
            qty: "10".into(),
            price: "100".into(),
            pnl: "50".into(),
            ..TradeForm::default()
        }
    }

    #[test]
    fn symbol_is_upper_cased() {
        let trade = console_form().into_trade(today()).unwrap();
        assert_eq!(trade.symbol, "NIFTY");
        assert_eq!(trade.qty, 10);
        assert_eq!(trade.pnl, 50.0);
        assert!(trade.is_win());
    }

    #[test]
    fn blank_date_defaults_to_today() {
        let form = TradeForm { date: "  ".into(), ..console_form() };
        let trade = form.into_trade(today()).unwrap();
        assert_eq!(trade.date, today());
    }

    #[test]
    fn malformed_date_is_rejected() {
        let form = TradeForm { date: "01/02/2024".into(), ..console_form() };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::InvalidField { ref field, .. } if field == "date"));
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        let form = TradeForm { qty: "ten".into(), ..console_form() };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::InvalidField { ref field, .. } if field == "qty"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let form = TradeForm { qty: "0".into(), ..console_form() };
        assert!(form.into_trade(today()).is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let form = TradeForm { price: "-1".into(), ..console_form() };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::InvalidField { ref field, .. } if field == "price"));
    }

    #[test]
    fn nan_pnl_is_rejected() {
        let form = TradeForm { pnl: "NaN".into(), ..console_form() };
        assert!(form.into_trade(today()).is_err());
    }

    #[test]
    fn empty_symbol_is_missing() {
        let form = TradeForm { symbol: " ".into(), ..console_form() };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::MissingField { ref field } if field == "symbol"));
    }

    #[test]
    fn pnl_is_derived_from_exit_price() {
        let form = TradeForm {
            pnl: String::new(),
            exit_price: "104.5".into(),
            ..console_form()
        };
        let trade = form.into_trade(today()).unwrap();
        assert!((trade.pnl - 45.0).abs() < 1e-9);
        assert_eq!(trade.exit_price, Some(104.5));
    }

    #[test]
    fn overflowing_derived_pnl_is_rejected() {
        let form = TradeForm {
            qty: "4000000000".into(),
            price: "0".into(),
            exit_price: "1e300".into(),
            pnl: String::new(),
            ..console_form()
        };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::InvalidField { ref field, .. } if field == "pnl"));
    }

    #[test]
    fn finite_values_check_covers_optional_prices() {
        let mut trade = console_form().into_trade(today()).unwrap();
        assert!(trade.has_finite_values());
        trade.stop_loss = Some(f64::NAN);
        assert!(!trade.has_finite_values());
    }

    #[test]
    fn derived_pnl_is_signed() {
        assert!((derive_pnl(100.0, 90.0, 5) + 50.0).abs() < 1e-9);
        assert!((derive_pnl(100.0, 112.0, 2) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn missing_pnl_and_exit_is_rejected() {
        let form = TradeForm { pnl: String::new(), ..console_form() };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::MissingField { ref field } if field == "pnl"));
    }

    #[test]
    fn pnl_pct_guards_zero_entry_price() {
        let form = TradeForm {
            price: "0".into(),
            exit_price: "5".into(),
            pnl: String::new(),
            ..console_form()
        };
        let trade = form.into_trade(today()).unwrap();
        assert_eq!(trade.pnl_pct(), 0.0);
    }

    #[test]
    fn pnl_pct_from_exit_price() {
        let form = TradeForm { exit_price: "110".into(), ..console_form() };
        let trade = form.into_trade(today()).unwrap();
        assert!((trade.pnl_pct() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn optional_tags_are_parsed_case_insensitively() {
        let form = TradeForm {
            market: "crypto".into(),
            strategy: "mean_reversion".into(),
            stop_loss: "25".into(),
            ..console_form()
        };
        let trade = form.into_trade(today()).unwrap();
        assert_eq!(trade.market, Some(MarketType::Crypto));
        assert_eq!(trade.strategy, Some(StrategyTag::MeanReversion));
        assert_eq!(trade.stop_loss, Some(25.0));
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let form = TradeForm { direction: "HOLD".into(), ..console_form() };
        let err = form.into_trade(today()).unwrap_err();
        assert!(matches!(err, JournalError::InvalidField { ref field, .. } if field == "direction"));
    }

    #[test]
    fn direction_serializes_upper_case() {
        let json = serde_json::to_string(&Direction::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
        let parsed: Direction = serde_json::from_str("\"buy\"").unwrap();
        assert_eq!(parsed, Direction::Buy);
    }
}
