#![allow(dead_code)]

use chrono::NaiveDate;
use std::io::Write;
use tradelog::domain::trade::{Direction, MarketType, StrategyTag, Trade};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_trade(day: &str, symbol: &str, pnl: f64) -> Trade {
    Trade {
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        symbol: symbol.to_string(),
        direction: Direction::Buy,
        qty: 10,
        price: 100.0,
        pnl,
        notes: String::new(),
        market: None,
        exit_price: None,
        stop_loss: None,
        strategy: None,
    }
}

pub fn tagged_trade(
    day: &str,
    symbol: &str,
    pnl: f64,
    strategy: StrategyTag,
    market: MarketType,
) -> Trade {
    Trade {
        strategy: Some(strategy),
        market: Some(market),
        ..make_trade(day, symbol, pnl)
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
