//! Multi-select filtering over strategy tag and market type.

use super::error::JournalError;
use super::trade::{MarketType, StrategyTag, Trade};

/// Conjunction of two multi-select filters. An empty selection places no
/// restriction on that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeFilter {
    pub strategies: Vec<StrategyTag>,
    pub markets: Vec<MarketType>,
}

impl TradeFilter {
    /// Builds a filter from raw `strategy=` / `market=` values, ignoring blanks.
    pub fn from_params<'a, I>(params: I) -> Result<Self, JournalError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = TradeFilter::default();
        for (key, value) in params {
            if value.trim().is_empty() {
                continue;
            }
            match key {
                "strategy" => filter.strategies.push(value.parse()?),
                "market" => filter.markets.push(value.parse()?),
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty() && self.markets.is_empty()
    }

    pub fn matches(&self, trade: &Trade) -> bool {
        let strategy_ok = self.strategies.is_empty()
            || trade.strategy.is_some_and(|s| self.strategies.contains(&s));
        let market_ok =
            self.markets.is_empty() || trade.market.is_some_and(|m| self.markets.contains(&m));
        strategy_ok && market_ok
    }

    pub fn apply(&self, trades: &[Trade]) -> Vec<Trade> {
        trades.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    /// Query string reproducing this filter, without the leading `?`.
    pub fn query_string(&self) -> String {
        let strategies = self
            .strategies
            .iter()
            .map(|s| format!("strategy={}", s.as_str().replace(' ', "+")));
        let markets = self.markets.iter().map(|m| format!("market={}", m.as_str()));
        strategies.chain(markets).collect::<Vec<_>>().join("&")
    }
}
