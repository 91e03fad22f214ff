//! In-memory trade store for a dashboard session.

use crate::domain::error::JournalError;
use crate::domain::trade::Trade;
use crate::ports::trade_store::TradeStore;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    trades: Vec<Trade>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self { trades }
    }
}

impl TradeStore for MemoryStore {
    fn append(&mut self, trade: Trade) -> Result<(), JournalError> {
        self.trades.push(trade);
        Ok(())
    }

    fn all(&self) -> &[Trade] {
        &self.trades
    }
}
