//! Per-server dashboard session state.

use chrono::NaiveDate;

use crate::adapters::memory_store::MemoryStore;
use crate::domain::error::JournalError;
use crate::domain::trade::{Trade, TradeForm};
use crate::ports::trade_store::TradeStore;

/// Trades entered through the dashboard. Lives only as long as the server.
#[derive(Debug, Default)]
pub struct DashboardSession {
    store: MemoryStore,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self {
            store: MemoryStore::with_trades(trades),
        }
    }

    pub fn trades(&self) -> &[Trade] {
        self.store.all()
    }

    pub fn record(&mut self, form: TradeForm, today: NaiveDate) -> Result<&Trade, JournalError> {
        let trade = form.into_trade(today)?;
        self.store.append(trade)?;
        self.store
            .all()
            .last()
            .ok_or_else(|| JournalError::invalid("trade", "append did not store the trade"))
    }
}
