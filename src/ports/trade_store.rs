//! Trade storage port trait.

use crate::domain::error::JournalError;
use crate::domain::trade::Trade;

/// Ordered, append-only collection of trades. Insertion order is display order.
pub trait TradeStore {
    /// Adds a trade at the end and persists the whole collection.
    ///
    /// On error the collection is left as it was before the call.
    fn append(&mut self, trade: Trade) -> Result<(), JournalError>;

    fn all(&self) -> &[Trade];

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}
