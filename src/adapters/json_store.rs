//! JSON file trade store.
//!
//! The file holds one pretty-printed JSON array. Every append rewrites the
//! whole array into a temporary file next to the target and renames it into
//! place, so a failed write never leaves a truncated journal behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

use crate::domain::error::JournalError;
use crate::domain::trade::Trade;
use crate::ports::trade_store::TradeStore;

pub const DEFAULT_INDENT: usize = 4;

pub struct JsonFileStore {
    path: PathBuf,
    indent: usize,
    trades: Vec<Trade>,
}

impl JsonFileStore {
    /// Loads the journal at `path`. A missing file yields an empty journal.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let trades = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| JournalError::Store {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no journal file yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), trades = trades.len(), "journal loaded");
        Ok(Self {
            path,
            indent: DEFAULT_INDENT,
            trades,
        })
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, trades: &[Trade]) -> Result<(), JournalError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if let Some(bad) = trades.iter().find(|t| !t.has_finite_values()) {
            return Err(JournalError::Store {
                path: self.path.display().to_string(),
                reason: format!("trade {} on {} has a non-finite number", bad.symbol, bad.date),
            });
        }

        let tmp = NamedTempFile::new_in(&dir)?;
        // The temp file starts out owner-only; keep whatever mode the journal had.
        match fs::metadata(&self.path) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        {
            let mut writer = BufWriter::new(tmp.as_file());
            let indent = " ".repeat(self.indent);
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = Serializer::with_formatter(&mut writer, formatter);
            trades.serialize(&mut ser).map_err(|e| JournalError::Store {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| JournalError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), trades = trades.len(), "journal written");
        Ok(())
    }
}

impl TradeStore for JsonFileStore {
    fn append(&mut self, trade: Trade) -> Result<(), JournalError> {
        self.trades.push(trade);
        if let Err(e) = self.save(&self.trades) {
            self.trades.pop();
            tracing::warn!(path = %self.path.display(), error = %e, "journal write failed");
            return Err(e);
        }
        Ok(())
    }

    fn all(&self) -> &[Trade] {
        &self.trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{Direction, StrategyTag};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn sample_trade(symbol: &str, pnl: f64) -> Trade {
        Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            symbol: symbol.to_string(),
            direction: Direction::Buy,
            qty: 10,
            price: 100.0,
            pnl,
            notes: "first".into(),
            market: None,
            exit_price: None,
            stop_loss: None,
            strategy: None,
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("journal.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn empty_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, "").unwrap();
        assert!(JsonFileStore::open(&path).unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::open(&path).err().unwrap();
        assert!(matches!(err, JournalError::Store { .. }));
    }

    #[test]
    fn append_persists_and_reloads_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.append(sample_trade("NIFTY", 50.0)).unwrap();
        let mut tagged = sample_trade("BANKNIFTY", -20.0);
        tagged.strategy = Some(StrategyTag::Swing);
        tagged.exit_price = Some(98.0);
        store.append(tagged.clone()).unwrap();

        let reloaded = JsonFileStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.all()[0], sample_trade("NIFTY", 50.0));
        assert_eq!(reloaded.all()[1], tagged);
    }

    #[test]
    fn file_uses_original_keys_and_four_space_indent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.append(sample_trade("NIFTY", 50.0)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n    {\n        \"date\": \"2024-01-01\""));
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let keys: Vec<&String> = value[0].as_object().unwrap().keys().collect();
        let mut expected = vec!["date", "direction", "notes", "pnl", "price", "qty", "symbol"];
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn custom_indent_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");

        let mut store = JsonFileStore::open(&path).unwrap().with_indent(2);
        store.append(sample_trade("NIFTY", 1.0)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {\n    \"date\""));
    }

    #[test]
    fn reads_legacy_file_without_optional_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(
            &path,
            r#"[{"date": "2024-01-01", "symbol": "NIFTY", "direction": "buy", "qty": 10, "price": 100, "pnl": 50, "notes": ""}]"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.all()[0].direction, Direction::Buy);
        assert_eq!(store.all()[0].price, 100.0);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("journal.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.append(sample_trade("NIFTY", 1.0)).is_err());
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_trade_leaves_existing_journal_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.append(sample_trade("NIFTY", 50.0)).unwrap();
        let before = fs::read(&path).unwrap();

        let err = store.append(sample_trade("BROKEN", f64::NAN)).unwrap_err();
        assert!(matches!(err, JournalError::Store { .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(JsonFileStore::open(&path).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn append_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(&path, "[]").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        store.append(sample_trade("NIFTY", 1.0)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn pnl_survives_reload_bit_for_bit(
            pnl in prop::num::f64::POSITIVE
                | prop::num::f64::NEGATIVE
                | prop::num::f64::NORMAL
                | prop::num::f64::SUBNORMAL,
            price in 0.0f64..1e9,
        ) {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("journal.json");

            let mut trade = sample_trade("NIFTY", pnl);
            trade.price = price;
            let mut store = JsonFileStore::open(&path).unwrap();
            store.append(trade).unwrap();

            let reloaded = JsonFileStore::open(&path).unwrap();
            prop_assert_eq!(reloaded.all()[0].pnl.to_bits(), pnl.to_bits());
            prop_assert_eq!(reloaded.all()[0].price.to_bits(), price.to_bits());
        }
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.append(sample_trade("A", 1.0)).unwrap();
        store.append(sample_trade("B", 2.0)).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
