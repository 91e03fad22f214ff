//! CSV export of the (filtered) trade table.

use std::io::Write;

use crate::adapters::table::{self, COLUMNS};
use crate::domain::error::JournalError;
use crate::domain::trade::Trade;

pub const EXPORT_FILE_NAME: &str = "trades.csv";
pub const CSV_MEDIA_TYPE: &str = "text/csv";

pub fn write_csv<W: Write>(trades: &[Trade], out: W) -> Result<(), JournalError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(COLUMNS)?;
    for trade in trades {
        wtr.write_record(table::row(trade))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(trades: &[Trade]) -> Result<String, JournalError> {
    let mut buf = Vec::new();
    write_csv(trades, &mut buf)?;
    String::from_utf8(buf).map_err(|e| JournalError::invalid("csv", e.to_string()))
}
