//! Interactive numbered-menu front end for the journal.

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};

use crate::domain::error::JournalError;
use crate::domain::metrics::{self, Metrics};
use crate::domain::trade::{Trade, TradeForm};
use crate::ports::trade_store::TradeStore;

const MENU: &str = "\nTrading Journal Menu\n1. Add Trade\n2. View Trades\n3. Check Win Rate\n4. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddTrade,
    ViewTrades,
    WinRate,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AddTrade),
            "2" => Some(MenuChoice::ViewTrades),
            "3" => Some(MenuChoice::WinRate),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// One list-view line, 1-indexed.
pub fn format_trade_line(index: usize, trade: &Trade) -> String {
    format!(
        "{}. {} | {} | {} | Qty: {} | Price: {} | PnL: {} | Notes: {}",
        index,
        trade.date,
        trade.symbol,
        trade.direction,
        trade.qty,
        trade.price,
        trade.pnl,
        trade.notes
    )
}

pub fn write_trade_list<W: Write>(trades: &[Trade], out: &mut W) -> io::Result<()> {
    if trades.is_empty() {
        writeln!(out, "No trades yet!")?;
        return Ok(());
    }
    for (i, trade) in trades.iter().enumerate() {
        writeln!(out, "{}", format_trade_line(i + 1, trade))?;
    }
    Ok(())
}

/// Full summary block printed by `tradelog stats`.
pub fn write_stats<W: Write>(m: &Metrics, out: &mut W) -> io::Result<()> {
    writeln!(out, "Trades:        {}", m.total_trades)?;
    writeln!(out, "Won / Lost:    {} / {}", m.trades_won, m.trades_lost)?;
    writeln!(out, "Win Rate:      {:.2}%", m.win_rate)?;
    writeln!(out, "Total P&L:     {:.2}", m.total_pnl)?;
    writeln!(out, "Average P&L:   {:.2}", m.avg_pnl)?;
    writeln!(out, "Profit Factor: {}", m.profit_factor_display())?;
    writeln!(out, "Reward/Risk:   {:.2}", m.reward_risk)?;
    writeln!(out, "Average Win:   {:.2}", m.avg_win)?;
    writeln!(out, "Average Loss:  {:.2}", m.avg_loss)?;
    writeln!(out, "Largest Win:   {:.2}", m.largest_win)?;
    writeln!(out, "Largest Loss:  {:.2}", m.largest_loss)?;
    Ok(())
}

pub struct ConsoleJournal<'a, S: TradeStore, R: BufRead, W: Write> {
    store: &'a mut S,
    input: R,
    output: W,
    today: Option<NaiveDate>,
}

impl<'a, S: TradeStore, R: BufRead, W: Write> ConsoleJournal<'a, S, R, W> {
    pub fn new(store: &'a mut S, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            today: None,
        }
    }

    /// Pins the date used for blank date entries.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Runs the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), JournalError> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(line) = self.prompt("Enter choice: ")? else {
                break;
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::AddTrade) => {
                    if !self.add_trade()? {
                        break;
                    }
                }
                Some(MenuChoice::ViewTrades) => write_trade_list(self.store.all(), &mut self.output)?,
                Some(MenuChoice::WinRate) => {
                    let rate = metrics::win_rate(self.store.all());
                    writeln!(self.output, "Win Rate: {rate:.2}%")?;
                }
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting... Bye!")?;
                    return Ok(());
                }
                None => {
                    tracing::debug!(input = %line.trim(), "invalid menu choice");
                    writeln!(self.output, "Invalid choice! Try again.")?;
                }
            }
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Returns `false` when input ended part-way through the entry.
    fn add_trade(&mut self) -> Result<bool, JournalError> {
        let prompts = [
            "Enter Date (YYYY-MM-DD): ",
            "Enter Symbol: ",
            "Direction (BUY/SELL): ",
            "Quantity: ",
            "Price: ",
            "Profit/Loss: ",
            "Notes (optional): ",
        ];
        let mut answers = Vec::with_capacity(prompts.len());
        for label in prompts {
            match self.prompt(label)? {
                Some(answer) => answers.push(answer),
                None => return Ok(false),
            }
        }

        let mut answers = answers.into_iter();
        let mut next = || answers.next().unwrap_or_default();
        let form = TradeForm {
            date: next(),
            symbol: next(),
            direction: next(),
            qty: next(),
            price: next(),
            pnl: next(),
            notes: next(),
            ..TradeForm::default()
        };

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let trade = match form.into_trade(today) {
            Ok(t) => t,
            Err(e) => {
                tracing::info!(error = %e, "trade entry rejected");
                writeln!(self.output, "Could not add trade: {e}")?;
                return Ok(true);
            }
        };

        match self.store.append(trade) {
            Ok(()) => writeln!(self.output, "Trade added successfully!")?,
            Err(e) if e.is_input_error() => writeln!(self.output, "Could not add trade: {e}")?,
            Err(e) => {
                tracing::error!(error = %e, "failed to save trade");
                writeln!(self.output, "Could not save trade: {e}")?;
            }
        }
        Ok(true)
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
