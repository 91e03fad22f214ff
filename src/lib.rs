//! tradelog: personal trading journal.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. Two front ends share the domain:
//! an interactive console menu over a JSON journal file, and a browser
//! dashboard (feature `web`) over an in-memory session.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
