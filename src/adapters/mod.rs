//! Concrete adapter implementations for ports, plus the two front ends.

pub mod chart_svg;
pub mod console;
pub mod csv_export;
pub mod file_config_adapter;
pub mod json_store;
pub mod memory_store;
pub mod table;
#[cfg(feature = "web")]
pub mod web;
