//! Bar sources for the resonance engine.
//!
//! - [`YahooDataSource`]: the public chart HTTP endpoint
//! - [`CsvDataSource`]: a directory of `{SYMBOL}_{interval}.csv` files

mod csv_source;
mod yahoo;

pub use csv_source::CsvDataSource;
pub use yahoo::{YahooDataSource, DEFAULT_YAHOO_URL};
