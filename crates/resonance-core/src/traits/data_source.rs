//! Bar retrieval trait.

use crate::error::DataError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;

/// Trait for historical bar providers.
///
/// Implementations return whatever the provider gave them; ordering and
/// duplicate checks happen when the engine builds a `BarSeries`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch recent bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar timeframe
    /// * `lookback_days` - How many calendar days of history to request
    ///
    /// # Returns
    /// A vector of bars ordered from oldest to newest
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
