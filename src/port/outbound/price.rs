//! Price source port.

use async_trait::async_trait;

use crate::domain::PriceQuote;
use crate::error::Result;

/// Remote lookup of the collection's floor price and 24h volume.
///
/// Implementations report every failure (network, HTTP status, malformed
/// body) as an error; caching and timeouts live in the caller.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Result<PriceQuote>;

    /// Source name used in logs.
    fn name(&self) -> &'static str;
}
