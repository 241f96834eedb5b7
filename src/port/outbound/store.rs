//! Persistence port for already-handled listings.

use async_trait::async_trait;

use crate::domain::InscriptionId;
use crate::error::Result;

/// Append-only set of inscription ids that must never be notified again.
///
/// `contains` answers from memory. `record` adds the id to memory first and
/// then persists it, so a failed write still suppresses duplicates for the
/// rest of the process lifetime.
#[async_trait]
pub trait SeenStore: Send {
    fn contains(&self, id: &InscriptionId) -> bool;

    async fn record(&mut self, id: &InscriptionId) -> Result<()>;

    /// Number of ids currently known.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
