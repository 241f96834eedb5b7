//! In-memory [`SeenStore`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::InscriptionId;
use crate::error::{Error, Result};
use crate::port::SeenStore;

/// Seen store whose clones share state, so tests can inspect it after
/// boxing one handle into the dispatcher.
#[derive(Clone, Default)]
pub struct MemorySeenStore {
    ids: Arc<Mutex<HashSet<InscriptionId>>>,
    record_calls: Arc<AtomicU32>,
    fail_writes: bool,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed ids, as if loaded at startup.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store
            .ids
            .lock()
            .expect("lock seen ids")
            .extend(ids.into_iter().map(InscriptionId::new));
        store
    }

    /// Every `record` keeps the id in memory but reports a write failure.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn ids(&self) -> HashSet<InscriptionId> {
        self.ids.lock().expect("lock seen ids").clone()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids
            .lock()
            .expect("lock seen ids")
            .contains(&InscriptionId::new(id))
    }

    pub fn record_calls(&self) -> u32 {
        self.record_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    fn contains(&self, id: &InscriptionId) -> bool {
        self.ids.lock().expect("lock seen ids").contains(id)
    }

    async fn record(&mut self, id: &InscriptionId) -> Result<()> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.ids.lock().expect("lock seen ids").insert(id.clone());
        if self.fail_writes {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.ids.lock().expect("lock seen ids").len()
    }
}
