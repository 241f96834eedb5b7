//! Newline-delimited seen-id log.
//!
//! The whole file is read once at startup; afterwards every recorded id is
//! appended as its own line. Nothing is ever rewritten or removed.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::domain::InscriptionId;
use crate::error::Result;
use crate::port::SeenStore;

/// File-backed [`SeenStore`].
#[derive(Debug)]
pub struct FileSeenStore {
    path: PathBuf,
    seen: HashSet<InscriptionId>,
}

impl FileSeenStore {
    /// Load every id from `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let seen = match fs::read_to_string(&path).await {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(InscriptionId::from)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), ids = seen.len(), "Loaded seen listings");
        Ok(Self { path, seen })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, id: &InscriptionId) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{id}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl SeenStore for FileSeenStore {
    fn contains(&self, id: &InscriptionId) -> bool {
        self.seen.contains(id)
    }

    async fn record(&mut self, id: &InscriptionId) -> Result<()> {
        if !self.seen.insert(id.clone()) {
            return Ok(());
        }
        self.append(id).await?;
        debug!(inscription = %id, "Recorded seen listing");
        Ok(())
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeenStore::load(dir.path().join("seen.txt")).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn load_skips_blank_lines_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.txt");
        std::fs::write(&path, "abci0\n\n  defi1  \r\nabci0\n").unwrap();

        let store = FileSeenStore::load(&path).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.contains(&InscriptionId::new("abci0")));
        assert!(store.contains(&InscriptionId::new("defi1")));
    }

    #[tokio::test]
    async fn record_appends_and_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("seen.txt");

        let mut store = FileSeenStore::load(&path).await.unwrap();
        store.record(&InscriptionId::new("abci3")).await.unwrap();
        store.record(&InscriptionId::new("xyzi0")).await.unwrap();

        let reloaded = FileSeenStore::load(&path).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(&InscriptionId::new("abci3")));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abci3\nxyzi0\n");
    }

    #[tokio::test]
    async fn recording_known_id_does_not_append_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.txt");

        let mut store = FileSeenStore::load(&path).await.unwrap();
        store.record(&InscriptionId::new("abci3")).await.unwrap();
        store.record(&InscriptionId::new("abci3")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abci3\n");
    }

    #[tokio::test]
    async fn failed_write_still_marks_seen_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the append fail.
        let path = dir.path().join("seen.txt");
        std::fs::create_dir(&path).unwrap();

        let mut store = FileSeenStore {
            path,
            seen: HashSet::new(),
        };
        let id = InscriptionId::new("abci3");

        assert!(store.record(&id).await.is_err());
        assert!(store.contains(&id));
    }
}
