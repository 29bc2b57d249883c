//! Persistent high scores, keyed by player name.
//!
//! The file is a flat JSON object such as `{"P1": 120, "P2": 40}`. Reading
//! problems fall back to an empty table and writing problems are logged and
//! dropped; neither is ever allowed to interrupt a game.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type HighScores = BTreeMap<String, u32>;

#[derive(Debug, Error)]
pub enum HighscoreError {
    #[error("failed to read high scores from {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },
    #[error("malformed high score file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode high scores: {0}")]
    EncodeFailed(#[from] serde_json::Error),
    #[error("failed to write high scores to {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

pub trait HighscoreStore {
    fn load(&self) -> Result<HighScores, HighscoreError>;
    fn save(&self, scores: &HighScores) -> Result<(), HighscoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighscoreStore for JsonFileStore {
    /// A missing file is an empty table, not an error.
    fn load(&self) -> Result<HighScores, HighscoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HighScores::new()),
            Err(source) => {
                return Err(HighscoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| HighscoreError::ParseFailed {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, scores: &HighScores) -> Result<(), HighscoreError> {
        let text = serde_json::to_string(scores)?;
        fs::write(&self.path, text).map_err(|source| HighscoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }
}

/// Loads the table, substituting an empty one on any failure.
pub fn load_or_default(store: &impl HighscoreStore) -> HighScores {
    match store.load() {
        Ok(scores) => scores,
        Err(e) => {
            warn!("Error loading high scores, starting from zero: {}", e);
            HighScores::new()
        }
    }
}

/// Background writer. Submitting never blocks; saves happen in order on a
/// blocking thread.
pub struct HighscoreWriter {
    tx: mpsc::UnboundedSender<HighScores>,
    handle: JoinHandle<()>,
}

impl HighscoreWriter {
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(store: S) -> Self
    where
        S: HighscoreStore + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<HighScores>();
        let handle = tokio::task::spawn_blocking(move || {
            while let Some(scores) = rx.blocking_recv() {
                match store.save(&scores) {
                    Ok(()) => debug!("saved {} high scores", scores.len()),
                    Err(e) => warn!("Error saving high scores: {}", e),
                }
            }
        });
        HighscoreWriter { tx, handle }
    }

    pub fn submit(&self, scores: HighScores) {
        if self.tx.send(scores).is_err() {
            warn!("high score writer has stopped, dropping update");
        }
    }

    /// Waits for queued saves to land.
    pub async fn finish(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            warn!("high score writer panicked: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn table(entries: &[(&str, u32)]) -> HighScores {
        entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"));
        let scores = table(&[("P1", 120), ("P2", 40)]);

        store.save(&scores).unwrap();
        assert_eq!(store.load().unwrap(), scores);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"P1":120,"P2":40}"#);
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        let store = JsonFileStore::new(&path);

        for garbage in ["{not json", r#"{"P1": -5}"#, r#"["P1", 3]"#] {
            fs::write(&path, garbage).unwrap();
            assert!(matches!(
                store.load(),
                Err(HighscoreError::ParseFailed { .. })
            ));
            assert!(load_or_default(&store).is_empty());
        }
    }

    #[test]
    fn test_unwritable_location() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing").join("scores.json"));
        assert!(matches!(
            store.save(&table(&[("P1", 10)])),
            Err(HighscoreError::WriteFailed { .. })
        ));
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        saved: Arc<Mutex<Vec<HighScores>>>,
    }

    impl HighscoreStore for RecordingStore {
        fn load(&self) -> Result<HighScores, HighscoreError> {
            Ok(HighScores::new())
        }

        fn save(&self, scores: &HighScores) -> Result<(), HighscoreError> {
            self.saved.lock().unwrap().push(scores.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_writer_saves_in_order() {
        let store = RecordingStore::default();
        let writer = HighscoreWriter::spawn(store.clone());

        writer.submit(table(&[("P1", 10)]));
        writer.submit(table(&[("P1", 20)]));
        writer.finish().await;

        let saved = store.saved.lock().unwrap();
        assert_eq!(*saved, vec![table(&[("P1", 10)]), table(&[("P1", 20)])]);
    }

    #[tokio::test]
    async fn test_writer_survives_failures() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing").join("scores.json"));
        let writer = HighscoreWriter::spawn(store);

        writer.submit(table(&[("P1", 10)]));
        writer.submit(table(&[("P1", 20)]));
        writer.finish().await;
    }
}
