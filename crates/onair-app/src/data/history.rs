//! Play history
//!
//! Append-only log of tracks that were on air, persisted as JSON.

use crate::config::history::MAX_HISTORY_ENTRIES;
use crate::data::storage;
use crate::error::Result;
use onair::stream::TrackInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// History file format version for migrations
const HISTORY_VERSION: u32 = 1;

/// One play of a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub artist: String,
    pub title: String,
    /// When the track was recorded (Unix timestamp)
    pub played_at: u64,
}

impl HistoryEntry {
    fn same_track(&self, track: &TrackInfo) -> bool {
        self.artist == track.artist && self.title == track.title
    }

    fn to_track(&self) -> TrackInfo {
        TrackInfo::new(&self.artist, &self.title)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    entries: Vec<HistoryEntry>,
}

/// Outcome of recording a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Saved,
    /// Same track as the most recent entry; nothing was appended
    Duplicate,
}

impl RecordOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOutcome::Saved => "saved",
            RecordOutcome::Duplicate => "duplicate",
        }
    }
}

/// Storage for played tracks
pub trait HistoryStore: Send {
    /// Append a track. Re-recording the track that is already on top is a no-op.
    fn record(&mut self, track: &TrackInfo) -> Result<RecordOutcome>;

    /// Most recent distinct (artist, title) pairs, newest first
    fn recent_distinct(&self, limit: usize) -> Result<Vec<TrackInfo>>;
}

/// History log kept in memory and optionally mirrored to a JSON file
#[derive(Debug, Default)]
pub struct HistoryLog {
    /// Oldest first
    entries: Vec<HistoryEntry>,
    path: Option<PathBuf>,
}

impl HistoryLog {
    /// Create an empty log that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load a log from `path`; a missing file gives an empty log
    pub fn load_from(path: &Path) -> Result<Self> {
        let entries = storage::load_from::<HistoryFile>(path)?
            .map(|file| file.entries)
            .unwrap_or_default();
        Ok(Self {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Record `track` with an explicit timestamp
    pub fn record_at(&mut self, track: &TrackInfo, played_at: u64) -> Result<RecordOutcome> {
        if self.entries.last().is_some_and(|last| last.same_track(track)) {
            return Ok(RecordOutcome::Duplicate);
        }

        let mut entries = self.entries.clone();
        entries.push(HistoryEntry {
            artist: track.artist.clone(),
            title: track.title.clone(),
            played_at,
        });
        if entries.len() > MAX_HISTORY_ENTRIES {
            let excess = entries.len() - MAX_HISTORY_ENTRIES;
            entries.drain(..excess);
        }

        // Memory only follows a successful write
        let file = HistoryFile {
            version: HISTORY_VERSION,
            entries,
        };
        self.persist(&file)?;
        self.entries = file.entries;
        Ok(RecordOutcome::Saved)
    }

    fn persist(&self, file: &HistoryFile) -> Result<()> {
        match &self.path {
            Some(path) => storage::save_to(path, file),
            None => Ok(()),
        }
    }
}

impl HistoryStore for HistoryLog {
    fn record(&mut self, track: &TrackInfo) -> Result<RecordOutcome> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.record_at(track, now)
    }

    fn recent_distinct(&self, limit: usize) -> Result<Vec<TrackInfo>> {
        let mut seen = HashSet::new();
        Ok(self
            .entries
            .iter()
            .rev()
            .filter(|e| seen.insert((e.artist.as_str(), e.title.as_str())))
            .take(limit)
            .map(HistoryEntry::to_track)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        temp_dir().join(format!(
            "onair_history_test_{}_{}_{}.json",
            std::process::id(),
            id,
            name
        ))
    }

    fn track(artist: &str, title: &str) -> TrackInfo {
        TrackInfo::new(artist, title)
    }

    #[test]
    fn test_empty_log() {
        let log = HistoryLog::in_memory();
        assert!(log.is_empty());
        assert!(log.recent_distinct(10).unwrap().is_empty());
    }

    #[test]
    fn test_record_appends() {
        let mut log = HistoryLog::in_memory();
        assert_eq!(log.record_at(&track("A", "1"), 100).unwrap(), RecordOutcome::Saved);
        assert_eq!(log.record_at(&track("B", "2"), 200).unwrap(), RecordOutcome::Saved);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].played_at, 200);
    }

    #[test]
    fn test_record_same_track_twice_is_duplicate() {
        let mut log = HistoryLog::in_memory();
        log.record_at(&track("A", "1"), 100).unwrap();
        assert_eq!(
            log.record_at(&track("A", "1"), 130).unwrap(),
            RecordOutcome::Duplicate
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_track_can_return_after_another() {
        let mut log = HistoryLog::in_memory();
        log.record_at(&track("A", "1"), 100).unwrap();
        log.record_at(&track("B", "2"), 200).unwrap();
        assert_eq!(log.record_at(&track("A", "1"), 300).unwrap(), RecordOutcome::Saved);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_recent_distinct_newest_first() {
        let mut log = HistoryLog::in_memory();
        log.record_at(&track("A", "1"), 100).unwrap();
        log.record_at(&track("B", "2"), 200).unwrap();
        log.record_at(&track("A", "1"), 300).unwrap();
        log.record_at(&track("C", "3"), 400).unwrap();

        assert_eq!(
            log.recent_distinct(10).unwrap(),
            vec![track("C", "3"), track("A", "1"), track("B", "2")]
        );
        assert_eq!(
            log.recent_distinct(2).unwrap(),
            vec![track("C", "3"), track("A", "1")]
        );
    }

    #[test]
    fn test_same_title_different_artist_is_distinct() {
        let mut log = HistoryLog::in_memory();
        log.record_at(&track("A", "Song"), 1).unwrap();
        log.record_at(&track("B", "Song"), 2).unwrap();
        assert_eq!(log.recent_distinct(10).unwrap().len(), 2);
    }

    #[test]
    fn test_log_is_capped() {
        let mut log = HistoryLog::in_memory();
        for i in 0..(MAX_HISTORY_ENTRIES + 5) {
            log.record_at(&track("A", &i.to_string()), i as u64).unwrap();
        }
        assert_eq!(log.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(log.entries()[0].title, "5");
    }

    #[test]
    fn test_persist_and_reload() {
        let path = temp_path("persist");
        let mut log = HistoryLog::load_from(&path).unwrap();
        assert!(log.is_empty());

        log.record_at(&track("Кино", "Группа крови"), 100).unwrap();
        log.record_at(&track("B", "2"), 200).unwrap();

        let reloaded = HistoryLog::load_from(&path).unwrap();
        assert_eq!(reloaded.entries(), log.entries());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_is_not_remembered() {
        let blocker = temp_path("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut log = HistoryLog {
            entries: Vec::new(),
            path: Some(blocker.join("history.json")),
        };

        assert!(log.record_at(&track("A", "1"), 100).is_err());
        assert!(log.is_empty());
        // Retrying must try the write again rather than report a duplicate
        assert!(log.record_at(&track("A", "1"), 101).is_err());
        assert!(log.recent_distinct(10).unwrap().is_empty());

        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ nope").unwrap();
        assert!(HistoryLog::load_from(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_record_uses_current_time() {
        let mut log = HistoryLog::in_memory();
        log.record(&track("A", "1")).unwrap();
        assert!(log.entries()[0].played_at > 0);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(RecordOutcome::Saved.as_str(), "saved");
        assert_eq!(RecordOutcome::Duplicate.as_str(), "duplicate");
    }
}
