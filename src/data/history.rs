//! Quiz player history: headerless two-column CSV (`name,score`), append-only.
//! The file is never rewritten, rotated or deduplicated, so it grows without bound.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HISTORY_PATH: &str = "player_history.csv";

static HISTORY_APPEND_MTX: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("history line {line}: score '{value}' is not a whole number")]
    InvalidScore { line: u64, value: String },
    #[error("history append lock poisoned")]
    LockPoisoned,
}

/// Append one row and close the file. Appends from concurrent handlers are serialized.
pub fn append_score(path: &Path, entry: &ScoreEntry) -> Result<(), HistoryError> {
    let _guard = HISTORY_APPEND_MTX
        .lock()
        .map_err(|_| HistoryError::LockPoisoned)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    let score = entry.score.to_string();
    writer.write_record([entry.name.as_str(), score.as_str()])?;
    writer.flush()?;
    Ok(())
}

/// Read every entry in append order. A missing file is an empty history.
pub fn load_history(path: &Path) -> Result<Vec<ScoreEntry>, HistoryError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let name = record.get(0).unwrap_or("").to_string();
        let raw_score = record.get(1).unwrap_or("").trim();
        let score = parse_score(raw_score).ok_or_else(|| HistoryError::InvalidScore {
            line,
            value: raw_score.to_string(),
        })?;
        entries.push(ScoreEntry { name, score });
    }
    Ok(entries)
}

/// Whole numbers only; `70.0` is accepted as 70 but `70.5` is rejected.
fn parse_score(raw: &str) -> Option<u32> {
    if let Ok(score) = raw.parse::<u32>() {
        return Some(score);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_entry_reads_back_last() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("player_history.csv");
        append_score(&path, &ScoreEntry { name: "Ashlyn".into(), score: 90 }).expect("append");
        append_score(&path, &ScoreEntry { name: "Lee, Jr.".into(), score: 40 }).expect("append");

        let history = load_history(&path).expect("load");
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.last(),
            Some(&ScoreEntry { name: "Lee, Jr.".into(), score: 40 })
        );
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let history = load_history(&dir.path().join("none.csv")).expect("load");
        assert!(history.is_empty());
    }

    #[test]
    fn append_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("history.csv");
        append_score(&path, &ScoreEntry { name: "Kai".into(), score: 0 }).expect("append");
        assert!(path.is_file());
    }

    #[test]
    fn fractional_score_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.csv");
        fs::write(&path, "Kai,70.0\nMo,70.5\n").expect("write fixture");
        let err = load_history(&path).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidScore { line: 2, ref value } if value == "70.5"));
    }

    #[test]
    fn concurrent_appends_stay_whole_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.csv");

        std::thread::scope(|scope| {
            for player in 0..16u32 {
                let path = &path;
                scope.spawn(move || {
                    let entry = ScoreEntry {
                        name: format!("Player {player}, Boston"),
                        score: player * 10,
                    };
                    append_score(path, &entry).expect("append");
                });
            }
        });

        let mut history = load_history(&path).expect("load");
        assert_eq!(history.len(), 16);
        history.sort_by_key(|entry| entry.score);
        for (player, entry) in (0..16u32).zip(&history) {
            assert_eq!(entry.name, format!("Player {player}, Boston"));
            assert_eq!(entry.score, player * 10);
        }
    }
}
