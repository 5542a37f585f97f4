use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::Utc;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use super::data::{ContestData, DATA_VERSION};
use super::error::StoreError;
use super::feed::{ChangeFeed, ScoreEvent, ScoreFeed};
use super::ScoreStore;
use crate::model::{Judge, Project, Score};

/// Get the default contest data file path (~/.config/contest-board/contest.json)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("contest.json")
}

/// Load contest data from a JSON file
///
/// If the file doesn't exist, returns an empty contest.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_contest_data(path: &Path) -> Result<ContestData> {
    if !path.exists() {
        debug!(path = %path.display(), "no data file, starting empty");
        return Ok(ContestData::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open contest data file at {}", path.display()))?;

    let data: ContestData = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse contest data in {}", path.display()))?;

    if data.version != DATA_VERSION {
        return Err(StoreError::UnsupportedVersion(data.version).into());
    }

    Ok(data)
}

/// Save contest data to a JSON file atomically
///
/// The file is never left half-written. Missing parent directories are created.
pub fn save_contest_data(path: &Path, data: &ContestData) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize contest data")?;

    file.commit().context("Failed to save contest data")?;

    Ok(())
}

/// Store backed by a single JSON file. Every call reads the file fresh, so
/// edits made by other processes are picked up on the next read. Writes from
/// this process are serialized and published in the order they were saved.
pub struct FileStore {
    path: PathBuf,
    feed: ChangeFeed,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            feed: ChangeFeed::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ContestData> {
        load_contest_data(&self.path)
    }
}

impl ScoreStore for FileStore {
    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.load()?.projects)
    }

    fn list_judges(&self) -> Result<Vec<Judge>> {
        Ok(self.load()?.judges)
    }

    fn list_scores(&self) -> Result<Vec<Score>> {
        Ok(self.load()?.scores)
    }

    fn upsert_score(&self, score: Score) -> Result<ScoreEvent> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut data = self.load()?;
        data.check_references(&score)?;
        let event = data.upsert_score(score, Utc::now());
        save_contest_data(&self.path, &data)?;

        let (project_id, judge_id) = event.key();
        debug!(project_id, judge_id, path = %self.path.display(), "score saved");
        self.feed.publish(event.clone());
        Ok(event)
    }

    fn subscribe(&self) -> Option<ScoreFeed> {
        Some(self.feed.subscribe())
    }

    fn snapshot(&self) -> Result<ContestData> {
        self.load()
    }
}
