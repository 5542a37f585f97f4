//! Data access for projects, judges and scores.
//!
//! The aggregation engine never touches a store directly: callers pull a
//! snapshot through [`ScoreStore`] and hand plain slices to the engine.

pub mod data;
pub mod error;
pub mod feed;
pub mod file;
pub mod memory;

pub use data::{ContestData, Deletion, DATA_VERSION};
pub use error::StoreError;
pub use feed::{ChangeFeed, FeedMessage, ScoreEvent, ScoreFeed};
pub use file::{get_data_path, load_contest_data, save_contest_data, FileStore};
pub use memory::MemoryStore;

use anyhow::Result;

use crate::model::{Judge, Project, Score};

/// Authoritative holder of contest records.
pub trait ScoreStore: Send + Sync {
    fn list_projects(&self) -> Result<Vec<Project>>;

    fn list_judges(&self) -> Result<Vec<Judge>>;

    fn list_scores(&self) -> Result<Vec<Score>>;

    /// Insert or fully replace the score for (project_id, judge_id), stamping
    /// it with the current time. Fails with [`StoreError`] when the project or
    /// judge is unknown.
    fn upsert_score(&self, score: Score) -> Result<ScoreEvent>;

    /// Change feed for the score collection, when the store has one
    fn subscribe(&self) -> Option<ScoreFeed> {
        None
    }

    /// Projects, judges and scores in one call
    fn snapshot(&self) -> Result<ContestData> {
        Ok(ContestData {
            projects: self.list_projects()?,
            judges: self.list_judges()?,
            scores: self.list_scores()?,
            ..ContestData::new()
        })
    }
}
