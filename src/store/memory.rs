use anyhow::Result;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::data::ContestData;
use super::error::StoreError;
use super::feed::{ChangeFeed, ScoreEvent, ScoreFeed};
use super::ScoreStore;
use crate::model::{Judge, Project, Score};

/// In-process store. Every write is published on its change feed while the
/// lock is still held, so subscribers see writes in the order they happened.
pub struct MemoryStore {
    data: Mutex<ContestData>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new(data: ContestData) -> Self {
        Self::with_feed(data, ChangeFeed::default())
    }

    pub fn with_feed(data: ContestData, feed: ChangeFeed) -> Self {
        Self {
            data: Mutex::new(data),
            feed,
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Remove a score, as an external moderation action would.
    /// Returns true if a record was removed.
    pub fn delete_score(&self, project_id: &str, judge_id: &str) -> Result<bool> {
        let mut data = self.lock()?;
        match data.delete_score(project_id, judge_id, Utc::now()) {
            Some(event) => {
                debug!(project_id, judge_id, "score deleted");
                self.feed.publish(event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ContestData>, StoreError> {
        self.data.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ScoreStore for MemoryStore {
    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.lock()?.projects.clone())
    }

    fn list_judges(&self) -> Result<Vec<Judge>> {
        Ok(self.lock()?.judges.clone())
    }

    fn list_scores(&self) -> Result<Vec<Score>> {
        Ok(self.lock()?.scores.clone())
    }

    fn upsert_score(&self, score: Score) -> Result<ScoreEvent> {
        let mut data = self.lock()?;
        data.check_references(&score)?;
        let event = data.upsert_score(score, Utc::now());

        let (project_id, judge_id) = event.key();
        debug!(project_id, judge_id, "score stored");
        self.feed.publish(event.clone());
        Ok(event)
    }

    fn subscribe(&self) -> Option<ScoreFeed> {
        Some(self.feed.subscribe())
    }

    fn snapshot(&self) -> Result<ContestData> {
        Ok(self.lock()?.clone())
    }
}
