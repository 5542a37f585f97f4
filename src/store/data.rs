use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use super::feed::ScoreEvent;
use crate::model::{Judge, Project, Score};

pub const DATA_VERSION: u32 = 1;

/// Full contest snapshot: the records a store holds and a change-feed consumer
/// mirrors locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestData {
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub judges: Vec<Judge>,
    #[serde(default)]
    pub scores: Vec<Score>,
    /// Latest delete per key, so a late copy of an older write cannot bring
    /// a removed score back
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<Deletion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub project_id: String,
    pub judge_id: String,
    pub deleted_at: DateTime<Utc>,
}

impl Default for ContestData {
    fn default() -> Self {
        Self::new()
    }
}

impl ContestData {
    pub fn new() -> Self {
        Self {
            version: DATA_VERSION,
            projects: Vec::new(),
            judges: Vec::new(),
            scores: Vec::new(),
            deletions: Vec::new(),
        }
    }

    pub fn with_records(projects: Vec<Project>, judges: Vec<Judge>) -> Self {
        Self {
            projects,
            judges,
            ..Self::new()
        }
    }

    pub fn has_project(&self, project_id: &str) -> bool {
        self.projects.iter().any(|p| p.id == project_id)
    }

    pub fn has_judge(&self, judge_id: &str) -> bool {
        self.judges.iter().any(|j| j.id == judge_id)
    }

    /// Reject scores that point at a project or judge this contest does not know
    pub fn check_references(&self, score: &Score) -> Result<(), StoreError> {
        if !self.has_project(&score.project_id) {
            return Err(StoreError::UnknownProject(score.project_id.clone()));
        }
        if !self.has_judge(&score.judge_id) {
            return Err(StoreError::UnknownJudge(score.judge_id.clone()));
        }
        Ok(())
    }

    fn position(&self, project_id: &str, judge_id: &str) -> Option<usize> {
        self.scores
            .iter()
            .position(|s| s.project_id == project_id && s.judge_id == judge_id)
    }

    /// When the score for a key was last deleted, if ever
    pub fn deleted_at(&self, project_id: &str, judge_id: &str) -> Option<DateTime<Utc>> {
        self.deletions
            .iter()
            .find(|d| d.project_id == project_id && d.judge_id == judge_id)
            .map(|d| d.deleted_at)
    }

    fn record_deletion(&mut self, project_id: &str, judge_id: &str, at: DateTime<Utc>) {
        match self
            .deletions
            .iter_mut()
            .find(|d| d.project_id == project_id && d.judge_id == judge_id)
        {
            Some(existing) => existing.deleted_at = existing.deleted_at.max(at),
            None => self.deletions.push(Deletion {
                project_id: project_id.to_string(),
                judge_id: judge_id.to_string(),
                deleted_at: at,
            }),
        }
    }

    /// Store a submission, replacing any earlier record for the same key in
    /// full. The stored copy is stamped with `now`, or just after the key's
    /// last delete if the clock has not moved past it. Returns the change
    /// event describing what happened.
    pub fn upsert_score(&mut self, mut score: Score, now: DateTime<Utc>) -> ScoreEvent {
        score.last_updated = match self.deleted_at(&score.project_id, &score.judge_id) {
            Some(deleted_at) if deleted_at >= now => deleted_at + Duration::nanoseconds(1),
            _ => now,
        };
        match self.position(&score.project_id, &score.judge_id) {
            Some(index) => {
                self.scores[index] = score.clone();
                ScoreEvent::Updated { score }
            }
            None => {
                self.scores.push(score.clone());
                ScoreEvent::Inserted { score }
            }
        }
    }

    /// Remove the score for a key at time `now`. Returns the delete event if a
    /// record was removed.
    pub fn delete_score(
        &mut self,
        project_id: &str,
        judge_id: &str,
        now: DateTime<Utc>,
    ) -> Option<ScoreEvent> {
        let index = self.position(project_id, judge_id)?;
        let removed = self.scores.remove(index);
        let deleted_at = now.max(removed.last_updated + Duration::nanoseconds(1));
        self.record_deletion(project_id, judge_id, deleted_at);
        Some(ScoreEvent::Deleted {
            project_id: project_id.to_string(),
            judge_id: judge_id.to_string(),
            deleted_at,
        })
    }

    /// Apply a change event received from elsewhere.
    ///
    /// Every event carries a timestamp and the newest one per key wins: an
    /// insert or update older than the record held, or not newer than the
    /// key's last delete, is dropped. A delete older than the record held is
    /// dropped too. Returns true if the snapshot changed.
    pub fn apply_event(&mut self, event: &ScoreEvent) -> bool {
        match event {
            ScoreEvent::Inserted { score } | ScoreEvent::Updated { score } => {
                if let Some(deleted_at) = self.deleted_at(&score.project_id, &score.judge_id) {
                    if score.last_updated <= deleted_at {
                        return false;
                    }
                }
                match self.position(&score.project_id, &score.judge_id) {
                    Some(index) => {
                        let held = &self.scores[index];
                        if held.last_updated > score.last_updated || held == score {
                            return false;
                        }
                        self.scores[index] = score.clone();
                        true
                    }
                    None => {
                        self.scores.push(score.clone());
                        true
                    }
                }
            }
            ScoreEvent::Deleted {
                project_id,
                judge_id,
                deleted_at,
            } => {
                self.record_deletion(project_id, judge_id, *deleted_at);
                match self.position(project_id, judge_id) {
                    Some(index) if self.scores[index].last_updated < *deleted_at => {
                        self.scores.remove(index);
                        true
                    }
                    _ => false,
                }
            }
        }
    }
}
