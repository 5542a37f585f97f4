//! Read-only views over a contest snapshot: score lookup, per-judge
//! breakdown for one project, and headline numbers.

use serde::Serialize;

use crate::model::{Judge, Project, ProjectScore, Score};
use crate::scoring::round2;

/// The score a judge gave a project, if any
pub fn find_score<'a>(scores: &'a [Score], judge_id: &str, project_id: &str) -> Option<&'a Score> {
    scores
        .iter()
        .find(|s| s.judge_id == judge_id && s.project_id == project_id)
}

/// One judge's line in a project's detail view
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeRow<'a> {
    pub judge: &'a Judge,
    pub score: Option<&'a Score>,
}

/// Every judge, in judge order, with their score for `project_id` (or none)
pub fn judge_breakdown<'a>(
    project_id: &str,
    judges: &'a [Judge],
    scores: &'a [Score],
) -> Vec<JudgeRow<'a>> {
    judges
        .iter()
        .map(|judge| JudgeRow {
            judge,
            score: find_score(scores, &judge.id, project_id),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestSummary {
    pub project_count: usize,
    pub judge_count: usize,
    pub score_count: usize,
    pub strong_picks: usize,
    /// Mean of every project's total, unscored projects included
    pub average_total: f64,
    pub leader_id: Option<String>,
    pub leader_title: Option<String>,
    pub leader_total: Option<f64>,
}

impl ContestSummary {
    /// `rankings` must come from the engine for the same projects and scores.
    /// The leader is the first-ranked project that has at least one score.
    pub fn build(
        projects: &[Project],
        judges: &[Judge],
        scores: &[Score],
        rankings: &[ProjectScore],
    ) -> Self {
        let leader = rankings.iter().find(|ps| ps.is_scored());
        let leader_title = leader.and_then(|ps| {
            projects
                .iter()
                .find(|p| p.id == ps.project_id)
                .map(|p| p.title.clone())
        });

        let average_total = if rankings.is_empty() {
            0.0
        } else {
            round2(rankings.iter().map(|ps| ps.total_average).sum::<f64>() / rankings.len() as f64)
        };

        Self {
            project_count: projects.len(),
            judge_count: judges.len(),
            score_count: scores.len(),
            strong_picks: scores.iter().filter(|s| s.is_strong_pick()).count(),
            average_total,
            leader_id: leader.map(|ps| ps.project_id.clone()),
            leader_title,
            leader_total: leader.map(|ps| ps.total_average),
        }
    }
}
