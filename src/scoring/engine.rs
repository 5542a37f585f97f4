use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Category, Project, ProjectScore, Score};

/// Aggregate every judge's scores into one ranked entry per project.
///
/// `projects` order decides ties: of two projects with the same total, the one
/// listed first gets the lower rank number. Scores for unknown project ids are
/// ignored. Ratings are averaged as given, with no range checks.
pub fn compute_project_scores(projects: &[Project], scores: &[Score]) -> Vec<ProjectScore> {
    aggregate(projects, scores, |_| true)
}

/// Same as [`compute_project_scores`], restricted to one judge's scores.
///
/// Projects the judge has not scored rank with a total of 0.
pub fn compute_personal_project_scores(
    projects: &[Project],
    scores: &[Score],
    judge_id: &str,
) -> Vec<ProjectScore> {
    aggregate(projects, scores, |score| score.judge_id == judge_id)
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn aggregate<F>(projects: &[Project], scores: &[Score], include: F) -> Vec<ProjectScore>
where
    F: Fn(&Score) -> bool,
{
    let mut by_project: HashMap<&str, Vec<&Score>> = HashMap::new();
    for score in scores.iter().filter(|s| include(s)) {
        by_project
            .entry(score.project_id.as_str())
            .or_default()
            .push(score);
    }

    let entries = projects
        .iter()
        .map(|project| {
            let contributing = by_project
                .get(project.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            summarize(&project.id, contributing)
        })
        .collect();

    assign_ranks(entries)
}

fn summarize(project_id: &str, contributing: &[&Score]) -> ProjectScore {
    let count = contributing.len();

    let means = if count == 0 {
        [0.0; 4]
    } else {
        let mut sums = [0.0; 4];
        for score in contributing {
            for category in Category::ALL {
                sums[category.index()] += score.rating(category);
            }
        }
        sums.map(|sum| sum / count as f64)
    };

    // Total is the mean of the category means, taken before rounding
    let total = means.iter().sum::<f64>() / 4.0;

    ProjectScore {
        project_id: project_id.to_string(),
        average_a: round2(means[0]),
        average_b: round2(means[1]),
        average_c: round2(means[2]),
        average_d: round2(means[3]),
        total_average: round2(total),
        rank: 0,
        judge_count: count,
        strong_picks: contributing.iter().filter(|s| s.is_strong_pick()).count(),
    }
}

/// Stable sort by total descending, then number positions from 1.
fn assign_ranks(mut entries: Vec<ProjectScore>) -> Vec<ProjectScore> {
    entries.sort_by(|a, b| compare_totals(a.total_average, b.total_average));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }
    entries
}

/// Descending order over totals. NaN sorts last; -0.0 and 0.0 are equal.
fn compare_totals(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

fn sort_key(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}
