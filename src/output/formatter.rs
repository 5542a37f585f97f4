use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::model::{Category, Judge, Project, ProjectScore};
use crate::scoring::ScoringConfig;
use crate::summary::{ContestSummary, JudgeRow};

/// A ranked entry joined with its project for display
pub struct RankedProject<'a> {
    pub project: &'a Project,
    pub score: &'a ProjectScore,
}

/// Pair each ranking with its project, keeping ranking order.
/// Rankings whose project is missing are skipped.
pub fn join_rankings<'a>(
    projects: &'a [Project],
    rankings: &'a [ProjectScore],
) -> Vec<RankedProject<'a>> {
    rankings
        .iter()
        .filter_map(|score| {
            projects
                .iter()
                .find(|p| p.id == score.project_id)
                .map(|project| RankedProject { project, score })
        })
        .collect()
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an average with two decimals ("7.50"). Unscored values show as "-".
pub fn format_average(value: f64, scored: bool) -> String {
    if scored {
        format!("{:.2}", value)
    } else {
        "-".to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the leaderboard as a table: Rank, Total, A, B, C, D, Judges, Title
///
/// The header names categories by their configured labels. Rank column is
/// 3 chars wide ("99."), numeric columns 6 ("10.00").
pub fn format_leaderboard_table(
    entries: &[RankedProject],
    scoring: &ScoringConfig,
    use_colors: bool,
) -> String {
    if entries.is_empty() {
        return "No projects found.".to_string();
    }

    let num_width = 6;
    let separator = "  ";
    // rank + space + 5 numeric columns + judge count column
    let fixed_width = 3 + 1 + (num_width + separator.len()) * 5 + 6 + separator.len();
    let term_width = get_terminal_width();

    let mut header = format!("{:>3} {:>width$}", "#", "Total", width = num_width);
    for category in Category::ALL {
        let label: String = scoring.label(category).chars().take(num_width).collect();
        header.push_str(separator);
        header.push_str(&format!("{:>width$}", label, width = num_width));
    }
    header.push_str(&format!("{}{:>6}{}Project", separator, "Judges", separator));

    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for entry in entries {
        let ps = entry.score;
        let scored = ps.is_scored();
        let rank_str = format!("{:>2}.", ps.rank);
        let total = format!(
            "{:>width$}",
            format_average(ps.total_average, scored),
            width = num_width
        );

        let averages = Category::ALL
            .iter()
            .map(|c| format!("{:>width$}", format_average(ps.average(*c), scored), width = num_width))
            .collect::<Vec<_>>()
            .join(separator);

        let title = match term_width {
            Some(width) if width > fixed_width + 10 => {
                truncate_title(&entry.project.title, width - fixed_width)
            }
            // Very narrow terminal, show truncated
            Some(_) => truncate_title(&entry.project.title, 20),
            // No terminal (pipe), don't truncate
            None => entry.project.title.clone(),
        };

        let picks = if ps.strong_picks > 0 {
            format!(" ({} strong)", ps.strong_picks)
        } else {
            String::new()
        };

        let line = if use_colors {
            let title = if ps.rank <= 3 && scored {
                title.bold().to_string()
            } else {
                title
            };
            format!(
                "{} {}{}{}{}{:>6}{}{}{}",
                rank_str.dimmed(),
                total.bold(),
                separator,
                averages,
                separator,
                ps.judge_count,
                separator,
                title,
                picks.green()
            )
        } else {
            format!(
                "{} {}{}{}{}{:>6}{}{}{}",
                rank_str, total, separator, averages, separator, ps.judge_count, separator, title, picks
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format the leaderboard as tab-separated values for scripting
/// Columns: rank, project_id, total, a, b, c, d, judge_count, title (no headers, no colors)
pub fn format_tsv(entries: &[RankedProject]) -> String {
    entries
        .iter()
        .map(|entry| {
            let ps = entry.score;
            format!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}\t{}",
                ps.rank,
                ps.project_id,
                ps.total_average,
                ps.average_a,
                ps.average_b,
                ps.average_c,
                ps.average_d,
                ps.judge_count,
                entry.project.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON for any serializable view (rankings, summaries)
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Headline numbers plus the top three
pub fn format_summary(summary: &ContestSummary, podium: &[RankedProject], use_colors: bool) -> String {
    let mut lines = vec![
        format!(
            "Projects: {}  Judges: {}  Scores: {}  Strong picks: {}",
            summary.project_count, summary.judge_count, summary.score_count, summary.strong_picks
        ),
        format!("Average total: {}", format_average(summary.average_total, true)),
    ];

    match (&summary.leader_title, summary.leader_total) {
        (Some(title), Some(total)) if use_colors => lines.push(format!(
            "Leading: {} ({})",
            title.bold().green(),
            format_average(total, true)
        )),
        (Some(title), Some(total)) => lines.push(format!(
            "Leading: {} ({})",
            title,
            format_average(total, true)
        )),
        _ => lines.push("No scores yet.".to_string()),
    }

    for entry in podium.iter().filter(|e| e.score.is_scored()).take(3) {
        lines.push(format!(
            "  {}. {} ({})",
            entry.score.rank,
            entry.project.title,
            format_average(entry.score.total_average, true)
        ));
    }

    lines.join("\n")
}

/// Multi-line project detail with the per-judge breakdown
pub fn format_project_detail(
    entry: &RankedProject,
    judges: &[JudgeRow],
    scoring: &ScoringConfig,
    use_colors: bool,
) -> String {
    let project = entry.project;
    let ps = entry.score;
    let scored = ps.is_scored();

    let title = if use_colors {
        project.title.bold().to_string()
    } else {
        project.title.clone()
    };

    let mut lines = vec![
        title,
        format!("  Id: {}", project.id),
        format!("  Category: {}", project.category),
        format!("  Team: {}", project.team.join(", ")),
    ];
    if !project.tags.is_empty() {
        lines.push(format!("  Tags: {}", project.tags.join(", ")));
    }
    if let Some(date) = project.submission_date {
        lines.push(format!("  Submitted: {}", date.format("%Y-%m-%d")));
    }
    if !project.description.is_empty() {
        lines.push(format!("  Description: {}", project.description));
    }
    if !project.problem.is_empty() {
        lines.push(format!("  Problem: {}", project.problem));
    }
    if !project.proposed_solution.is_empty() {
        lines.push(format!("  Solution: {}", project.proposed_solution));
    }

    lines.push(format!(
        "  Rank: {}  Total: {}  Judges: {}  Strong picks: {}",
        ps.rank,
        format_average(ps.total_average, scored),
        ps.judge_count,
        ps.strong_picks
    ));
    for category in Category::ALL {
        lines.push(format!(
            "    {}: {}",
            scoring.label(category),
            format_average(ps.average(category), scored)
        ));
    }

    lines.push("  Judges:".to_string());
    for row in judges {
        let line = match row.score {
            Some(score) => {
                let ratings = score
                    .ratings()
                    .iter()
                    .map(|r| format!("{}", r))
                    .collect::<Vec<_>>()
                    .join("/");
                let pick = if score.is_strong_pick() { " *" } else { "" };
                let mut line = format!("    {}: {}{}", row.judge.name, ratings, pick);
                if let Some(comment) = score.comment.as_deref().filter(|c| !c.is_empty()) {
                    line.push_str(&format!(" \"{}\"", comment));
                }
                line
            }
            None if use_colors => format!("    {}: {}", row.judge.name, "not scored".dimmed()),
            None => format!("    {}: not scored", row.judge.name),
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// One line per judge: id, name, expertise
pub fn format_judges(judges: &[Judge], use_colors: bool) -> String {
    if judges.is_empty() {
        return "No judges found.".to_string();
    }

    judges
        .iter()
        .map(|j| {
            if use_colors {
                format!("{} | {} | {}", j.id.dimmed(), j.name.bold(), j.expertise.cyan())
            } else {
                format!("{} | {} | {}", j.id, j.name, j.expertise)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per project: id, title, category, team
pub fn format_projects(projects: &[Project], use_colors: bool) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    projects
        .iter()
        .map(|p| {
            let team = p.team.join(", ");
            if use_colors {
                format!("{} | {} | {} | {}", p.id.dimmed(), p.title.bold(), p.category.cyan(), team)
            } else {
                format!("{} | {} | {} | {}", p.id, p.title, p.category, team)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
