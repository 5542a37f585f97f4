pub mod formatter;

pub use formatter::{
    format_average, format_json, format_judges, format_leaderboard_table, format_project_detail,
    format_projects, format_summary, format_tsv, join_rankings, should_use_colors, RankedProject,
};
