use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

use contest_board::model::Score;
use contest_board::output;
use contest_board::scoring::{self, ScoringConfig};
use contest_board::store::{ContestData, FileStore, ScoreStore, StoreError};
use contest_board::summary::{judge_breakdown, ContestSummary};

const EXIT_SUCCESS: i32 = 0;
const EXIT_STORE: i32 = 2;
const EXIT_VALIDATION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Format {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the ranked leaderboard (default if no subcommand)
    Leaderboard {
        /// Only show the first N projects
        #[arg(long)]
        top: Option<usize>,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Rank projects using only one judge's scores
    Personal {
        /// Judge id
        #[arg(long)]
        judge: String,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Submit or replace a judge's score for a project
    Score {
        #[arg(long)]
        project: String,

        #[arg(long)]
        judge: String,

        /// Feasibility rating
        #[arg(short = 'a', allow_negative_numbers = true)]
        category_a: f64,

        /// Potential rating
        #[arg(short = 'b', allow_negative_numbers = true)]
        category_b: f64,

        /// Team rating
        #[arg(short = 'c', allow_negative_numbers = true)]
        category_c: f64,

        /// Innovation rating
        #[arg(short = 'd', allow_negative_numbers = true)]
        category_d: f64,

        #[arg(long)]
        comment: Option<String>,

        /// Mark the project as this judge's strong pick
        #[arg(long)]
        strong_pick: bool,
    },
    /// Show one project with every judge's scores
    Show {
        project_id: String,
    },
    /// List judges
    Judges,
    /// List projects
    Projects,
    /// Write a starter data file with sample projects and judges
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "contest-board")]
#[command(about = "Judge scoring and leaderboard for project contests", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/contest-board/config.yaml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn fail(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

/// Unknown project or judge ids are the caller's mistake; anything else the
/// store reports is a data problem.
fn store_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::UnknownProject(_)) | Some(StoreError::UnknownJudge(_)) => EXIT_VALIDATION,
        _ => EXIT_STORE,
    }
}

fn load_snapshot(store: &FileStore) -> ContestData {
    match store.snapshot() {
        Ok(data) => {
            debug!(
                projects = data.projects.len(),
                judges = data.judges.len(),
                scores = data.scores.len(),
                "contest data loaded"
            );
            data
        }
        Err(e) => fail(EXIT_STORE, format!("Data error: {:#}", e)),
    }
}

fn print_rankings(
    data: &ContestData,
    rankings: &[contest_board::model::ProjectScore],
    format: Format,
    scoring: &ScoringConfig,
) {
    let entries = output::join_rankings(&data.projects, rankings);
    match format {
        Format::Table => {
            let use_colors = output::should_use_colors();
            println!(
                "{}",
                output::format_leaderboard_table(&entries, scoring, use_colors)
            );
        }
        Format::Tsv => {
            let tsv = output::format_tsv(&entries);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        Format::Json => match output::format_json(rankings) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(EXIT_STORE, format!("Failed to serialize rankings: {}", e)),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    contest_board::logging::init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Leaderboard {
        top: None,
        format: Format::Table,
    });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match contest_board::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    // Validate scoring config at startup
    let effective_scoring = config.effective_scoring();
    if let Err(errors) = scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = config.data_path();
    debug!(path = %data_path.display(), "using contest data file");
    let store = FileStore::new(data_path);

    match command {
        Commands::Leaderboard { top, format } => {
            let data = load_snapshot(&store);
            let rankings = scoring::compute_project_scores(&data.projects, &data.scores);
            let shown = match top {
                Some(n) => &rankings[..n.min(rankings.len())],
                None => &rankings[..],
            };

            print_rankings(&data, shown, format, &effective_scoring);

            if format == Format::Table && !data.projects.is_empty() {
                let summary =
                    ContestSummary::build(&data.projects, &data.judges, &data.scores, &rankings);
                let entries = output::join_rankings(&data.projects, &rankings);
                println!();
                println!(
                    "{}",
                    output::format_summary(&summary, &entries, output::should_use_colors())
                );
            }
        }
        Commands::Personal { judge, format } => {
            let data = load_snapshot(&store);
            if !data.has_judge(&judge) {
                fail(EXIT_VALIDATION, format!("Unknown judge: {}", judge));
            }
            let rankings =
                scoring::compute_personal_project_scores(&data.projects, &data.scores, &judge);
            print_rankings(&data, &rankings, format, &effective_scoring);
        }
        Commands::Score {
            project,
            judge,
            category_a,
            category_b,
            category_c,
            category_d,
            comment,
            strong_pick,
        } => {
            let mut score = Score::new(
                &project,
                &judge,
                [category_a, category_b, category_c, category_d],
            );
            score.comment = comment;
            score.strong_pick = strong_pick.then_some(true);

            if let Err(errors) = scoring::validate_score(&score, &effective_scoring) {
                eprintln!("Invalid score:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_VALIDATION);
            }

            match store.upsert_score(score) {
                Ok(event) => {
                    info!(project = %project, judge = %judge, "score recorded");
                    let verb = match event {
                        contest_board::store::ScoreEvent::Inserted { .. } => "Recorded",
                        _ => "Updated",
                    };
                    println!("{} score from {} for {}", verb, judge, project);
                }
                Err(e) => fail(store_exit_code(&e), format!("Failed to save score: {:#}", e)),
            }
        }
        Commands::Show { project_id } => {
            let data = load_snapshot(&store);
            let rankings = scoring::compute_project_scores(&data.projects, &data.scores);
            let entries = output::join_rankings(&data.projects, &rankings);
            let Some(entry) = entries.iter().find(|e| e.project.id == project_id) else {
                fail(EXIT_VALIDATION, format!("Unknown project: {}", project_id));
            };

            let rows = judge_breakdown(&project_id, &data.judges, &data.scores);
            println!(
                "{}",
                output::format_project_detail(
                    entry,
                    &rows,
                    &effective_scoring,
                    output::should_use_colors()
                )
            );
        }
        Commands::Judges => {
            let data = load_snapshot(&store);
            println!(
                "{}",
                output::format_judges(&data.judges, output::should_use_colors())
            );
        }
        Commands::Projects => {
            let data = load_snapshot(&store);
            println!(
                "{}",
                output::format_projects(&data.projects, output::should_use_colors())
            );
        }
        Commands::Init { force } => {
            if let Err(e) = contest_board::config::write_starter_data(store.path(), force) {
                fail(EXIT_STORE, format!("Init failed: {:#}", e));
            }
            println!("Wrote starter contest to {}", store.path().display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
