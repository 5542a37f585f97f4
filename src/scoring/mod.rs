pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{compute_personal_project_scores, compute_project_scores, round2};
pub use validation::{validate_score, validate_scoring};
