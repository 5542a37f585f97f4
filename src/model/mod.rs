pub mod types;

pub use types::{Category, Judge, Project, ProjectScore, Score};
