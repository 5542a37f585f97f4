use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four rating categories every judge scores atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
    D,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::A, Category::B, Category::C, Category::D];

    pub fn index(self) -> usize {
        match self {
            Category::A => 0,
            Category::B => 1,
            Category::C => 2,
            Category::D => 3,
        }
    }

    /// Lowercase key used in config files ("a".."d")
    pub fn key(self) -> &'static str {
        match self {
            Category::A => "a",
            Category::B => "b",
            Category::C => "c",
            Category::D => "d",
        }
    }

    /// Built-in display label, used when the config does not override it
    pub fn default_label(self) -> &'static str {
        match self {
            Category::A => "Feasibility",
            Category::B => "Potential",
            Category::C => "Team",
            Category::D => "Innovation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub proposed_solution: String,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub submission_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub expertise: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// One judge's ratings for one project. Keyed by (project_id, judge_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub project_id: String,
    pub judge_id: String,
    pub category_a: f64,
    pub category_b: f64,
    pub category_c: f64,
    pub category_d: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_pick: Option<bool>,
    pub last_updated: DateTime<Utc>,
}

impl Score {
    /// Build a score with the current time as its timestamp
    pub fn new(project_id: &str, judge_id: &str, ratings: [f64; 4]) -> Self {
        Self {
            project_id: project_id.to_string(),
            judge_id: judge_id.to_string(),
            category_a: ratings[0],
            category_b: ratings[1],
            category_c: ratings[2],
            category_d: ratings[3],
            comment: None,
            strong_pick: None,
            last_updated: Utc::now(),
        }
    }

    pub fn rating(&self, category: Category) -> f64 {
        match category {
            Category::A => self.category_a,
            Category::B => self.category_b,
            Category::C => self.category_c,
            Category::D => self.category_d,
        }
    }

    pub fn ratings(&self) -> [f64; 4] {
        [self.category_a, self.category_b, self.category_c, self.category_d]
    }

    pub fn is_strong_pick(&self) -> bool {
        self.strong_pick.unwrap_or(false)
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.project_id, &self.judge_id)
    }

    /// Mean of the four raw ratings, as shown next to the sliders while scoring
    pub fn mean_rating(&self) -> f64 {
        self.ratings().iter().sum::<f64>() / 4.0
    }
}

/// Aggregated view of one project. Derived on every call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScore {
    pub project_id: String,
    pub average_a: f64,
    pub average_b: f64,
    pub average_c: f64,
    pub average_d: f64,
    pub total_average: f64,
    pub rank: u32,
    pub judge_count: usize,
    pub strong_picks: usize,
}

impl ProjectScore {
    pub fn average(&self, category: Category) -> f64 {
        match category {
            Category::A => self.average_a,
            Category::B => self.average_b,
            Category::C => self.average_c,
            Category::D => self.average_d,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.judge_count > 0
    }
}
