use serde::{Deserialize, Serialize};

use crate::model::Category;

pub const DEFAULT_MIN_RATING: f64 = 1.0;
pub const DEFAULT_MAX_RATING: f64 = 10.0;

/// Rating scale and category labels.
///
/// The aggregation engine never reads this: it averages whatever it is given.
/// The scale is enforced only when a score is submitted, and only while
/// `strict` is on.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   min_rating: 1
///   max_rating: 10
///   strict: true
///   labels:
///     a: Feasibility
///     b: Potential
///     c: Team
///     d: Innovation
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Lowest accepted rating (default: 1)
    #[serde(default)]
    pub min_rating: Option<f64>,

    /// Highest accepted rating (default: 10)
    #[serde(default)]
    pub max_rating: Option<f64>,

    /// Reject out-of-scale or non-finite ratings on submission (default: true)
    #[serde(default)]
    pub strict: Option<bool>,

    /// Display labels for the four categories
    #[serde(default)]
    pub labels: Option<CategoryLabels>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_rating: Some(DEFAULT_MIN_RATING),
            max_rating: Some(DEFAULT_MAX_RATING),
            strict: Some(true),
            labels: None,
        }
    }
}

impl ScoringConfig {
    pub fn rating_bounds(&self) -> (f64, f64) {
        (
            self.min_rating.unwrap_or(DEFAULT_MIN_RATING),
            self.max_rating.unwrap_or(DEFAULT_MAX_RATING),
        )
    }

    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(true)
    }

    pub fn label(&self, category: Category) -> &str {
        match &self.labels {
            Some(labels) => labels.get(category),
            None => category.default_label(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryLabels {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl CategoryLabels {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::A => &self.a,
            Category::B => &self.b,
            Category::C => &self.c,
            Category::D => &self.d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.rating_bounds(), (1.0, 10.0));
        assert!(config.is_strict());
        assert_eq!(config.label(Category::A), "Feasibility");
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
max_rating: 5
strict: false
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.min_rating.is_none());
        assert_eq!(config.rating_bounds(), (1.0, 5.0));
        assert!(!config.is_strict());
    }

    #[test]
    fn test_custom_labels() {
        let yaml = r#"
labels:
  a: Viability
  b: Market
  c: People
  d: Novelty
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.label(Category::B), "Market");
        assert_eq!(config.label(Category::D), "Novelty");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "base_score: 100";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.min_rating.is_none());
        assert!(config.max_rating.is_none());
        assert!(config.strict.is_none());
        assert!(config.labels.is_none());
    }
}
