use super::config::ScoringConfig;
use crate::model::{Category, Score};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(min) = config.min_rating {
        if !min.is_finite() {
            errors.push("scoring.min_rating: must be a finite number".to_string());
        }
    }

    if let Some(max) = config.max_rating {
        if !max.is_finite() {
            errors.push("scoring.max_rating: must be a finite number".to_string());
        }
    }

    let (min, max) = config.rating_bounds();
    if min.is_finite() && max.is_finite() && min >= max {
        errors.push(format!(
            "scoring: min_rating ({}) must be lower than max_rating ({})",
            min, max
        ));
    }

    if let Some(ref labels) = config.labels {
        for category in Category::ALL {
            if labels.get(category).trim().is_empty() {
                errors.push(format!(
                    "scoring.labels.{}: must not be empty",
                    category.key()
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a submitted score before it reaches the store.
///
/// Identifiers must be non-empty. With `strict` on, every rating must be a
/// finite number inside the configured scale. The aggregation engine never
/// calls this.
pub fn validate_score(score: &Score, config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if score.project_id.trim().is_empty() {
        errors.push("score.projectId: must not be empty".to_string());
    }
    if score.judge_id.trim().is_empty() {
        errors.push("score.judgeId: must not be empty".to_string());
    }

    if config.is_strict() {
        let (min, max) = config.rating_bounds();
        for category in Category::ALL {
            let value = score.rating(category);
            let label = config.label(category);
            if !value.is_finite() {
                errors.push(format!("{}: rating must be a number, got {}", label, value));
            } else if value < min || value > max {
                errors.push(format!(
                    "{}: rating {} is outside {}-{}",
                    label, value, min, max
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::CategoryLabels;

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            min_rating: None,
            max_rating: None,
            strict: None,
            labels: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_inverted_bounds() {
        let config = ScoringConfig {
            min_rating: Some(10.0),
            max_rating: Some(1.0),
            strict: None,
            labels: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("min_rating"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            min_rating: Some(f64::NAN),
            max_rating: None,
            strict: None,
            labels: Some(CategoryLabels {
                a: "Feasibility".to_string(),
                b: " ".to_string(),
                c: "Team".to_string(),
                d: String::new(),
            }),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("scoring.min_rating"));
        assert!(errors[1].contains("scoring.labels.b"));
        assert!(errors[2].contains("scoring.labels.d"));
    }

    #[test]
    fn test_score_in_range_is_valid() {
        let score = Score::new("p1", "j1", [1.0, 10.0, 5.5, 7.0]);
        assert!(validate_score(&score, &ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let score = Score::new("p1", "j1", [0.0, 11.0, 5.0, 5.0]);
        let errors = validate_score(&score, &ScoringConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Feasibility"));
        assert!(errors[1].starts_with("Potential"));
    }

    #[test]
    fn test_score_non_finite_rejected() {
        let score = Score::new("p1", "j1", [f64::NAN, 5.0, f64::INFINITY, 5.0]);
        let errors = validate_score(&score, &ScoringConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("must be a number"));
    }

    #[test]
    fn test_relaxed_config_accepts_any_rating() {
        let config = ScoringConfig {
            strict: Some(false),
            ..ScoringConfig::default()
        };
        let score = Score::new("p1", "j1", [-4.0, 99.0, f64::NAN, 5.0]);
        assert!(validate_score(&score, &config).is_ok());
    }

    #[test]
    fn test_missing_ids_rejected_even_when_relaxed() {
        let config = ScoringConfig {
            strict: Some(false),
            ..ScoringConfig::default()
        };
        let score = Score::new("", " ", [5.0; 4]);
        let errors = validate_score(&score, &config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("projectId"));
        assert!(errors[1].contains("judgeId"));
    }
}
