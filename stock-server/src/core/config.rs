//! Server configuration
//!
//! All settings come from environment variables with sensible defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | BACKEND_URL | (unset) | hosted table API base URL; unset = in-memory store |
//! | BACKEND_API_KEY | (empty) | API key for the hosted backend |
//! | LOG_DIR | (unset) | daily-rolling log file directory |
//! | POLICY_FILE | (unset) | JSON file overriding the engine policy |
//! | FAILURE_POLICY | continue_all | continue_all \| abort_on_first |

use serde::{Deserialize, Serialize};
use shared::models::CategoryVocabulary;
use shared::normalize_name;

/// What the orchestrator does when a line item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep processing remaining items and accumulate errors (default). A
    /// partial deduction for unrelated products is still operationally
    /// valuable and reversible.
    ContinueAll,
    /// Stop at the first failed line item.
    AbortOnFirst,
}

/// Engine policy knobs: failure handling, packaging naming convention, and
/// the per-category Mix & Match vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginePolicy {
    #[serde(default = "default_failure_policy")]
    pub failure_policy: FailurePolicy,
    /// An ingredient whose name contains one of these is packaging.
    #[serde(default = "default_packaging_keywords")]
    pub packaging_keywords: Vec<String>,
    #[serde(default = "default_vocabularies")]
    pub vocabularies: Vec<CategoryVocabulary>,
    /// Actor recorded on engine-written movement rows.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl EnginePolicy {
    pub fn vocabulary_for(&self, category: &str) -> Option<&CategoryVocabulary> {
        let normalized = normalize_name(category);
        self.vocabularies
            .iter()
            .find(|v| normalize_name(&v.category) == normalized)
    }
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            failure_policy: default_failure_policy(),
            packaging_keywords: default_packaging_keywords(),
            vocabularies: default_vocabularies(),
            actor: default_actor(),
        }
    }
}

fn default_failure_policy() -> FailurePolicy {
    FailurePolicy::ContinueAll
}

fn default_actor() -> String {
    "stock-engine".to_string()
}

fn default_packaging_keywords() -> Vec<String> {
    [
        "box", "bag", "cup", "lid", "stick", "wax paper", "wrapper", "tissue",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_vocabularies() -> Vec<CategoryVocabulary> {
    vec![
        CategoryVocabulary {
            category: "mini_croffle".to_string(),
            is_composite: true,
            choices: [
                "Choco Flakes",
                "Chocolate Sauce",
                "Caramel Sauce",
                "Tiramisu",
                "Colored Sprinkles",
                "Marshmallow",
                "Peanut",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            choice_portion: 0.5,
        },
        CategoryVocabulary {
            category: "croffle_overload".to_string(),
            is_composite: true,
            choices: [
                "Choco Flakes",
                "Marshmallow",
                "Peanut",
                "Colored Sprinkles",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            choice_portion: 1.0,
        },
        CategoryVocabulary {
            category: "classic".to_string(),
            is_composite: false,
            choices: Vec::new(),
            choice_portion: 0.5,
        },
    ]
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Hosted table API base URL; `None` selects the in-memory store.
    pub backend_url: Option<String>,
    /// API key for the hosted backend
    pub backend_api_key: String,
    /// Optional log file directory
    pub log_dir: Option<String>,
    /// Engine policy
    pub policy: EnginePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut policy = match std::env::var("POLICY_FILE") {
            Ok(path) => load_policy_file(&path),
            Err(_) => EnginePolicy::default(),
        };
        if let Ok(raw) = std::env::var("FAILURE_POLICY") {
            match raw.as_str() {
                "continue_all" => policy.failure_policy = FailurePolicy::ContinueAll,
                "abort_on_first" => policy.failure_policy = FailurePolicy::AbortOnFirst,
                other => tracing::warn!(value = other, "unknown FAILURE_POLICY, keeping default"),
            }
        }

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            backend_url: std::env::var("BACKEND_URL").ok().filter(|v| !v.is_empty()),
            backend_api_key: std::env::var("BACKEND_API_KEY").unwrap_or_default(),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            policy,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn load_policy_file(path: &str) -> EnginePolicy {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(policy) => policy,
            Err(e) => {
                tracing::warn!(path, error = %e, "invalid POLICY_FILE, using defaults");
                EnginePolicy::default()
            }
        },
        Err(e) => {
            tracing::warn!(path, error = %e, "cannot read POLICY_FILE, using defaults");
            EnginePolicy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_lookup_is_case_insensitive() {
        let policy = EnginePolicy::default();
        assert!(policy.vocabulary_for("Mini_Croffle").is_some());
        assert!(policy.vocabulary_for("espresso").is_none());
    }

    #[test]
    fn test_default_policy_continues_on_failure() {
        let policy = EnginePolicy::default();
        assert_eq!(policy.failure_policy, FailurePolicy::ContinueAll);
    }
}
