use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Severity weights keyed by permission or risk-flag identifier.
///
/// Built once at startup and shared read-only between requests. A key that is
/// absent weighs zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    weights: HashMap<String, u32>,
}

/// Startup failure while reading or validating the rule table.
#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("risk rules file {path} could not be read: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("risk rules are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("risk rules must be a JSON object mapping identifiers to weights")]
    NotAnObject,
    #[error("risk rules contain an empty identifier")]
    EmptyKey,
    #[error("weight for '{key}' must be a non-negative integer (found {found})")]
    InvalidWeight { key: String, found: String },
}

impl RuleTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RuleTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RuleTableError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(entries) = value else {
            return Err(RuleTableError::NotAnObject);
        };

        let mut weights = HashMap::with_capacity(entries.len());
        for (key, weight) in entries {
            if key.trim().is_empty() {
                return Err(RuleTableError::EmptyKey);
            }

            let parsed = weight
                .as_u64()
                .and_then(|value| u32::try_from(value).ok())
                .ok_or_else(|| RuleTableError::InvalidWeight {
                    key: key.clone(),
                    found: weight.to_string(),
                })?;
            weights.insert(key, parsed);
        }

        Ok(Self { weights })
    }

    pub fn from_weights<K: Into<String>>(weights: impl IntoIterator<Item = (K, u32)>) -> Self {
        Self {
            weights: weights
                .into_iter()
                .map(|(key, weight)| (key.into(), weight))
                .collect(),
        }
    }

    pub fn weight(&self, key: &str) -> Option<u32> {
        self.weights.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
