//! Comparison settings

use log::{debug, warn};

/// Environment variable overriding [`DEFAULT_MAX_DISTANCE`]
pub const MAX_DISTANCE_ENV: &str = "IAM_ROLE_DIFF_MAX_DISTANCE";

/// Default edit-distance ceiling below which two statements of the same service are paired
pub const DEFAULT_MAX_DISTANCE: usize = 100;

/// Settings for one comparison run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Two statements only match when their serialized edit distance is strictly below this
    pub max_distance: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl DiffConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults on missing or non-integer values.
    ///
    /// The value is taken verbatim, so surrounding whitespace makes it invalid.
    /// A zero or negative ceiling is accepted and disables pairing entirely.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_distance = match lookup(MAX_DISTANCE_ENV) {
            None => DEFAULT_MAX_DISTANCE,
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) if value <= 0 => {
                    debug!("{MAX_DISTANCE_ENV} is {value}, no statements will be paired");
                    0
                }
                Ok(value) => usize::try_from(value).unwrap_or(usize::MAX),
                Err(e) => {
                    warn!(
                        "{MAX_DISTANCE_ENV} '{raw}' is not an integer ({e}), using default {DEFAULT_MAX_DISTANCE}"
                    );
                    DEFAULT_MAX_DISTANCE
                }
            },
        };
        Self { max_distance }
    }

    #[must_use]
    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }
}
