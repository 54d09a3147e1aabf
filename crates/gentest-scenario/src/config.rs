//! Scenario generation configuration

use gentest_core::{LoopBudget, Predicate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for generating and selecting scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Revisits allowed per step
    pub max_loop: LoopBudget,
    /// Step to walk from instead of the registered start step
    pub start: Option<String>,
    /// Predicates every generated scenario must satisfy
    pub filters: Vec<Predicate<String>>,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_loop: LoopBudget::default(),
            start: None,
            filters: Vec::new(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl GenerationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With loop budget
    #[inline]
    #[must_use]
    pub fn with_max_loop(mut self, revisits: u32) -> Self {
        self.max_loop = LoopBudget::new(revisits);
        self
    }

    /// With start step override
    #[inline]
    #[must_use]
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// With an additional filter
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: Predicate<String>) -> Self {
        self.filters.push(filter);
        self
    }

    /// With log level
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// With log format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Whether `steps` passes every filter
    #[must_use]
    pub fn selects(&self, steps: &[String]) -> bool {
        Predicate::all_match(&self.filters, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.max_loop, LoopBudget::new(1));
        assert_eq!(config.start, None);
        assert!(config.filters.is_empty());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn no_filters_select_everything() {
        assert!(GenerationConfig::new().selects(&[]));
    }

    #[test]
    fn filters_all_apply() {
        let config = GenerationConfig::new()
            .with_filter(Predicate::contains(["A".to_string()]))
            .with_filter(Predicate::contains(["B".to_string()]).negate());
        let steps = |s: &[&str]| s.iter().map(|x| (*x).to_string()).collect::<Vec<_>>();
        assert!(config.selects(&steps(&["A", "C"])));
        assert!(!config.selects(&steps(&["A", "B"])));
        assert!(!config.selects(&steps(&["C"])));
    }
}
