//! Step files
//!
//! A step file declares the steps of a system under test without their
//! actions, which is enough to enumerate and plan scenarios:
//!
//! ```yaml
//! config:
//!   max_loop: 2
//! steps:
//!   - name: Closed
//!     start: true
//!     previous: [Open]
//!   - name: Open
//!     previous: [Closed]
//!     checks:
//!       - name: test_open
//!         condition: !not
//!           !contains [Open, Closed, Open]
//! ```
//!
//! In YAML, predicates are written with tags (`!contains`, `!newer`, `!not`,
//! `!and`, `!or`); in JSON as single-key objects.

use crate::error::{CliError, CliResult};
use gentest_core::Predicate;
use gentest_scenario::{Check, GenerationConfig, Input, RegistryError, StepDef, StepRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parsed step file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFile {
    /// Generation settings
    #[serde(default)]
    pub config: GenerationConfig,
    /// Declared steps, in registration order
    pub steps: Vec<StepSpec>,
}

/// Declared step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Step name
    pub name: String,
    /// Whether this is the start step
    #[serde(default)]
    pub start: bool,
    /// Steps that may directly precede this one
    #[serde(default)]
    pub previous: Vec<String>,
    /// Declared inputs
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
    /// Declared checks
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

/// Declared input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Steps this input may follow; the step's own by default
    #[serde(default)]
    pub previous_steps: Option<Vec<String>>,
}

/// Declared check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Check name
    pub name: String,
    /// Only apply right after one of these steps
    #[serde(default)]
    pub previous_steps: Option<Vec<String>>,
    /// Only apply when this matches the steps executed so far
    #[serde(default)]
    pub condition: Option<Predicate<String>>,
}

impl StepFile {
    /// Load a step file, choosing the format by extension
    ///
    /// # Errors
    /// Fails when the file cannot be read, has an unknown extension or does
    /// not parse.
    pub fn load(path: &Path) -> CliResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&source)?,
            Some("json") => Self::from_json(&source)?,
            _ => {
                return Err(CliError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        debug!(path = %path.display(), steps = file.steps.len(), "step file loaded");
        Ok(file)
    }

    /// Parse YAML source
    ///
    /// # Errors
    /// Fails on malformed YAML or a document of the wrong shape.
    pub fn from_yaml(source: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parse JSON source
    ///
    /// # Errors
    /// Fails on malformed JSON or a document of the wrong shape.
    pub fn from_json(source: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Register every declared step, with actions that do nothing
    ///
    /// # Errors
    /// Fails on duplicate names or more than one start step.
    pub fn registry(&self) -> Result<StepRegistry<()>, RegistryError> {
        let mut registry = StepRegistry::new();
        for spec in &self.steps {
            registry.register(spec.to_step())?;
        }
        Ok(registry)
    }
}

impl StepSpec {
    /// Step definition with no-op actions
    #[must_use]
    pub fn to_step(&self) -> StepDef<()> {
        let mut builder = StepDef::builder(self.name.clone()).previous(self.previous.clone());
        if self.start {
            builder = builder.start();
        }
        for input in &self.inputs {
            let mut declared = Input::new(|_: &mut ()| Ok(()));
            if let Some(previous) = &input.previous_steps {
                declared = declared.after(previous.clone());
            }
            builder = builder.input(declared);
        }
        for check in &self.checks {
            let mut declared = Check::new(check.name.clone(), |_: &mut ()| Ok(()));
            if let Some(previous) = &check.previous_steps {
                declared = declared.after(previous.clone());
            }
            if let Some(condition) = &check.condition {
                declared = declared.when(condition.clone());
            }
            builder = builder.check(declared);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gentest_core::LoopBudget;

    const DOOR: &str = r"
config:
  max_loop: 2
  filters:
    - !contains [Closed, Open]
steps:
  - name: Closed
    start: true
    previous: [Open]
    inputs:
      - previous_steps: [Open]
  - name: Open
    previous: [Closed]
    inputs:
      - {}
    checks:
      - name: test_open
      - name: test_reopened
        condition: !newer { older: Closed, newer: Open }
";

    #[test]
    fn parses_yaml() {
        let file = StepFile::from_yaml(DOOR).unwrap();
        assert_eq!(file.config.max_loop, LoopBudget::new(2));
        assert_eq!(file.config.log_level, "info");
        assert_eq!(file.config.filters.len(), 1);
        assert_eq!(file.steps.len(), 2);
        assert!(file.steps[0].start);
        assert_eq!(file.steps[1].inputs, vec![InputSpec::default()]);
        assert_eq!(
            file.steps[1].checks[1].condition,
            Some(Predicate::newer("Closed".to_string(), "Open".to_string()))
        );
    }

    #[test]
    fn missing_config_uses_defaults() {
        let file = StepFile::from_json(r#"{"steps": [{"name": "A", "start": true}]}"#).unwrap();
        assert_eq!(file.config, GenerationConfig::default());
        assert!(file.steps[0].previous.is_empty());
    }

    #[test]
    fn registry_carries_members() {
        let registry = StepFile::from_yaml(DOOR).unwrap().registry().unwrap();
        assert_eq!(registry.start().unwrap(), "Closed");
        let open = registry.get("Open").unwrap();
        assert_eq!(open.inputs().len(), 1);
        assert_eq!(open.inputs()[0].previous_steps(), &["Closed".to_string()]);
        assert!(open.check("test_reopened").unwrap().condition().is_some());
    }

    #[test]
    fn duplicate_step_rejected() {
        let file = StepFile::from_json(r#"{"steps": [{"name": "A"}, {"name": "A"}]}"#).unwrap();
        assert!(matches!(
            file.registry(),
            Err(RegistryError::DuplicateStep { .. })
        ));
    }
}
