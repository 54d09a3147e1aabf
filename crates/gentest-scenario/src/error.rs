//! Error types for step registration, planning and execution

use gentest_core::WalkError;

/// Errors raised while registering steps or enumerating their scenarios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two steps share a name
    #[error("step '{name}' is already registered")]
    DuplicateStep {
        /// Conflicting name
        name: String,
    },

    /// More than one step is flagged as the start step
    #[error("steps '{first}' and '{second}' are both start steps; only one start step is allowed")]
    MultipleStartSteps {
        /// Start step registered first
        first: String,
        /// Start step that was rejected
        second: String,
    },

    /// No step is flagged as the start step
    #[error("no start step registered; flag exactly one step as start")]
    MissingStart,

    /// The walk over the step graph failed
    #[error("walk failed: {0}")]
    Walk(#[from] WalkError),
}

/// Errors raised while planning scenarios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Enumerating scenarios failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A filter mentions a step that is not registered
    #[error("filter '{filter}' mentions unknown step '{step}'")]
    UnknownFilterStep {
        /// Rendered filter
        filter: String,
        /// Unregistered step
        step: String,
    },
}

impl From<WalkError> for PlanError {
    fn from(err: WalkError) -> Self {
        Self::Registry(RegistryError::Walk(err))
    }
}

/// Errors raised while executing a planned scenario
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// The plan names a step the registry does not know
    #[error("scenario '{scenario}' references unknown step '{step}'")]
    UnknownStep {
        /// Scenario name
        scenario: String,
        /// Missing step
        step: String,
    },

    /// The plan selects an input or check the step does not declare
    #[error("step '{step}' has no member '{member}'")]
    UnknownMember {
        /// Step name
        step: String,
        /// Missing input index or check name
        member: String,
    },
}

/// Failure reported by an input or check action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StepFailure {
    message: String,
}

impl StepFailure {
    /// Create failure with a message
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Failure message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for StepFailure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for StepFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Fail with `message` unless `condition` holds
///
/// # Errors
/// Returns [`StepFailure`] carrying `message` when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), StepFailure> {
    if condition {
        Ok(())
    } else {
        Err(StepFailure::new(message))
    }
}
