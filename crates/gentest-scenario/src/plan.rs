//! Scenario planning
//!
//! Turns every walked path into a [`Scenario`]: one [`PlannedStep`] per
//! position, naming the input to run and the checks that apply given the
//! steps executed before it.

use crate::config::GenerationConfig;
use crate::error::PlanError;
use crate::registry::StepRegistry;
use gentest_core::StepPath;
use serde::Serialize;
use tracing::{debug, warn};

/// One position of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    /// Zero-based position in the scenario
    pub position: usize,
    /// Step name
    pub step: String,
    /// Test method name, e.g. `test_0002_statec`
    pub method_name: String,
    /// Steps executed before this one
    pub previous_steps: Vec<String>,
    /// Index of the selected input, if any
    pub input: Option<usize>,
    /// Names of the checks that apply, in run order
    pub checks: Vec<String>,
}

/// A planned scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Concatenated step names
    pub name: String,
    /// Walked path
    pub path: StepPath<String>,
    /// Planned positions
    pub steps: Vec<PlannedStep>,
}

impl Scenario {
    /// Number of planned positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing is planned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Test method name for the step at `position`
///
/// Only the last `.`-separated segment of the step name is kept, lowercased.
#[must_use]
pub fn method_name(position: usize, step: &str) -> String {
    let tail = step.rsplit('.').next().unwrap_or(step).to_lowercase();
    format!("test_{position:04}_{tail}")
}

/// Plan every scenario of `registry` that passes the configured filters
///
/// # Errors
/// - [`PlanError::UnknownFilterStep`] when a filter names an unregistered step
/// - [`PlanError::Registry`] when there is no start step or the walk fails
pub fn plan<C>(
    registry: &StepRegistry<C>,
    config: &GenerationConfig,
) -> Result<Vec<Scenario>, PlanError> {
    for filter in &config.filters {
        if let Some(step) = filter.labels().into_iter().find(|l| registry.get(l).is_none()) {
            return Err(PlanError::UnknownFilterStep {
                filter: filter.to_string(),
                step: step.clone(),
            });
        }
    }

    if config.max_loop.revisits() == 0 && registry.graph().is_cyclic() {
        warn!("step graph is cyclic but max_loop is 0; scenarios stop before any revisit");
    }

    let paths = match &config.start {
        Some(start) => registry.scenarios_from(start, config.max_loop)?,
        None => registry.scenarios(config.max_loop)?,
    };
    let walked = paths.len();

    let scenarios: Vec<Scenario> = paths
        .into_iter()
        .filter(|path| config.selects(path))
        .map(|path| plan_path(registry, path))
        .collect();

    debug!(
        walked,
        selected = scenarios.len(),
        max_loop = %config.max_loop,
        "scenarios planned"
    );
    Ok(scenarios)
}

/// Plan a single walked path
#[must_use]
pub fn plan_path<C>(registry: &StepRegistry<C>, path: StepPath<String>) -> Scenario {
    let mut steps = Vec::with_capacity(path.len());
    let mut previous: Vec<String> = Vec::new();

    for (position, name) in path.iter().enumerate() {
        let (input, checks) = registry.get(name).map_or((None, Vec::new()), |step| {
            let input = step.select_input(previous.last().map(String::as_str));
            let checks = step
                .checks()
                .iter()
                .filter(|check| check.applies(&previous))
                .map(|check| check.name().to_string())
                .collect();
            (input, checks)
        });

        steps.push(PlannedStep {
            position,
            step: name.clone(),
            method_name: method_name(position, name),
            previous_steps: previous.clone(),
            input,
            checks,
        });
        previous.push(name.clone());
    }

    Scenario {
        name: path.concat(),
        path,
        steps,
    }
}
