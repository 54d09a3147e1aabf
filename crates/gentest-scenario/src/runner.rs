//! Scenario execution
//!
//! [`ScenarioRunner`] plays planned scenarios against a fresh context per
//! scenario. A failing input marks its step failed and skips the step's
//! checks; every other failure is recorded and the run continues.

use crate::error::ScenarioError;
use crate::plan::{PlannedStep, Scenario};
use crate::registry::StepRegistry;
use crate::step::StepDef;
use tracing::{info, warn};

/// Result of one input or check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Ran and succeeded
    Passed,
    /// Ran and failed with a message
    Failed(String),
    /// Not run
    Skipped,
}

impl Outcome {
    /// Whether this is a failure
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Check name
    pub name: String,
    /// Outcome
    pub outcome: Outcome,
}

/// Outcome of one planned position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Test method name
    pub method_name: String,
    /// Step name
    pub step: String,
    /// Outcome of the selected input; skipped when none was selected
    pub input: Outcome,
    /// Outcomes of the applicable checks
    pub checks: Vec<CheckReport>,
}

impl StepReport {
    /// Whether neither the input nor any check failed
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.input.is_failed() && !self.checks.iter().any(|c| c.outcome.is_failed())
    }
}

/// A single recorded failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Test method the failure belongs to
    pub method_name: String,
    /// `input` or the failing check's name
    pub member: String,
    /// Failure message
    pub message: String,
}

/// Report for one scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: String,
    /// Per-position reports
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Check if every step passed
    pub fn passed(&self) -> bool {
        self.steps.iter().all(StepReport::passed)
    }

    /// Every failure, in execution order
    pub fn failures(&self) -> Vec<Failure> {
        let mut failures = Vec::new();
        for step in &self.steps {
            if let Outcome::Failed(message) = &step.input {
                failures.push(Failure {
                    method_name: step.method_name.clone(),
                    member: "input".to_string(),
                    message: message.clone(),
                });
            }
            for check in &step.checks {
                if let Outcome::Failed(message) = &check.outcome {
                    failures.push(Failure {
                        method_name: step.method_name.clone(),
                        member: check.name.clone(),
                        message: message.clone(),
                    });
                }
            }
        }
        failures
    }

    /// Generate text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("=== Scenario {} ===\n", self.scenario));
        for step in &self.steps {
            let status = if step.passed() { "ok" } else { "FAILED" };
            report.push_str(&format!("{} ({}): {}\n", step.method_name, step.step, status));
        }

        let failures = self.failures();
        if !failures.is_empty() {
            report.push_str("\n--- Failures ---\n");
            for (i, f) in failures.iter().enumerate() {
                report.push_str(&format!("{}. {} [{}]: {}\n", i + 1, f.method_name, f.member, f.message));
            }
        }

        report.push_str(&format!("Result: {}\n", if self.passed() { "PASS" } else { "FAIL" }));
        report
    }
}

/// Aggregated report for a run of scenarios
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    /// Reports in run order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Check if every scenario passed
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }

    /// Number of failed scenarios
    pub fn failed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| !s.passed()).count()
    }

    /// Generate text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== gentest Suite Report ===\n\n");
        report.push_str(&format!("Scenarios: {}\n", self.scenarios.len()));
        report.push_str(&format!("Passed: {}\n", self.scenarios.len() - self.failed_count()));
        report.push_str(&format!("Failed: {}\n", self.failed_count()));

        for scenario in self.scenarios.iter().filter(|s| !s.passed()) {
            report.push('\n');
            report.push_str(&scenario.generate_text());
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));
        report
    }
}

/// Plays planned scenarios against registered steps
pub struct ScenarioRunner<'r, C> {
    registry: &'r StepRegistry<C>,
    setup: Box<dyn Fn() -> C + 'r>,
    teardown: Option<Box<dyn Fn(&mut C) + 'r>>,
}

impl<'r, C> ScenarioRunner<'r, C> {
    /// Create runner building each scenario's context with `setup`
    pub fn new(registry: &'r StepRegistry<C>, setup: impl Fn() -> C + 'r) -> Self {
        Self {
            registry,
            setup: Box::new(setup),
            teardown: None,
        }
    }

    /// With a hook run on the context after each scenario
    #[must_use]
    pub fn with_teardown(mut self, teardown: impl Fn(&mut C) + 'r) -> Self {
        self.teardown = Some(Box::new(teardown));
        self
    }

    /// Run one scenario
    ///
    /// # Errors
    /// Fails when the plan refers to a step, input or check the registry
    /// does not hold. Action failures are reported, not returned.
    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
        info!(scenario = %scenario.name, steps = scenario.len(), "running scenario");

        let mut context = (self.setup)();
        let mut steps = Vec::with_capacity(scenario.len());
        let mut outcome = Ok(());

        for planned in &scenario.steps {
            match self.run_step(&scenario.name, planned, &mut context) {
                Ok(report) => steps.push(report),
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        if let Some(teardown) = &self.teardown {
            teardown(&mut context);
        }
        outcome?;

        let report = ScenarioReport {
            scenario: scenario.name.clone(),
            steps,
        };
        if !report.passed() {
            warn!(
                scenario = %report.scenario,
                failures = report.failures().len(),
                "scenario failed"
            );
        }
        Ok(report)
    }

    /// Run every scenario in order
    ///
    /// # Errors
    /// See [`ScenarioRunner::run`].
    pub fn run_all<'s>(
        &self,
        scenarios: impl IntoIterator<Item = &'s Scenario>,
    ) -> Result<SuiteReport, ScenarioError> {
        let scenarios = scenarios
            .into_iter()
            .map(|scenario| self.run(scenario))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SuiteReport { scenarios })
    }

    fn run_step(
        &self,
        scenario: &str,
        planned: &PlannedStep,
        context: &mut C,
    ) -> Result<StepReport, ScenarioError> {
        let step = self
            .registry
            .get(&planned.step)
            .ok_or_else(|| ScenarioError::UnknownStep {
                scenario: scenario.to_string(),
                step: planned.step.clone(),
            })?;

        let input = match planned.input {
            Some(index) => {
                let input = step.inputs().get(index).ok_or_else(|| unknown_member(step, index))?;
                match input.run(context) {
                    Ok(()) => Outcome::Passed,
                    Err(failure) => {
                        warn!(method = %planned.method_name, error = %failure, "input failed");
                        Outcome::Failed(failure.message().to_string())
                    }
                }
            }
            None => Outcome::Skipped,
        };

        let mut checks = Vec::with_capacity(planned.checks.len());
        for name in &planned.checks {
            let check = step.check(name).ok_or_else(|| unknown_member(step, name))?;
            let outcome = if input.is_failed() {
                Outcome::Skipped
            } else {
                match check.run(context) {
                    Ok(()) => Outcome::Passed,
                    Err(failure) => {
                        warn!(
                            method = %planned.method_name,
                            check = %name,
                            error = %failure,
                            "check failed"
                        );
                        Outcome::Failed(failure.message().to_string())
                    }
                }
            };
            checks.push(CheckReport {
                name: name.clone(),
                outcome,
            });
        }

        Ok(StepReport {
            method_name: planned.method_name.clone(),
            step: planned.step.clone(),
            input,
            checks,
        })
    }
}

fn unknown_member<C>(step: &StepDef<C>, member: impl ToString) -> ScenarioError {
    ScenarioError::UnknownMember {
        step: step.name().to_string(),
        member: member.to_string(),
    }
}
