//! Subcommand implementations
//!
//! Each command renders its output to a `String`; printing is left to the
//! binary.

use crate::document::StepFile;
use crate::error::{CliError, CliResult};
use gentest_core::{Predicate, StepPath};
use gentest_scenario::{plan, GenerationConfig, Scenario, StepRegistry};
use serde::Serialize;

/// Command line settings layered over the step file's config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--max-loop`
    pub max_loop: Option<u32>,
    /// `--start`
    pub start: Option<String>,
    /// `--contains` and `--newer`, added to the file's filters
    pub filters: Vec<Predicate<String>>,
}

impl Overrides {
    /// Apply on top of `config`
    #[must_use]
    pub fn apply(self, mut config: GenerationConfig) -> GenerationConfig {
        if let Some(max_loop) = self.max_loop {
            config = config.with_max_loop(max_loop);
        }
        if let Some(start) = self.start {
            config = config.with_start(start);
        }
        config.filters.extend(self.filters);
        config
    }
}

/// Containment filter from a comma-separated run, e.g. `A,B`
#[must_use]
pub fn parse_contains(value: &str) -> Predicate<String> {
    Predicate::contains(split_steps(value))
}

/// Recency filter from `OLDER,NEWER`
///
/// # Errors
/// Fails unless exactly two steps are given.
pub fn parse_newer(value: &str) -> CliResult<Predicate<String>> {
    match split_steps(value).as_slice() {
        [older, newer] => Ok(Predicate::newer(older.clone(), newer.clone())),
        _ => Err(CliError::InvalidPair {
            flag: "newer",
            value: value.to_string(),
        }),
    }
}

fn split_steps(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Serialize)]
struct ScenarioLine<'a> {
    name: &'a str,
    path: &'a StepPath<String>,
}

fn planned(file: &StepFile, overrides: Overrides) -> CliResult<Vec<Scenario>> {
    let registry = file.registry()?;
    let config = overrides.apply(file.config.clone());
    Ok(plan(&registry, &config)?)
}

/// `gentest scenarios`: every selected scenario, one per line
///
/// # Errors
/// Fails when the steps are invalid or planning fails.
pub fn scenarios(file: &StepFile, overrides: Overrides, json: bool) -> CliResult<String> {
    let scenarios = planned(file, overrides)?;

    if json {
        let lines: Vec<ScenarioLine<'_>> = scenarios
            .iter()
            .map(|s| ScenarioLine {
                name: &s.name,
                path: &s.path,
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&lines)?);
    }

    let mut out = String::new();
    for scenario in &scenarios {
        out.push_str(&format!("{}\n", scenario.path));
    }
    out.push_str(&format!("{} scenario(s)\n", scenarios.len()));
    Ok(out)
}

/// `gentest plan`: the test methods of every selected scenario
///
/// # Errors
/// Fails when the steps are invalid or planning fails.
pub fn plan_text(file: &StepFile, overrides: Overrides, json: bool) -> CliResult<String> {
    let scenarios = planned(file, overrides)?;

    if json {
        return Ok(serde_json::to_string_pretty(&scenarios)?);
    }

    let mut out = String::new();
    for scenario in &scenarios {
        out.push_str(&format!("{}\n", scenario.name));
        for step in &scenario.steps {
            let input = step
                .input
                .map_or_else(|| "-".to_string(), |i| format!("#{i}"));
            out.push_str(&format!(
                "  {} [{}] input={} checks=[{}]\n",
                step.method_name,
                step.step,
                input,
                step.checks.join(", ")
            ));
        }
    }
    Ok(out)
}

/// Structural summary of the step graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Registered steps
    pub steps: usize,
    /// Edges between steps
    pub edges: usize,
    /// Start step, if declared
    pub start: Option<String>,
    /// Steps nothing precedes
    pub entry_nodes: Vec<String>,
    /// Steps nothing follows
    pub sinks: Vec<String>,
    /// Whether the graph has a cycle
    pub cyclic: bool,
    /// `(step, previous)` pairs naming an unregistered preceding step
    pub dangling: Vec<(String, String)>,
    /// Registered steps the start step cannot reach
    pub unreachable: Vec<String>,
}

impl GraphSummary {
    /// Summarize the graph of `registry`
    #[must_use]
    pub fn of<C>(registry: &StepRegistry<C>) -> Self {
        let graph = registry.graph();
        let start = registry.start().ok().map(str::to_string);

        let dangling = registry
            .steps()
            .flat_map(|step| {
                step.previous_steps()
                    .iter()
                    .filter(move |p| registry.get(p).is_none())
                    .map(move |p| (step.name().to_string(), p.clone()))
            })
            .collect();

        let unreachable = match &start {
            Some(start) => {
                let reachable = graph.reachable_from(start);
                registry
                    .steps()
                    .map(|s| s.name().to_string())
                    .filter(|name| !reachable.contains(&name))
                    .collect()
            }
            None => Vec::new(),
        };

        Self {
            steps: registry.len(),
            edges: graph.edge_count(),
            start,
            entry_nodes: graph.entry_nodes().into_iter().cloned().collect(),
            sinks: graph.sinks().into_iter().cloned().collect(),
            cyclic: graph.is_cyclic(),
            dangling,
            unreachable,
        }
    }

    /// Generate text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Steps: {}\n", self.steps));
        report.push_str(&format!("Edges: {}\n", self.edges));
        report.push_str(&format!("Start: {}\n", self.start.as_deref().unwrap_or("-")));
        report.push_str(&format!("Entry nodes: {}\n", self.entry_nodes.join(", ")));
        report.push_str(&format!("Sinks: {}\n", self.sinks.join(", ")));
        report.push_str(&format!("Cyclic: {}\n", if self.cyclic { "yes" } else { "no" }));
        for (step, previous) in &self.dangling {
            report.push_str(&format!("Dangling: {step} follows unknown step {previous}\n"));
        }
        if !self.unreachable.is_empty() {
            report.push_str(&format!("Unreachable: {}\n", self.unreachable.join(", ")));
        }
        report
    }
}

/// `gentest graph`: structure of the declared steps
///
/// # Errors
/// Fails when the steps are invalid.
pub fn graph(file: &StepFile, json: bool) -> CliResult<String> {
    let summary = GraphSummary::of(&file.registry()?);
    if json {
        return Ok(serde_json::to_string_pretty(&summary)?);
    }
    Ok(summary.generate_text())
}
