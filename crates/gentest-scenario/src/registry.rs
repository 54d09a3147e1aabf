//! Registry of steps and the graph they form

use crate::error::RegistryError;
use crate::step::StepDef;
use gentest_core::{walk, LoopBudget, PathSet, StepGraph, WalkError};
use indexmap::IndexMap;
use tracing::debug;

/// Steps of one system under test, in registration order
pub struct StepRegistry<C> {
    steps: IndexMap<String, StepDef<C>>,
    start: Option<String>,
}

impl<C> StepRegistry<C> {
    /// Create empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: IndexMap::new(),
            start: None,
        }
    }

    /// Register a step
    ///
    /// # Errors
    /// Fails on a duplicate name or on a second start step; the registry is
    /// left unchanged.
    pub fn register(&mut self, step: StepDef<C>) -> Result<(), RegistryError> {
        if self.steps.contains_key(step.name()) {
            return Err(RegistryError::DuplicateStep {
                name: step.name().to_string(),
            });
        }
        if step.is_start() {
            if let Some(first) = &self.start {
                return Err(RegistryError::MultipleStartSteps {
                    first: first.clone(),
                    second: step.name().to_string(),
                });
            }
            self.start = Some(step.name().to_string());
        }

        debug!(
            step = step.name(),
            previous = ?step.previous_steps(),
            inputs = step.inputs().len(),
            checks = step.checks().len(),
            "step registered"
        );
        self.steps.insert(step.name().to_string(), step);
        Ok(())
    }

    /// Register a step, builder style
    ///
    /// # Errors
    /// See [`StepRegistry::register`].
    pub fn with_step(mut self, step: StepDef<C>) -> Result<Self, RegistryError> {
        self.register(step)?;
        Ok(self)
    }

    /// Name of the start step
    ///
    /// # Errors
    /// Fails when no step was flagged as start.
    pub fn start(&self) -> Result<&str, RegistryError> {
        self.start.as_deref().ok_or(RegistryError::MissingStart)
    }

    /// Step by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StepDef<C>> {
        self.steps.get(name)
    }

    /// Steps in registration order
    pub fn steps(&self) -> impl Iterator<Item = &StepDef<C>> {
        self.steps.values()
    }

    /// Number of registered steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Successor graph obtained by inverting every step's preceding steps
    ///
    /// Every registered step is a node. Successors are listed in registration
    /// order. A preceding step that was never registered still becomes a node.
    #[must_use]
    pub fn graph(&self) -> StepGraph<String> {
        let mut graph = StepGraph::new();
        for name in self.steps.keys() {
            graph.add_node(name.clone());
        }
        for step in self.steps.values() {
            for previous in step.previous_steps() {
                graph.add_edge(previous.clone(), step.name().to_string());
            }
        }
        graph
    }

    /// Every scenario from the start step under `budget`
    ///
    /// # Errors
    /// Fails without a start step, or when the walk fails.
    pub fn scenarios(&self, budget: LoopBudget) -> Result<PathSet<String>, RegistryError> {
        let start = self.start()?.to_string();
        self.scenarios_from(&start, budget)
    }

    /// Every scenario from `start` under `budget`
    ///
    /// # Errors
    /// Fails when `start` is not a registered step or the walk fails.
    pub fn scenarios_from(
        &self,
        start: &str,
        budget: LoopBudget,
    ) -> Result<PathSet<String>, RegistryError> {
        if !self.steps.contains_key(start) {
            return Err(WalkError::UnknownStart {
                start: start.to_string(),
            }
            .into());
        }
        Ok(walk(&self.graph(), &start.to_string(), budget)?)
    }
}

impl<C> Default for StepRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for StepRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .field("start", &self.start)
            .finish()
    }
}
