//! Step definitions
//!
//! A [`StepDef`] names one state of the system under test, the steps that may
//! precede it, the inputs that drive the system into it and the checks run
//! once it is reached.
//!
//! Members are assembled through a [`MultiValueMap`] aliasing `input` to
//! `inputs`: every declared input accumulates, while declaring a check under
//! an existing name replaces the earlier one.

use crate::error::StepFailure;
use gentest_core::{MultiValueMap, Predicate};
use std::fmt;
use std::sync::Arc;

/// Member key every input is declared under
pub const INPUT_KEY: &str = "input";

/// Collector key inputs accumulate into
pub const INPUTS_KEY: &str = "inputs";

/// Action run against the scenario context
pub type Action<C> = Arc<dyn Fn(&mut C) -> Result<(), StepFailure> + Send + Sync>;

/// Action driving the system under test into a step
pub struct Input<C> {
    previous_steps: Option<Vec<String>>,
    action: Action<C>,
}

impl<C> Input<C> {
    /// Create input from an action
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), StepFailure> + Send + Sync + 'static,
    {
        Self {
            previous_steps: None,
            action: Arc::new(action),
        }
    }

    /// Restrict the input to scenarios arriving from one of `steps`
    #[must_use]
    pub fn after(mut self, steps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.previous_steps = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    /// Steps this input may follow, once resolved by [`StepBuilder::build`]
    #[inline]
    #[must_use]
    pub fn previous_steps(&self) -> &[String] {
        self.previous_steps.as_deref().unwrap_or(&[])
    }

    /// Run the action
    ///
    /// # Errors
    /// Propagates the action's failure.
    pub fn run(&self, context: &mut C) -> Result<(), StepFailure> {
        (self.action)(context)
    }
}

impl<C> Clone for Input<C> {
    fn clone(&self) -> Self {
        Self {
            previous_steps: self.previous_steps.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<C> fmt::Debug for Input<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("previous_steps", &self.previous_steps)
            .finish_non_exhaustive()
    }
}

/// Named assertion run after a step's input
pub struct Check<C> {
    name: String,
    previous_steps: Option<Vec<String>>,
    condition: Option<Predicate<String>>,
    action: Action<C>,
}

impl<C> Check<C> {
    /// Create check from a name and an action
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), StepFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            previous_steps: None,
            condition: None,
            action: Arc::new(action),
        }
    }

    /// Only run when the immediately preceding step is one of `steps`
    #[must_use]
    pub fn after(mut self, steps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.previous_steps = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    /// Only run when `condition` matches the steps executed so far
    #[must_use]
    pub fn when(mut self, condition: Predicate<String>) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Check name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Condition over executed steps, if any
    #[inline]
    #[must_use]
    pub fn condition(&self) -> Option<&Predicate<String>> {
        self.condition.as_ref()
    }

    /// Whether the check applies after `previous` steps were executed
    ///
    /// The step restriction is ignored at the very first step.
    #[must_use]
    pub fn applies(&self, previous: &[String]) -> bool {
        if let (Some(allowed), Some(last)) = (&self.previous_steps, previous.last()) {
            if !allowed.contains(last) {
                return false;
            }
        }
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.matches(previous))
    }

    /// Run the action
    ///
    /// # Errors
    /// Propagates the action's failure.
    pub fn run(&self, context: &mut C) -> Result<(), StepFailure> {
        (self.action)(context)
    }
}

impl<C> Clone for Check<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            previous_steps: self.previous_steps.clone(),
            condition: self.condition.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<C> fmt::Debug for Check<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("previous_steps", &self.previous_steps)
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

/// One declared member of a step
#[derive(Debug, Clone)]
pub enum Member<C> {
    /// Input action
    Input(Input<C>),
    /// Named check
    Check(Check<C>),
}

/// A registered step of a scenario
pub struct StepDef<C> {
    name: String,
    previous: Vec<String>,
    start: bool,
    inputs: Vec<Input<C>>,
    checks: Vec<Check<C>>,
}

impl<C> StepDef<C> {
    /// Start building a step
    #[must_use]
    pub fn builder(name: impl Into<String>) -> StepBuilder<C> {
        StepBuilder::new(name)
    }

    /// Step name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps that may directly precede this one
    #[inline]
    #[must_use]
    pub fn previous_steps(&self) -> &[String] {
        &self.previous
    }

    /// Whether this is the start step
    #[inline]
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.start
    }

    /// Inputs in declaration order
    #[inline]
    #[must_use]
    pub fn inputs(&self) -> &[Input<C>] {
        &self.inputs
    }

    /// Checks in name order
    #[inline]
    #[must_use]
    pub fn checks(&self) -> &[Check<C>] {
        &self.checks
    }

    /// Check by name
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&Check<C>> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Index of the input to run when arriving from `previous`
    ///
    /// A lone input is always selected. Otherwise the first input listing
    /// `previous` among its preceding steps wins.
    #[must_use]
    pub fn select_input(&self, previous: Option<&str>) -> Option<usize> {
        if self.inputs.len() == 1 {
            return Some(0);
        }
        let previous = previous?;
        self.inputs
            .iter()
            .position(|input| input.previous_steps().iter().any(|p| p == previous))
    }
}

impl<C> Clone for StepDef<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            previous: self.previous.clone(),
            start: self.start,
            inputs: self.inputs.clone(),
            checks: self.checks.clone(),
        }
    }
}

impl<C> fmt::Debug for StepDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDef")
            .field("name", &self.name)
            .field("previous", &self.previous)
            .field("start", &self.start)
            .field("inputs", &self.inputs)
            .field("checks", &self.checks)
            .finish()
    }
}

/// Builder for [`StepDef`]
pub struct StepBuilder<C> {
    name: String,
    previous: Vec<String>,
    start: bool,
    members: MultiValueMap<String, Member<C>>,
}

impl<C> StepBuilder<C> {
    /// Create builder for the step `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            previous: Vec::new(),
            start: false,
            members: MultiValueMap::new([(INPUT_KEY.to_string(), INPUTS_KEY.to_string())]),
        }
    }

    /// Declare the steps that may directly precede this one
    #[must_use]
    pub fn previous(mut self, steps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.previous = steps.into_iter().map(Into::into).collect();
        self
    }

    /// Flag as the start step
    #[must_use]
    pub fn start(mut self) -> Self {
        self.start = true;
        self
    }

    /// Declare a member under `key`
    ///
    /// `input` accumulates; any other key replaces what it held.
    #[must_use]
    pub fn member(mut self, key: impl Into<String>, member: Member<C>) -> Self {
        self.members.set(key.into(), member);
        self
    }

    /// Declare an input
    #[must_use]
    pub fn input(self, input: Input<C>) -> Self {
        self.member(INPUT_KEY, Member::Input(input))
    }

    /// Declare a check, replacing any check of the same name
    #[must_use]
    pub fn check(self, check: Check<C>) -> Self {
        let key = check.name.clone();
        self.member(key, Member::Check(check))
    }

    /// Finish the step
    ///
    /// Inputs without their own preceding steps inherit the step's.
    #[must_use]
    pub fn build(self) -> StepDef<C> {
        let mut inputs = Vec::new();
        let mut checks = Vec::new();

        for (_, slot) in self.members.into_entries() {
            for member in slot.into_values() {
                match member {
                    Member::Input(mut input) => {
                        if input.previous_steps.is_none() {
                            input.previous_steps = Some(self.previous.clone());
                        }
                        inputs.push(input);
                    }
                    Member::Check(check) => checks.push(check),
                }
            }
        }
        checks.sort_by(|a, b| a.name.cmp(&b.name));

        StepDef {
            name: self.name,
            previous: self.previous,
            start: self.start,
            inputs,
            checks,
        }
    }
}
