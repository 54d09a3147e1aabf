//! gentest Scenario - step-based scenario tests
//!
//! Describes a system under test as named steps, then:
//! - Registers them and derives the step graph from their preceding steps
//! - Enumerates every scenario through that graph under a loop budget
//! - Plans which input and which checks run at each position
//! - Runs the plans against a fresh context per scenario and reports failures
//!
//! # Example
//!
//! ```rust
//! use gentest_scenario::{ensure, plan, Check, GenerationConfig, Input, ScenarioRunner, StepDef, StepRegistry};
//!
//! let mut registry = StepRegistry::new();
//! registry.register(
//!     StepDef::builder("Empty")
//!         .start()
//!         .input(Input::new(|items: &mut Vec<u32>| {
//!             items.clear();
//!             Ok(())
//!         }))
//!         .build(),
//! )?;
//! registry.register(
//!     StepDef::builder("Filled")
//!         .previous(["Empty", "Filled"])
//!         .input(Input::new(|items: &mut Vec<u32>| {
//!             items.push(1);
//!             Ok(())
//!         }))
//!         .check(Check::new("test_not_empty", |items: &mut Vec<u32>| {
//!             ensure(!items.is_empty(), "no items")
//!         }))
//!         .build(),
//! )?;
//!
//! let scenarios = plan(&registry, &GenerationConfig::default())?;
//! assert_eq!(scenarios[0].name, "EmptyFilledFilled");
//!
//! let suite = ScenarioRunner::new(&registry, Vec::new).run_all(&scenarios)?;
//! assert!(suite.passed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod plan;
pub mod registry;
pub mod runner;
pub mod step;

// Re-exports for convenience
pub use config::{GenerationConfig, LogFormat};
pub use error::{ensure, PlanError, RegistryError, ScenarioError, StepFailure};
pub use plan::{method_name, plan, plan_path, PlannedStep, Scenario};
pub use registry::StepRegistry;
pub use runner::{
    CheckReport, Failure, Outcome, ScenarioReport, ScenarioRunner, StepReport, SuiteReport,
};
pub use step::{Action, Check, Input, Member, StepBuilder, StepDef};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing step-based scenarios
    pub use crate::{
        ensure, plan, Check, GenerationConfig, Input, Scenario, ScenarioRunner, StepDef,
        StepFailure, StepRegistry, SuiteReport,
    };
    pub use gentest_core::{LoopBudget, Predicate};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
