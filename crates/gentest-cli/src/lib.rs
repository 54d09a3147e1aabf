//! gentest CLI - scenario generation from step files
//!
//! Library half of the `gentest` binary: step file loading, logging setup
//! and the text/JSON rendering behind each subcommand.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;
pub mod document;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use commands::{parse_contains, parse_newer, GraphSummary, Overrides};
pub use document::{CheckSpec, InputSpec, StepFile, StepSpec};
pub use error::{CliError, CliResult};
pub use logging::init_logging;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
