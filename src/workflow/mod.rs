// Workflow module
// TOML-described sequences of locate-and-click steps and the runner
// that executes them.

pub mod runner;
pub mod step;

pub use runner::{RunReport, WorkflowRunner};
pub use step::{ClickStep, GroupStep, OnFailure, Step, WaitStep, Workflow};
