pub mod automation;
pub mod error;
pub mod pointer;
pub mod screen;
pub mod template_matching;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use automation::{ActionConfig, LocateAndClick, LocateOutcome, RetryPolicy, RetryingLocator};
pub use error::{AutomationError, AutomationResult, ConfigError, WorkflowError};
pub use workflow::{RunReport, Workflow, WorkflowRunner};
