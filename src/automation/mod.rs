// Automation module
// Retrying template lookup and the locate-and-click composite that
// workflows are built from. Everything here is blocking and sequential.

pub mod action;
pub mod config;
pub mod events;
pub mod locator;
pub mod sleep;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export the main types and functions for easy access
pub use action::LocateAndClick;
pub use config::{ActionConfig, ActionOverrides, ClickSpec, RetryPolicy};
pub use events::{AutomationEvent, EventSink, LogSink, NullSink};
pub use locator::RetryingLocator;
pub use sleep::{Sleeper, ThreadSleeper};
pub use types::{LocateOutcome, LocateState};
