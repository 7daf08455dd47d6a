// Structured automation events and the sinks that receive them
use crate::error::FaultKind;
use crate::template_matching::Point;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum AutomationEvent {
    ScreenCaptured {
        width: u32,
        height: u32,
        attempt: u32,
    },
    MatchScored {
        template: PathBuf,
        confidence: f32,
        threshold: f32,
    },
    MatchFound {
        template: PathBuf,
        point: Point,
        confidence: f32,
        attempt: u32,
    },
    MatchMissed {
        template: PathBuf,
        attempt: u32,
        max_attempts: u32,
    },
    MatchFaulted {
        template: PathBuf,
        description: String,
    },
    RetriesExhausted {
        template: PathBuf,
        attempts: u32,
    },
    LocateAborted {
        template: PathBuf,
        kind: FaultKind,
        description: String,
    },
    ClickIssued {
        point: Point,
        clicks: u32,
    },
    ClickFailed {
        point: Point,
        description: String,
    },
    StepStarted {
        step: String,
    },
    StepMissed {
        step: String,
    },
    StepInvalid {
        step: String,
        description: String,
    },
    GroupAborted {
        group: String,
        step: String,
    },
    WorkflowFinished {
        name: String,
        performed: u32,
        missed: u32,
    },
}

impl AutomationEvent {
    /// Severity the event is logged at.
    pub fn level(&self) -> log::Level {
        use AutomationEvent::*;
        match self {
            ScreenCaptured { .. } | MatchScored { .. } => log::Level::Debug,
            MatchFound { .. } | ClickIssued { .. } | StepStarted { .. } | WorkflowFinished { .. } => {
                log::Level::Info
            }
            MatchMissed { .. } | MatchFaulted { .. } | StepMissed { .. } | GroupAborted { .. } => {
                log::Level::Warn
            }
            RetriesExhausted { .. }
            | LocateAborted { .. }
            | ClickFailed { .. }
            | StepInvalid { .. } => log::Level::Error,
        }
    }
}

impl fmt::Display for AutomationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AutomationEvent::*;
        match self {
            ScreenCaptured {
                width,
                height,
                attempt,
            } => write!(f, "📸 Captured {width}x{height} screen (attempt {attempt})"),
            MatchScored {
                template,
                confidence,
                threshold,
            } => write!(
                f,
                "🔍 Best score for {}: {confidence:.3} (threshold {threshold:.2})",
                template.display()
            ),
            MatchFound {
                template,
                point,
                confidence,
                attempt,
            } => write!(
                f,
                "✅ Matched {} at ({},{}) conf={confidence:.3} (attempt {attempt})",
                template.display(),
                point.x,
                point.y
            ),
            MatchMissed {
                template,
                attempt,
                max_attempts,
            } => write!(
                f,
                "👀 No match for {} (attempt {attempt}/{max_attempts})",
                template.display()
            ),
            MatchFaulted {
                template,
                description,
            } => write!(f, "⚠️ Matching {} faulted: {description}", template.display()),
            RetriesExhausted { template, attempts } => write!(
                f,
                "❌ Gave up on {} after {attempts} attempts",
                template.display()
            ),
            LocateAborted {
                template,
                kind,
                description,
            } => write!(
                f,
                "❌ Locating {} aborted ({kind:?}): {description}",
                template.display()
            ),
            ClickIssued { point, clicks } => {
                write!(f, "🎯 Clicked ({},{}) x{clicks}", point.x, point.y)
            }
            ClickFailed { point, description } => {
                write!(f, "❌ Click at ({},{}) failed: {description}", point.x, point.y)
            }
            StepStarted { step } => write!(f, "▶️ {step}"),
            StepMissed { step } => write!(f, "⏭️ {step} not found, skipping"),
            StepInvalid { step, description } => {
                write!(f, "❌ Step '{step}' has invalid settings: {description}")
            }
            GroupAborted { group, step } => {
                write!(f, "⏹️ {step} not found, leaving '{group}'")
            }
            WorkflowFinished {
                name,
                performed,
                missed,
            } => write!(
                f,
                "🏁 Workflow '{name}' finished: {performed} performed, {missed} missed"
            ),
        }
    }
}

/// Receiver for automation events. Injected into every component so tests can
/// observe decisions without a global logger.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AutomationEvent);
}

/// Forwards events to the `log` facade at their own severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: AutomationEvent) {
        log::log!(target: "desktop_autoclick", event.level(), "{event}");
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: AutomationEvent) {}
}
