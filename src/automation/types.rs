// Types and enums for locating templates
use crate::error::AutomationError;
use crate::template_matching::{MatchResult, Point};

/// States of one locate run. `Found`, `Exhausted` and `Aborted` are terminal.
#[derive(Debug)]
pub enum LocateState {
    /// Capture and match, 1-based attempt number
    Attempting(u32),
    Found { result: MatchResult, attempt: u32 },
    Exhausted {
        attempts: u32,
        best: Option<MatchResult>,
    },
    Aborted(AutomationError),
}

/// Terminal state of a locate run, as handed to callers.
#[derive(Debug)]
pub enum LocateOutcome {
    Found { result: MatchResult, attempt: u32 },
    /// Every attempt ran and none reached the threshold. `best` is the
    /// highest scoring placement seen, for tuning thresholds.
    Exhausted {
        attempts: u32,
        best: Option<MatchResult>,
    },
    /// An infrastructure fault ended the run early
    Aborted(AutomationError),
}

impl LocateOutcome {
    /// Click point when found; exhausted and aborted both read as absent.
    pub fn point(&self) -> Option<Point> {
        match self {
            LocateOutcome::Found { result, .. } => Some(result.center()),
            LocateOutcome::Exhausted { .. } | LocateOutcome::Aborted(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LocateOutcome::Found { .. })
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        match self {
            LocateOutcome::Found { result, .. } => Some(result),
            _ => None,
        }
    }
}
