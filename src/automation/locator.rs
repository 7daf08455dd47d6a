// Retrying locator: capture, match, wait, repeat
use super::config::RetryPolicy;
use super::events::{AutomationEvent, EventSink, LogSink};
use super::sleep::{Sleeper, ThreadSleeper};
use super::types::{LocateOutcome, LocateState};
use crate::screen::ScreenCapturer;
use crate::template_matching::{MatchResult, TemplateMatcher};
use std::path::Path;
use std::sync::Arc;

pub struct RetryingLocator<C> {
    capturer: C,
    matcher: TemplateMatcher,
    sleeper: Arc<dyn Sleeper>,
    sink: Arc<dyn EventSink>,
}

impl<C: ScreenCapturer> RetryingLocator<C> {
    pub fn new(capturer: C) -> Self {
        Self::with_hooks(capturer, Arc::new(ThreadSleeper), Arc::new(LogSink))
    }

    pub fn with_hooks(capturer: C, sleeper: Arc<dyn Sleeper>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            capturer,
            matcher: TemplateMatcher::with_sink(sink.clone()),
            sleeper,
            sink,
        }
    }

    pub fn capturer(&self) -> &C {
        &self.capturer
    }

    /// Look for `template` on fresh captures until it matches or the policy
    /// runs out of attempts. The template is re-read on every attempt.
    pub fn locate(&self, template: &Path, policy: &RetryPolicy) -> LocateOutcome {
        let mut state = LocateState::Attempting(1);
        let mut best = None;
        loop {
            state = match state {
                LocateState::Attempting(attempt) => {
                    self.attempt(template, policy, attempt, &mut best)
                }
                LocateState::Found { result, attempt } => {
                    return LocateOutcome::Found { result, attempt };
                }
                LocateState::Exhausted { attempts, best } => {
                    self.sink.emit(AutomationEvent::RetriesExhausted {
                        template: template.to_path_buf(),
                        attempts,
                    });
                    return LocateOutcome::Exhausted { attempts, best };
                }
                LocateState::Aborted(error) => {
                    self.sink.emit(AutomationEvent::LocateAborted {
                        template: template.to_path_buf(),
                        kind: error.kind(),
                        description: error.to_string(),
                    });
                    return LocateOutcome::Aborted(error);
                }
            };
        }
    }

    /// One capture+match cycle and the transition that follows it. `best`
    /// keeps the highest score seen across attempts.
    fn attempt(
        &self,
        template: &Path,
        policy: &RetryPolicy,
        attempt: u32,
        best: &mut Option<MatchResult>,
    ) -> LocateState {
        let screen = match self.capturer.capture() {
            Ok(screen) => screen,
            Err(e) => return LocateState::Aborted(e),
        };
        self.sink.emit(AutomationEvent::ScreenCaptured {
            width: screen.width(),
            height: screen.height(),
            attempt,
        });

        let scored = self
            .matcher
            .score(&screen, template, policy.threshold)
            .map(|scored| {
                if let Some(candidate) = scored {
                    if best.is_none_or(|b| candidate.confidence > b.confidence) {
                        *best = Some(candidate);
                    }
                }
                scored.filter(|result| result.confidence >= policy.threshold)
            });

        match scored {
            Ok(Some(result)) => {
                self.sink.emit(AutomationEvent::MatchFound {
                    template: template.to_path_buf(),
                    point: result.center(),
                    confidence: result.confidence,
                    attempt,
                });
                LocateState::Found { result, attempt }
            }
            Ok(None) => {
                self.sink.emit(AutomationEvent::MatchMissed {
                    template: template.to_path_buf(),
                    attempt,
                    max_attempts: policy.attempts(),
                });
                if attempt < policy.attempts() {
                    self.sleeper.sleep(policy.interval());
                    LocateState::Attempting(attempt + 1)
                } else {
                    LocateState::Exhausted {
                        attempts: attempt,
                        best: *best,
                    }
                }
            }
            Err(e) => LocateState::Aborted(e),
        }
    }
}
