// Workflow runner: walks the step list and drives LocateAndClick
use super::step::{ClickStep, OnFailure, Step, Workflow};
use crate::automation::events::{AutomationEvent, EventSink, LogSink};
use crate::automation::sleep::{Sleeper, ThreadSleeper, secs};
use crate::automation::{ActionConfig, LocateAndClick};
use crate::pointer::PointerDevice;
use crate::screen::ScreenCapturer;
use std::path::Path;
use std::sync::Arc;

/// Tally of one workflow run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Click steps (or their alternates) that found and clicked their target
    pub performed: u32,
    /// Click steps that found nothing
    pub missed: u32,
    /// A top-level `abort` step ended the run early
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Abort,
}

pub struct WorkflowRunner<C, D> {
    action: LocateAndClick<C, D>,
    sleeper: Arc<dyn Sleeper>,
    sink: Arc<dyn EventSink>,
}

impl<C: ScreenCapturer, D: PointerDevice> WorkflowRunner<C, D> {
    pub fn new(capturer: C, device: D) -> Self {
        Self::with_hooks(capturer, device, Arc::new(ThreadSleeper), Arc::new(LogSink))
    }

    pub fn with_hooks(
        capturer: C,
        device: D,
        sleeper: Arc<dyn Sleeper>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            action: LocateAndClick::with_hooks(capturer, device, sleeper.clone(), sink.clone()),
            sleeper,
            sink,
        }
    }

    pub fn action(&self) -> &LocateAndClick<C, D> {
        &self.action
    }

    /// Run every step in order. Missing elements never stop the run unless a
    /// top-level step says `abort`.
    pub fn run(&mut self, workflow: &Workflow) -> RunReport {
        let mut report = RunReport::default();
        self.sleeper.sleep(secs(workflow.start_delay_secs));

        let flow = self.run_steps(workflow, &workflow.steps, &workflow.name, &mut report);
        report.aborted = flow == Flow::Abort;

        self.sink.emit(AutomationEvent::WorkflowFinished {
            name: workflow.name.clone(),
            performed: report.performed,
            missed: report.missed,
        });
        report
    }

    fn run_steps(
        &mut self,
        workflow: &Workflow,
        steps: &[Step],
        group: &str,
        report: &mut RunReport,
    ) -> Flow {
        for step in steps {
            match step {
                Step::Wait(wait) => self.sleeper.sleep(secs(wait.wait_secs)),
                Step::Group(inner) => {
                    self.sink.emit(AutomationEvent::StepStarted {
                        step: format!("[{}]", inner.group),
                    });
                    // An abort inside a group only ends that group
                    self.run_steps(workflow, &inner.steps, &inner.group, report);
                }
                Step::Click(click) => {
                    if self.run_click(workflow, click, report) == Flow::Abort {
                        self.sink.emit(AutomationEvent::GroupAborted {
                            group: group.to_string(),
                            step: click.display_name(),
                        });
                        return Flow::Abort;
                    }
                }
            }
        }
        Flow::Continue
    }

    fn run_click(&mut self, workflow: &Workflow, step: &ClickStep, report: &mut RunReport) -> Flow {
        let name = step.display_name();
        let config = match workflow.action_config(step) {
            Ok(config) => config,
            Err(e) => {
                self.sink.emit(AutomationEvent::StepInvalid {
                    step: name,
                    description: e.to_string(),
                });
                report.missed += 1;
                return Flow::Continue;
            }
        };

        self.sink.emit(AutomationEvent::StepStarted { step: name.clone() });
        if self.click_template(workflow, &step.click, &config) {
            report.performed += 1;
            return Flow::Continue;
        }

        match &step.on_failure {
            OnFailure::Skip => {
                report.missed += 1;
                self.sink.emit(AutomationEvent::StepMissed { step: name });
                Flow::Continue
            }
            OnFailure::Alternate(alternate) => {
                if self.click_template(workflow, alternate, &config) {
                    report.performed += 1;
                } else {
                    report.missed += 1;
                    self.sink.emit(AutomationEvent::StepMissed { step: name });
                }
                Flow::Continue
            }
            OnFailure::Abort => {
                report.missed += 1;
                Flow::Abort
            }
        }
    }

    fn click_template(
        &mut self,
        workflow: &Workflow,
        template: &Path,
        config: &ActionConfig,
    ) -> bool {
        self.action
            .perform_with(&workflow.template_path(template), config)
    }
}
