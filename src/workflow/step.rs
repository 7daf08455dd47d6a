//! Declarative workflow files
//!
//! A workflow is a TOML document with a `[defaults]` table and an ordered
//! `steps` array. Each step is a click, a wait, or a named group of steps.

use crate::automation::config::{ActionConfig, ActionOverrides};
use crate::error::WorkflowError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workflow {
    pub name: String,
    /// Directory template paths are resolved against
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    /// Pause before the first step
    #[serde(default = "default_start_delay")]
    pub start_delay_secs: f64,
    #[serde(default)]
    pub defaults: ActionOverrides,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_start_delay() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Click(ClickStep),
    Wait(WaitStep),
    Group(GroupStep),
}

/// Locate a template and click it.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickStep {
    /// Template file, relative to the workflow's template directory
    pub click: PathBuf,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub on_failure: OnFailure,
    #[serde(flatten)]
    pub settings: ActionOverrides,
    /// Keys no other field claimed; rejected by `Workflow::validate`
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitStep {
    pub wait_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupStep {
    pub group: String,
    pub steps: Vec<Step>,
}

/// What to do when a click step's template is not found.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnFailure {
    /// Log and move on
    #[default]
    Skip,
    /// Try another template with the same settings
    Alternate(PathBuf),
    /// Leave the enclosing group (the whole run at top level)
    Abort,
}

impl ClickStep {
    /// Name used in logs: the label, or the template file stem.
    pub fn display_name(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            self.click
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.click.display().to_string())
        })
    }
}

impl Workflow {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read, parse and validate a workflow file. A relative `template_dir`
    /// (or none at all) is taken relative to the file's own directory.
    pub fn load(path: &Path) -> Result<Self, WorkflowError> {
        let text = std::fs::read_to_string(path).map_err(|source| WorkflowError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut workflow = Self::from_toml_str(&text).map_err(|source| WorkflowError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        workflow.template_dir = Some(match workflow.template_dir.take() {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        });

        workflow.validate()?;
        Ok(workflow)
    }

    /// Resolve every click step's settings and reject misspelled keys so
    /// mistakes surface before the run starts.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        fn check(steps: &[Step], defaults: &ActionOverrides) -> Result<(), WorkflowError> {
            for step in steps {
                match step {
                    Step::Click(click) => {
                        if !click.unknown.is_empty() {
                            return Err(WorkflowError::UnknownKeys {
                                step: click.display_name(),
                                keys: click.unknown.keys().cloned().collect::<Vec<_>>().join(", "),
                            });
                        }
                        click.settings.over(defaults).resolve().map_err(|source| {
                            WorkflowError::InvalidStep {
                                step: click.display_name(),
                                source,
                            }
                        })?;
                    }
                    Step::Group(group) => check(&group.steps, defaults)?,
                    Step::Wait(_) => {}
                }
            }
            Ok(())
        }
        check(&self.steps, &self.defaults)
    }

    /// Settings for one click step with the workflow defaults underneath.
    pub fn action_config(&self, step: &ClickStep) -> Result<ActionConfig, crate::error::ConfigError> {
        step.settings.over(&self.defaults).resolve()
    }

    pub fn template_path(&self, template: &Path) -> PathBuf {
        match &self.template_dir {
            Some(dir) => dir.join(template),
            None => template.to_path_buf(),
        }
    }

    /// Number of click steps, counting inside groups.
    pub fn click_count(&self) -> usize {
        fn count(steps: &[Step]) -> usize {
            steps
                .iter()
                .map(|step| match step {
                    Step::Click(_) => 1,
                    Step::Group(group) => count(&group.steps),
                    Step::Wait(_) => 0,
                })
                .sum()
        }
        count(&self.steps)
    }
}
