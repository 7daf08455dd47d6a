//! Retry, click and settle configuration for locate-and-click actions

use super::sleep::secs;
use crate::error::ConfigError;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

/// How hard the locator tries before giving up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Upper bound on capture+match cycles
    pub max_attempts: NonZeroU32,
    /// Pause after each failed attempt except the last
    pub interval_secs: f64,
    /// Minimum correlation accepted as a match
    pub threshold: f32,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);
    pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

    pub fn new(max_attempts: u32, interval_secs: f64, threshold: f32) -> Result<Self, ConfigError> {
        let policy = Self {
            max_attempts: NonZeroU32::new(max_attempts).ok_or(ConfigError::ZeroAttempts)?,
            interval_secs,
            threshold,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Three attempts one second apart; the threshold is always the caller's.
    pub fn with_threshold(threshold: f32) -> Result<Self, ConfigError> {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS.get(),
            Self::DEFAULT_INTERVAL_SECS,
            threshold,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.threshold,
            });
        }
        check_secs("interval_secs", self.interval_secs)
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    pub fn interval(&self) -> Duration {
        secs(self.interval_secs)
    }
}

/// How the pointer clicks a located element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSpec {
    pub clicks: u32,
    pub move_duration_secs: f64,
    pub click_interval_secs: f64,
}

impl Default for ClickSpec {
    fn default() -> Self {
        Self {
            clicks: 1,
            move_duration_secs: 0.3,
            click_interval_secs: 0.2,
        }
    }
}

impl ClickSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_secs("move_duration_secs", self.move_duration_secs)?;
        check_secs("click_interval_secs", self.click_interval_secs)
    }

    pub fn move_duration(&self) -> Duration {
        secs(self.move_duration_secs)
    }

    pub fn click_interval(&self) -> Duration {
        secs(self.click_interval_secs)
    }
}

/// Full parameter set of one locate-and-click call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionConfig {
    pub retry: RetryPolicy,
    pub click: ClickSpec,
    /// Pause after clicking so the UI can finish animating
    pub settle_secs: f64,
}

impl ActionConfig {
    pub const DEFAULT_SETTLE_SECS: f64 = 1.0;

    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            retry,
            click: ClickSpec::default(),
            settle_secs: Self::DEFAULT_SETTLE_SECS,
        }
    }

    pub fn settle(&self) -> Duration {
        secs(self.settle_secs)
    }
}

/// Optional settings as written in a workflow file, either in `[defaults]`
/// or on a single step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionOverrides {
    pub threshold: Option<f32>,
    pub max_attempts: Option<u32>,
    pub interval_secs: Option<f64>,
    pub clicks: Option<u32>,
    pub move_duration_secs: Option<f64>,
    pub click_interval_secs: Option<f64>,
    pub settle_secs: Option<f64>,
}

impl ActionOverrides {
    /// Layer `self` on top of `base`: fields set here win.
    pub fn over(&self, base: &ActionOverrides) -> ActionOverrides {
        ActionOverrides {
            threshold: self.threshold.or(base.threshold),
            max_attempts: self.max_attempts.or(base.max_attempts),
            interval_secs: self.interval_secs.or(base.interval_secs),
            clicks: self.clicks.or(base.clicks),
            move_duration_secs: self.move_duration_secs.or(base.move_duration_secs),
            click_interval_secs: self.click_interval_secs.or(base.click_interval_secs),
            settle_secs: self.settle_secs.or(base.settle_secs),
        }
    }

    /// Fill unset fields with defaults and validate. The threshold has no default.
    pub fn resolve(&self) -> Result<ActionConfig, ConfigError> {
        let threshold = self.threshold.ok_or(ConfigError::MissingThreshold)?;
        let retry = RetryPolicy::new(
            self.max_attempts
                .unwrap_or(RetryPolicy::DEFAULT_MAX_ATTEMPTS.get()),
            self.interval_secs
                .unwrap_or(RetryPolicy::DEFAULT_INTERVAL_SECS),
            threshold,
        )?;

        let defaults = ClickSpec::default();
        let click = ClickSpec {
            clicks: self.clicks.unwrap_or(defaults.clicks),
            move_duration_secs: self
                .move_duration_secs
                .unwrap_or(defaults.move_duration_secs),
            click_interval_secs: self
                .click_interval_secs
                .unwrap_or(defaults.click_interval_secs),
        };
        click.validate()?;

        let settle_secs = self
            .settle_secs
            .unwrap_or(ActionConfig::DEFAULT_SETTLE_SECS);
        check_secs("settle_secs", settle_secs)?;

        Ok(ActionConfig {
            retry,
            click,
            settle_secs,
        })
    }
}

fn check_secs(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSeconds { field, value })
    }
}
