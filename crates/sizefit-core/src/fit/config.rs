//! Search configuration for the size fitter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper limit on steps per axis, so any accepted configuration stays cheap.
pub const MAX_STEPS_PER_AXIS: u32 = 100;

/// What to do when even the smallest attempt is over the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnattainablePolicy {
    /// Return the smallest candidate with `met_target = false`.
    #[default]
    BestEffort,
    /// Fail with `FitError::Unattainable`.
    Fail,
}

/// Errors reported by [`FitConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A value was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// A value was outside its allowed range.
    #[error("{field} = {value} is out of range ({range})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },

    /// A step is so small relative to its range that the search would be huge.
    #[error("{field} needs {steps} steps, more than the limit of {MAX_STEPS_PER_AXIS}")]
    TooManySteps { field: &'static str, steps: f64 },
}

/// Quality and scale schedule for the size search.
///
/// Defaults: quality from 0.9 down to 0.1 in steps of 0.1, then scale from
/// 1.0 down to 0.5 in steps of 0.1 with quality held at its floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitConfig {
    /// Quality of the first attempt (0.0 to 1.0)
    pub initial_quality: f64,
    /// Amount quality drops per attempt
    pub quality_step: f64,
    /// Lowest quality tried
    pub quality_floor: f64,
    /// Amount the scale factor drops per attempt once quality is at its floor
    pub scale_step: f64,
    /// Lowest scale factor tried (0.0 exclusive to 1.0)
    pub scale_floor: f64,
    /// Outcome when no attempt reaches the target
    pub unattainable: UnattainablePolicy,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            initial_quality: 0.9,
            quality_step: 0.1,
            quality_floor: 0.1,
            scale_step: 0.1,
            scale_floor: 0.5,
            unattainable: UnattainablePolicy::BestEffort,
        }
    }
}

impl FitConfig {
    /// Create a configuration with the default schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same schedule, failing instead of returning a best effort.
    pub fn strict(mut self) -> Self {
        self.unattainable = UnattainablePolicy::Fail;
        self
    }

    /// Check that the schedule is well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("initialQuality", self.initial_quality),
            ("qualityStep", self.quality_step),
            ("qualityFloor", self.quality_floor),
            ("scaleStep", self.scale_step),
            ("scaleFloor", self.scale_floor),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        in_range("initialQuality", self.initial_quality, 1.0, "(0, 1]")?;
        in_range(
            "qualityFloor",
            self.quality_floor,
            self.initial_quality,
            "(0, initialQuality]",
        )?;
        in_range("scaleFloor", self.scale_floor, 1.0, "(0, 1]")?;
        in_range("qualityStep", self.quality_step, 1.0, "(0, 1]")?;
        in_range("scaleStep", self.scale_step, 1.0, "(0, 1]")?;

        check_steps(
            "qualityStep",
            self.initial_quality - self.quality_floor,
            self.quality_step,
        )?;
        check_steps("scaleStep", 1.0 - self.scale_floor, self.scale_step)?;
        Ok(())
    }

    /// Number of quality reductions after the first attempt.
    pub fn quality_steps(&self) -> u32 {
        step_count(self.initial_quality - self.quality_floor, self.quality_step)
    }

    /// Number of scale reductions available.
    pub fn scale_steps(&self) -> u32 {
        step_count(1.0 - self.scale_floor, self.scale_step)
    }

    /// Quality for the k-th attempt on the quality axis.
    pub fn quality_at(&self, k: u32) -> f64 {
        tidy((self.initial_quality - k as f64 * self.quality_step).max(self.quality_floor))
    }

    /// Scale factor for the j-th step on the scale axis.
    pub fn scale_at(&self, j: u32) -> f64 {
        tidy((1.0 - j as f64 * self.scale_step).max(self.scale_floor))
    }

    /// Most encodes a single fit can perform: every quality, then every
    /// scale reduction at the quality floor.
    pub fn max_attempts(&self) -> u32 {
        self.quality_steps() + 1 + self.scale_steps()
    }
}

/// `(0, hi]` check.
fn in_range(field: &'static str, value: f64, hi: f64, range: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 && value <= hi {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, range })
    }
}

fn check_steps(field: &'static str, span: f64, step: f64) -> Result<(), ConfigError> {
    let steps = span / step;
    if steps > MAX_STEPS_PER_AXIS as f64 {
        return Err(ConfigError::TooManySteps { field, steps });
    }
    Ok(())
}

/// Steps needed to cover `span`, rounding up, but treating values within
/// float noise of an integer as that integer (0.8 / 0.1 is 8, not 9).
fn step_count(span: f64, step: f64) -> u32 {
    if span <= 0.0 || step <= 0.0 {
        return 0;
    }
    let raw = span / step;
    let nearest = raw.round();
    let steps = if (raw - nearest).abs() < 1e-9 {
        nearest
    } else {
        raw.ceil()
    };
    steps.clamp(0.0, MAX_STEPS_PER_AXIS as f64) as u32
}

/// Strip accumulated float noise (0.19999999999999996 -> 0.2).
fn tidy(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}
