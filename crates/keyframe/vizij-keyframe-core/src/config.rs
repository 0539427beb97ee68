//! Tool configuration for vizij-keyframe-core.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::scale::{Axis, Pivot, SelectionMode};

/// Configuration for the cycle and scale tools.
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial value for a host's loop-count field. The cycle functions take
    /// their count explicitly.
    pub default_loop_count: usize,
    pub dial: DialConfig,

    /// Initial toggle state of a scale session.
    pub default_pivot: Pivot,
    pub default_axis: Axis,
    pub default_selection: SelectionMode,
}

/// Numeric behaviour of the scale field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Step size per speed level; the level cycles through these in order.
    pub speed_steps: Vec<f64>,
    /// Exponent applied to dragged values while exponential response is on.
    pub step_power: f64,
    pub exponential: bool,
    /// Pointer distance (pixels) that maps to one step.
    pub drag_divisor: f64,
    pub initial_value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            speed_steps: vec![0.1, 0.5, 1.0, 10.0],
            step_power: 1.2,
            exponential: true,
            drag_divisor: 6.0,
            initial_value: 1.0,
            min: None,
            max: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_loop_count: 1,
            dial: DialConfig::default(),
            default_pivot: Pivot::First,
            default_axis: Axis::Value,
            default_selection: SelectionMode::SelectedOnly,
        }
    }
}

impl DialConfig {
    pub fn validate(&self) -> Result<(), CurveError> {
        let fail = |reason: &str| -> Result<(), CurveError> {
            Err(CurveError::Config {
                reason: reason.to_string(),
            })
        };
        if self.speed_steps.is_empty() {
            return fail("dial.speed_steps must not be empty");
        }
        if self
            .speed_steps
            .iter()
            .any(|s| !s.is_finite() || *s <= 0.0)
        {
            return fail("dial.speed_steps must be finite and > 0");
        }
        if !self.step_power.is_finite() || self.step_power < 1.0 {
            return fail("dial.step_power must be finite and >= 1");
        }
        if !self.drag_divisor.is_finite() || self.drag_divisor <= 0.0 {
            return fail("dial.drag_divisor must be finite and > 0");
        }
        if !self.initial_value.is_finite() {
            return fail("dial.initial_value must be finite");
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return fail("dial.min must not exceed dial.max");
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), CurveError> {
        self.dial.validate()
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, CurveError> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
