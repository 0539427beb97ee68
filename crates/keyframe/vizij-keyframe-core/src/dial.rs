//! Numeric state behind an interactive scale field.
//!
//! The field shows a running value starting at 1.0. Every change (typed or
//! dragged) emits a factor `new / previous`, which the scaler applies to the
//! curve's current state; the product of emitted factors therefore tracks the
//! displayed value.

use log::trace;

use crate::config::DialConfig;

const FALLBACK_STEP: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq)]
struct DragAnchor {
    value: f64,
    x: f64,
}

#[derive(Clone, Debug)]
pub struct ScaleDial {
    config: DialConfig,
    value: f64,
    last_factor: f64,
    speed: usize,
    exponential: bool,
    drag: Option<DragAnchor>,
}

impl Default for ScaleDial {
    fn default() -> Self {
        Self::new(DialConfig::default())
    }
}

impl ScaleDial {
    pub fn new(config: DialConfig) -> Self {
        let exponential = config.exponential;
        let mut dial = Self {
            value: 1.0,
            last_factor: 1.0,
            speed: 0,
            exponential,
            drag: None,
            config,
        };
        dial.value = dial.clamp(dial.config.initial_value);
        dial
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Factor emitted by the most recent change (1.0 before any change).
    #[inline]
    pub fn last_factor(&self) -> f64 {
        self.last_factor
    }

    /// Current step size.
    pub fn step(&self) -> f64 {
        self.config
            .speed_steps
            .get(self.speed)
            .copied()
            .unwrap_or(FALLBACK_STEP)
    }

    /// 1-based speed level, as shown on the speed toggle.
    #[inline]
    pub fn speed_level(&self) -> usize {
        self.speed + 1
    }

    /// Advance to the next speed level, wrapping back to the first.
    pub fn cycle_speed(&mut self) -> usize {
        let levels = self.config.speed_steps.len().max(1);
        self.speed = (self.speed + 1) % levels;
        self.speed_level()
    }

    #[inline]
    pub fn is_exponential(&self) -> bool {
        self.exponential
    }

    pub fn set_exponential(&mut self, exponential: bool) {
        self.exponential = exponential;
    }

    pub fn step_power(&self) -> f64 {
        if self.exponential {
            self.config.step_power
        } else {
            1.0
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        let value = match self.config.min {
            Some(min) => value.max(min),
            None => value,
        };
        match self.config.max {
            Some(max) => value.min(max),
            None => value,
        }
    }

    /// Replace the displayed value and return the factor to apply.
    ///
    /// The value is clamped first. If the previous value was zero the
    /// previous factor is emitted again. Non-finite input is ignored.
    pub fn set_value(&mut self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let new = self.clamp(value);
        let old = self.value;
        if old != 0.0 {
            self.last_factor = new / old;
        }
        self.value = new;
        trace!("dial {old} -> {new}, factor {}", self.last_factor);
        Some(self.last_factor)
    }

    pub fn begin_drag(&mut self, x: f64) {
        self.drag = Some(DragAnchor {
            value: self.value,
            x,
        });
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Map the pointer position to a new value and return the factor to apply.
    /// Returns `None` when no drag is in progress.
    pub fn drag_to(&mut self, x: f64) -> Option<f64> {
        let anchor = self.drag?;
        let step = self.step();
        let delta = (x - anchor.x) / self.config.drag_divisor * step;
        let raw = anchor.value + delta;
        let sign = if raw < 0.0 { -1.0 } else { 1.0 };
        let mut value = sign * raw.abs().powf(self.step_power());
        if value == 0.0 {
            value += step * sign;
        }
        self.set_value(value)
    }

    /// Finish the drag. Returns whether one was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn typed_values_emit_ratio_to_previous() {
        let mut dial = ScaleDial::default();
        assert_eq!(dial.value(), 1.0);
        assert_eq!(dial.set_value(2.0), Some(2.0));
        assert_eq!(dial.set_value(3.0), Some(1.5));
        assert_eq!(dial.value(), 3.0);
    }

    #[test]
    fn zero_previous_value_repeats_last_factor() {
        let mut dial = ScaleDial::default();
        assert_eq!(dial.set_value(4.0), Some(4.0));
        assert_eq!(dial.set_value(0.0), Some(0.0));
        assert_eq!(dial.set_value(5.0), Some(0.0));
        assert_eq!(dial.set_value(f64::NAN), None);
    }

    #[test]
    fn speed_levels_cycle() {
        let mut dial = ScaleDial::default();
        assert_eq!(dial.speed_level(), 1);
        assert_eq!(dial.step(), 0.1);
        assert_eq!(dial.cycle_speed(), 2);
        assert_eq!(dial.step(), 0.5);
        dial.cycle_speed();
        assert_eq!(dial.step(), 1.0);
        dial.cycle_speed();
        assert_eq!(dial.step(), 10.0);
        assert_eq!(dial.cycle_speed(), 1);
        assert_eq!(dial.step(), 0.1);
    }

    #[test]
    fn values_are_clamped() {
        let mut dial = ScaleDial::new(DialConfig {
            min: Some(0.5),
            max: Some(4.0),
            ..DialConfig::default()
        });
        assert_eq!(dial.set_value(10.0), Some(4.0));
        assert_eq!(dial.set_value(0.1), Some(0.125));
        assert_eq!(dial.value(), 0.5);
    }

    #[test]
    fn drag_landing_on_zero_is_nudged_by_one_step() {
        let mut dial = ScaleDial::new(DialConfig {
            exponential: false,
            ..DialConfig::default()
        });
        dial.begin_drag(0.0);
        // -60px / 6 * 0.1 = -1.0, so the raw value is exactly zero.
        let factor = dial.drag_to(-60.0).unwrap();
        assert_abs_diff_eq!(dial.value(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(factor, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn drag_past_zero_keeps_the_sign() {
        let mut dial = ScaleDial::new(DialConfig {
            exponential: false,
            ..DialConfig::default()
        });
        dial.begin_drag(0.0);
        dial.drag_to(-60.0).unwrap();
        let factor = dial.drag_to(-120.0).unwrap();
        assert_abs_diff_eq!(dial.value(), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(factor, -10.0, epsilon = 1e-9);

        let mut dial = ScaleDial::default();
        dial.begin_drag(0.0);
        let factor = dial.drag_to(-180.0).unwrap();
        let expected = -(2.0_f64.powf(1.2));
        assert_abs_diff_eq!(dial.value(), expected, epsilon = 1e-12);
        assert!(factor < 0.0);
    }

    #[test]
    fn drag_without_anchor_is_ignored() {
        let mut dial = ScaleDial::default();
        assert_eq!(dial.drag_to(100.0), None);
        assert!(!dial.end_drag());
    }
}
