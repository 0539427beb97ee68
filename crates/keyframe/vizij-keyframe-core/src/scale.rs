//! Pivot scaling of keys in time or value.
//!
//! Each call reads the curve's current state, so repeated calls with
//! incremental factors compound: scaling by `a` and then by `b` lands where a
//! single `a * b` would, as long as no time write was refused.
//!
//! Target enumeration:
//! - `Pivot::First`: pivot is the first selected key, targets run forward
//!   (selected keys, or every key up to the curve's end).
//! - `Pivot::Last`: pivot is the last selected key, targets run backward
//!   (selected keys, or every key down to the curve's start).
//!
//! The enumeration always starts at the pivot, which is skipped, so the pivot
//! itself is never rewritten. On the time axis the host refuses moves that
//! would collide with or cross a neighbour; those keys are skipped and the
//! rest of the pass continues, which makes the result depend on enumeration
//! order.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::curve::SelectedKey;
use crate::error::{CurveError, StoreError};
use crate::ids::CurveId;
use crate::store::{CurveStore, UndoGroup};

/// Which end of the selection supplies the pivot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    #[default]
    First,
    Last,
}

/// Which coordinate of each key is transformed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Time,
    #[default]
    Value,
}

/// Whether targets are the selected keys or everything up to the curve bound.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    SelectedOnly,
    /// From the pivot to the curve's end (First) or start (Last).
    ExtendToBound,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleParams {
    pub pivot: Pivot,
    pub axis: Axis,
    pub selection: SelectionMode,
    pub factor: f64,
}

impl ScaleParams {
    pub fn new(factor: f64) -> Self {
        Self {
            pivot: Pivot::default(),
            axis: Axis::default(),
            selection: SelectionMode::default(),
            factor,
        }
    }

    pub fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }
}

/// Pivot coordinates and the enumerated key indices, pivot first.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalePlan {
    pub time_pivot: f64,
    pub value_pivot: f64,
    pub indices: Vec<usize>,
}

impl ScalePlan {
    /// Indices that get rewritten: everything after the pivot entry.
    pub fn targets(&self) -> &[usize] {
        self.indices.get(1..).unwrap_or(&[])
    }
}

/// Derive the pivot and target order from the current selection.
///
/// `key_count` is the curve length and is only consulted for
/// [`SelectionMode::ExtendToBound`]. Returns `None` without a selection.
pub fn plan_scale(
    selected: &[SelectedKey],
    key_count: usize,
    pivot: Pivot,
    selection: SelectionMode,
) -> Option<ScalePlan> {
    let (first, last) = (selected.first()?, selected.last()?);
    let plan = match pivot {
        Pivot::First => ScalePlan {
            time_pivot: first.time,
            value_pivot: first.value,
            indices: match selection {
                SelectionMode::SelectedOnly => selected.iter().map(|k| k.index).collect(),
                SelectionMode::ExtendToBound => (first.index..key_count).collect(),
            },
        },
        Pivot::Last => ScalePlan {
            time_pivot: last.time,
            value_pivot: last.value,
            indices: match selection {
                SelectionMode::SelectedOnly => selected.iter().rev().map(|k| k.index).collect(),
                SelectionMode::ExtendToBound => (0..=last.index).rev().collect(),
            },
        },
    };
    Some(plan)
}

/// `(x - pivot) * factor + pivot`
#[inline]
pub fn scale_about(x: f64, pivot: f64, factor: f64) -> f64 {
    (x - pivot) * factor + pivot
}

/// Per-curve result of a scale pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleOutcome {
    pub curve: CurveId,
    /// Indices rewritten, in enumeration order.
    pub applied: Vec<usize>,
    /// Indices whose time write was refused by the host.
    pub skipped: Vec<usize>,
}

/// Summary of a scale pass over every curve with selected keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleReport {
    pub curves: Vec<ScaleOutcome>,
}

impl ScaleReport {
    pub fn applied_count(&self) -> usize {
        self.curves.iter().map(|c| c.applied.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.curves.iter().map(|c| c.skipped.len()).sum()
    }
}

fn check_factor(factor: f64) -> Result<(), CurveError> {
    if factor.is_finite() {
        Ok(())
    } else {
        Err(CurveError::InvalidFactor { factor })
    }
}

/// Scale one curve around its pivot key, reading live state from the store.
pub fn scale_curve<S: CurveStore + ?Sized>(
    store: &mut S,
    curve: CurveId,
    params: &ScaleParams,
) -> Result<ScaleOutcome, CurveError> {
    check_factor(params.factor)?;
    let selected = store.query_selected_keyframes(curve)?;
    let key_count = store.query_keyframes(curve)?.len();

    let mut outcome = ScaleOutcome {
        curve,
        applied: Vec::new(),
        skipped: Vec::new(),
    };
    let Some(plan) = plan_scale(&selected, key_count, params.pivot, params.selection) else {
        debug!("{}: no selected keys, nothing to scale", store.curve_name(curve));
        return Ok(outcome);
    };

    for &index in plan.targets() {
        // Re-read per key: earlier writes in this pass may have moved neighbours.
        let key = store.key_at(curve, index)?;
        let written = match params.axis {
            Axis::Value => store.set_value_at(
                curve,
                index,
                scale_about(key.value, plan.value_pivot, params.factor),
            ),
            Axis::Time => store.set_time_at(
                curve,
                index,
                scale_about(key.time, plan.time_pivot, params.factor),
            ),
        };
        match written {
            Ok(()) => outcome.applied.push(index),
            Err(StoreError::OrderingViolation { time, .. }) => {
                debug!(
                    "{}: key {index} cannot move to t={time}, skipped",
                    store.curve_name(curve)
                );
                outcome.skipped.push(index);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(outcome)
}

/// Scale every curve that has selected keys, in one undo group.
pub fn scale_selected_curves<S: CurveStore + ?Sized>(
    store: &mut S,
    params: &ScaleParams,
) -> Result<ScaleReport, CurveError> {
    check_factor(params.factor)?;
    let curves = store.curves_with_selected_keys();
    if curves.is_empty() {
        warn!("Please select at least one animation curve.");
        return Err(CurveError::NoSelection {
            what: "at least one animation curve",
        });
    }

    let mut report = ScaleReport::default();
    let mut group = UndoGroup::open(store);
    for curve in curves {
        report.curves.push(scale_curve(&mut *group, curve, params)?);
    }
    group.close()?;
    Ok(report)
}
