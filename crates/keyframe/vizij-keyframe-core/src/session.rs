//! A scale gesture: dial + toggles + store.
//!
//! `press` opens an undo group and `release` closes it, so a whole drag (or a
//! typed edit) undoes as one step on the host. Each dial change runs the
//! scaler once with the emitted factor against the current curve state.

use log::warn;

use crate::config::Config;
use crate::dial::ScaleDial;
use crate::error::CurveError;
use crate::scale::{scale_selected_curves, Axis, Pivot, ScaleParams, ScaleReport, SelectionMode};
use crate::store::CurveStore;

pub struct ScaleSession<'s, S: CurveStore + ?Sized> {
    store: &'s mut S,
    dial: ScaleDial,
    pivot: Pivot,
    axis: Axis,
    selection: SelectionMode,
    group_open: bool,
}

impl<'s, S: CurveStore + ?Sized> ScaleSession<'s, S> {
    pub fn new(store: &'s mut S, config: &Config) -> Self {
        Self {
            store,
            dial: ScaleDial::new(config.dial.clone()),
            pivot: config.default_pivot,
            axis: config.default_axis,
            selection: config.default_selection,
            group_open: false,
        }
    }

    pub fn dial(&self) -> &ScaleDial {
        &self.dial
    }

    /// Speed/exponential toggles live on the dial.
    pub fn dial_mut(&mut self) -> &mut ScaleDial {
        &mut self.dial
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    pub fn pivot(&self) -> Pivot {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: Pivot) {
        self.pivot = pivot;
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn selection(&self) -> SelectionMode {
        self.selection
    }

    pub fn set_selection(&mut self, selection: SelectionMode) {
        self.selection = selection;
    }

    fn params(&self, factor: f64) -> ScaleParams {
        ScaleParams {
            pivot: self.pivot,
            axis: self.axis,
            selection: self.selection,
            factor,
        }
    }

    fn apply(&mut self, factor: f64) -> Result<ScaleReport, CurveError> {
        let params = self.params(factor);
        scale_selected_curves(&mut *self.store, &params)
    }

    /// Start a gesture at pointer position `x`.
    pub fn press(&mut self, x: f64) {
        if !self.group_open {
            self.store.open_undo_group();
            self.group_open = true;
        }
        self.dial.begin_drag(x);
    }

    /// Pointer moved during a gesture. `Ok(None)` when no drag is in progress.
    pub fn drag_to(&mut self, x: f64) -> Result<Option<ScaleReport>, CurveError> {
        match self.dial.drag_to(x) {
            Some(factor) => self.apply(factor).map(Some),
            None => Ok(None),
        }
    }

    /// End the gesture and commit its undo group. Safe to call twice.
    pub fn release(&mut self) -> Result<(), CurveError> {
        self.dial.end_drag();
        if self.group_open {
            self.group_open = false;
            self.store.close_undo_group()?;
        }
        Ok(())
    }

    /// A value typed into the field. Outside a gesture the edit gets its own
    /// undo group. `Ok(None)` when the value was rejected.
    pub fn type_value(&mut self, value: f64) -> Result<Option<ScaleReport>, CurveError> {
        let Some(factor) = self.dial.set_value(value) else {
            return Ok(None);
        };
        if self.group_open {
            return self.apply(factor).map(Some);
        }
        self.store.open_undo_group();
        let applied = self.apply(factor);
        self.store.close_undo_group()?;
        applied.map(Some)
    }
}

impl<S: CurveStore + ?Sized> Drop for ScaleSession<'_, S> {
    fn drop(&mut self) {
        if self.group_open {
            if let Err(err) = self.store.close_undo_group() {
                warn!("scale session left an undo group open: {err}");
            }
        }
    }
}
