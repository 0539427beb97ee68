//! Host curve store interface.
//!
//! The host owns curves, selection, and the undo stack. Key indices are only
//! stable within one read/compute/write cycle: any insert may renumber the
//! keys after it, so callers compute every new sample before issuing writes
//! that change a curve's length and never mix read-by-index with inserts in
//! the same pass.

use std::ops::{Deref, DerefMut};

use log::warn;

use crate::curve::{KeySample, SelectedKey};
use crate::error::StoreError;
use crate::ids::{CurveId, ObjectId};
use crate::tangent::TangentInfo;

/// Trait implemented by hosts (or [`MemoryCurveStore`](crate::MemoryCurveStore)).
pub trait CurveStore {
    /// All keys of a curve in time order.
    fn query_keyframes(&self, curve: CurveId) -> Result<Vec<KeySample>, StoreError>;

    /// Selected keys of a curve in time order, with their indices.
    fn query_selected_keyframes(&self, curve: CurveId) -> Result<Vec<SelectedKey>, StoreError>;

    fn query_tangent(&self, curve: CurveId, index: usize) -> Result<TangentInfo, StoreError>;

    /// Insert a key at `time`, or update the value of the key already there.
    fn set_keyframe(&mut self, curve: CurveId, time: f64, value: f64) -> Result<(), StoreError>;

    fn set_tangent(
        &mut self,
        curve: CurveId,
        index: usize,
        tangent: TangentInfo,
    ) -> Result<(), StoreError>;

    fn set_value_at(&mut self, curve: CurveId, index: usize, value: f64)
        -> Result<(), StoreError>;

    /// Move a key in time. Fails with [`StoreError::OrderingViolation`] when the
    /// new time would coincide with or cross a neighbouring key.
    fn set_time_at(&mut self, curve: CurveId, index: usize, time: f64) -> Result<(), StoreError>;

    fn list_animated_channels_of(&self, object: ObjectId) -> Result<Vec<CurveId>, StoreError>;

    /// Selected objects in selection order.
    fn list_selected_objects(&self) -> Vec<ObjectId>;

    /// Curves that currently have at least one selected key.
    fn curves_with_selected_keys(&self) -> Vec<CurveId>;

    /// Open an undo group. Groups nest; only the outermost close commits.
    fn open_undo_group(&mut self);

    fn close_undo_group(&mut self) -> Result<(), StoreError>;

    /// Human-readable curve name for log messages.
    fn curve_name(&self, curve: CurveId) -> String {
        curve.to_string()
    }

    /// Current time/value of a single key.
    fn key_at(&self, curve: CurveId, index: usize) -> Result<KeySample, StoreError> {
        let keys = self.query_keyframes(curve)?;
        let len = keys.len();
        keys.get(index)
            .copied()
            .ok_or(StoreError::IndexOutOfRange { curve, index, len })
    }
}

/// Scoped undo group over a store. Dereferences to the store so writes go
/// through the guard; the group closes on [`UndoGroup::close`] or on drop.
pub struct UndoGroup<'a, S: CurveStore + ?Sized> {
    store: &'a mut S,
    open: bool,
}

impl<'a, S: CurveStore + ?Sized> UndoGroup<'a, S> {
    pub fn open(store: &'a mut S) -> Self {
        store.open_undo_group();
        Self { store, open: true }
    }

    /// Close the group, reporting a host failure instead of swallowing it.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.open = false;
        self.store.close_undo_group()
    }
}

impl<S: CurveStore + ?Sized> Deref for UndoGroup<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.store
    }
}

impl<S: CurveStore + ?Sized> DerefMut for UndoGroup<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.store
    }
}

impl<S: CurveStore + ?Sized> Drop for UndoGroup<'_, S> {
    fn drop(&mut self) {
        if self.open {
            if let Err(err) = self.store.close_undo_group() {
                warn!("failed to close undo group: {err}");
            }
        }
    }
}
