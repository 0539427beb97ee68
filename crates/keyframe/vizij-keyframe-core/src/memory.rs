//! In-memory [`CurveStore`].
//!
//! Behaves like a host curve store: keys stay strictly ordered in time,
//! inserts renumber later keys (and shift key selection with them), and
//! writes are recorded for undo. Writes made outside an undo group each
//! become their own undo step; writes inside a group undo together.

use hashbrown::HashMap;
use log::{trace, warn};

use crate::curve::{KeySample, Keyframe, SelectedKey, TIME_EPSILON};
use crate::error::StoreError;
use crate::ids::{CurveId, IdAllocator, ObjectId};
use crate::store::CurveStore;
use crate::tangent::TangentInfo;

#[derive(Clone, Debug)]
struct ObjectRecord {
    name: String,
    channels: Vec<CurveId>,
}

#[derive(Clone, Debug)]
struct CurveRecord {
    object: ObjectId,
    attribute: String,
    keys: Vec<Keyframe>,
    /// Selected key indices, ascending.
    selected: Vec<usize>,
}

/// Saved curve contents for undo.
#[derive(Clone, Debug)]
struct CurveState {
    keys: Vec<Keyframe>,
    selected: Vec<usize>,
}

impl CurveRecord {
    fn state(&self) -> CurveState {
        CurveState {
            keys: self.keys.clone(),
            selected: self.selected.clone(),
        }
    }

    fn restore(&mut self, state: CurveState) {
        self.keys = state.keys;
        self.selected = state.selected;
    }

    fn check_index(&self, curve: CurveId, index: usize) -> Result<(), StoreError> {
        if index < self.keys.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                curve,
                index,
                len: self.keys.len(),
            })
        }
    }
}

type UndoStep = HashMap<CurveId, CurveState>;

#[derive(Debug, Default)]
pub struct MemoryCurveStore {
    ids: IdAllocator,
    objects: HashMap<ObjectId, ObjectRecord>,
    curves: HashMap<CurveId, CurveRecord>,
    selected_objects: Vec<ObjectId>,

    // Undo bookkeeping
    group_depth: usize,
    open_group: Option<UndoStep>,
    history: Vec<UndoStep>,
}

fn validate_keys(keys: &[Keyframe]) -> Result<(), StoreError> {
    for (index, key) in keys.iter().enumerate() {
        if !key.time.is_finite() || !key.value.is_finite() {
            return Err(StoreError::InvalidKeys {
                reason: format!("key {index} has a non-finite time or value"),
            });
        }
    }
    for (index, pair) in keys.windows(2).enumerate() {
        if pair[1].time - pair[0].time <= TIME_EPSILON {
            return Err(StoreError::InvalidKeys {
                reason: format!("key {} does not come strictly after key {index}", index + 1),
            });
        }
    }
    Ok(())
}

impl MemoryCurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object (controller) that can own animated channels.
    pub fn add_object(&mut self, name: impl Into<String>) -> ObjectId {
        let id = self.ids.alloc_object();
        self.objects.insert(
            id,
            ObjectRecord {
                name: name.into(),
                channels: Vec::new(),
            },
        );
        id
    }

    /// Attach a new curve to `object`. Keys must be finite and strictly ordered in time.
    pub fn add_curve(
        &mut self,
        object: ObjectId,
        attribute: impl Into<String>,
        keys: Vec<Keyframe>,
    ) -> Result<CurveId, StoreError> {
        if !self.objects.contains_key(&object) {
            return Err(StoreError::UnknownObject { object });
        }
        validate_keys(&keys)?;
        let id = self.ids.alloc_curve();
        self.curves.insert(
            id,
            CurveRecord {
                object,
                attribute: attribute.into(),
                keys,
                selected: Vec::new(),
            },
        );
        if let Some(record) = self.objects.get_mut(&object) {
            record.channels.push(id);
        }
        Ok(id)
    }

    /// Direct read access to a curve's keys.
    pub fn keyframes(&self, curve: CurveId) -> Option<&[Keyframe]> {
        self.curves.get(&curve).map(|c| c.keys.as_slice())
    }

    /// Replace the object selection.
    pub fn select_objects(&mut self, objects: impl IntoIterator<Item = ObjectId>) {
        self.selected_objects = objects.into_iter().collect();
    }

    /// Replace the key selection of one curve.
    pub fn select_keys(
        &mut self,
        curve: CurveId,
        indices: impl IntoIterator<Item = usize>,
    ) -> Result<(), StoreError> {
        let record = self
            .curves
            .get_mut(&curve)
            .ok_or(StoreError::UnknownCurve { curve })?;
        let mut selected: Vec<usize> = indices.into_iter().collect();
        selected.sort_unstable();
        selected.dedup();
        if let Some(&index) = selected.iter().find(|&&i| i >= record.keys.len()) {
            return Err(StoreError::IndexOutOfRange {
                curve,
                index,
                len: record.keys.len(),
            });
        }
        record.selected = selected;
        Ok(())
    }

    /// Deselect every key on every curve.
    pub fn clear_key_selection(&mut self) {
        for record in self.curves.values_mut() {
            record.selected.clear();
        }
    }

    /// Number of undo steps recorded.
    pub fn undo_len(&self) -> usize {
        self.history.len()
    }

    /// Revert the most recent undo step. Returns false when there is nothing
    /// to undo or a group is still open.
    pub fn undo(&mut self) -> bool {
        if self.group_depth > 0 {
            warn!("undo requested while an undo group is open");
            return false;
        }
        let Some(step) = self.history.pop() else {
            return false;
        };
        for (curve, state) in step {
            if let Some(record) = self.curves.get_mut(&curve) {
                record.restore(state);
            }
        }
        true
    }

    fn record(&self, curve: CurveId) -> Result<&CurveRecord, StoreError> {
        self.curves
            .get(&curve)
            .ok_or(StoreError::UnknownCurve { curve })
    }

    /// Mutable access to a curve for writing, saving its prior state for undo.
    fn touch(&mut self, curve: CurveId) -> Result<&mut CurveRecord, StoreError> {
        let record = self
            .curves
            .get_mut(&curve)
            .ok_or(StoreError::UnknownCurve { curve })?;
        match self.open_group.as_mut() {
            Some(group) => {
                if !group.contains_key(&curve) {
                    group.insert(curve, record.state());
                }
            }
            None => {
                let mut step = UndoStep::new();
                step.insert(curve, record.state());
                self.history.push(step);
            }
        }
        Ok(record)
    }
}

impl CurveStore for MemoryCurveStore {
    fn query_keyframes(&self, curve: CurveId) -> Result<Vec<KeySample>, StoreError> {
        Ok(self.record(curve)?.keys.iter().map(Keyframe::sample).collect())
    }

    fn query_selected_keyframes(&self, curve: CurveId) -> Result<Vec<SelectedKey>, StoreError> {
        let record = self.record(curve)?;
        Ok(record
            .selected
            .iter()
            .filter_map(|&index| {
                record.keys.get(index).map(|key| SelectedKey {
                    time: key.time,
                    value: key.value,
                    index,
                })
            })
            .collect())
    }

    fn query_tangent(&self, curve: CurveId, index: usize) -> Result<TangentInfo, StoreError> {
        let record = self.record(curve)?;
        record.check_index(curve, index)?;
        Ok(record.keys[index].tangent)
    }

    fn set_keyframe(&mut self, curve: CurveId, time: f64, value: f64) -> Result<(), StoreError> {
        if !time.is_finite() || !value.is_finite() {
            return Err(StoreError::Host {
                reason: format!("cannot key non-finite sample ({time}, {value})"),
            });
        }
        let record = self.touch(curve)?;
        let pos = record.keys.partition_point(|k| k.time < time - TIME_EPSILON);
        let exists = record
            .keys
            .get(pos)
            .is_some_and(|k| (k.time - time).abs() <= TIME_EPSILON);
        if exists {
            trace!("{curve}: update key {pos} at t={time} -> {value}");
            record.keys[pos].value = value;
        } else {
            trace!("{curve}: insert key {pos} at t={time} = {value}");
            record.keys.insert(pos, Keyframe::new(time, value));
            for index in record.selected.iter_mut().filter(|i| **i >= pos) {
                *index += 1;
            }
        }
        Ok(())
    }

    fn set_tangent(
        &mut self,
        curve: CurveId,
        index: usize,
        tangent: TangentInfo,
    ) -> Result<(), StoreError> {
        self.record(curve)?.check_index(curve, index)?;
        let record = self.touch(curve)?;
        record.keys[index].tangent = tangent;
        Ok(())
    }

    fn set_value_at(
        &mut self,
        curve: CurveId,
        index: usize,
        value: f64,
    ) -> Result<(), StoreError> {
        self.record(curve)?.check_index(curve, index)?;
        let record = self.touch(curve)?;
        record.keys[index].value = value;
        Ok(())
    }

    fn set_time_at(&mut self, curve: CurveId, index: usize, time: f64) -> Result<(), StoreError> {
        let existing = self.record(curve)?;
        existing.check_index(curve, index)?;
        let violation = StoreError::OrderingViolation { curve, index, time };
        if !time.is_finite() {
            return Err(violation);
        }
        if index > 0 && time - existing.keys[index - 1].time <= TIME_EPSILON {
            return Err(violation);
        }
        if let Some(next) = existing.keys.get(index + 1) {
            if next.time - time <= TIME_EPSILON {
                return Err(violation);
            }
        }
        let record = self.touch(curve)?;
        record.keys[index].time = time;
        Ok(())
    }

    fn list_animated_channels_of(&self, object: ObjectId) -> Result<Vec<CurveId>, StoreError> {
        self.objects
            .get(&object)
            .map(|o| o.channels.clone())
            .ok_or(StoreError::UnknownObject { object })
    }

    fn list_selected_objects(&self) -> Vec<ObjectId> {
        self.selected_objects.clone()
    }

    fn curves_with_selected_keys(&self) -> Vec<CurveId> {
        let mut curves: Vec<CurveId> = self
            .curves
            .iter()
            .filter(|(_, record)| !record.selected.is_empty())
            .map(|(&id, _)| id)
            .collect();
        curves.sort_unstable();
        curves
    }

    fn open_undo_group(&mut self) {
        self.group_depth += 1;
        if self.group_depth == 1 {
            self.open_group = Some(UndoStep::new());
        }
    }

    fn close_undo_group(&mut self) -> Result<(), StoreError> {
        if self.group_depth == 0 {
            return Err(StoreError::UndoGroupNotOpen);
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            if let Some(step) = self.open_group.take() {
                if !step.is_empty() {
                    self.history.push(step);
                }
            }
        }
        Ok(())
    }

    fn curve_name(&self, curve: CurveId) -> String {
        match self.curves.get(&curve) {
            Some(record) => match self.objects.get(&record.object) {
                Some(object) => format!("{}_{}", object.name, record.attribute),
                None => record.attribute.clone(),
            },
            None => curve.to_string(),
        }
    }

    fn key_at(&self, curve: CurveId, index: usize) -> Result<KeySample, StoreError> {
        let record = self.record(curve)?;
        record.check_index(curve, index)?;
        Ok(record.keys[index].sample())
    }
}
