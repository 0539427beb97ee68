//! Cyclic continuation of a curve past its last key.
//!
//! Model:
//! - A block of `n` keys produces `n - 1` new keys per loop. The new block is
//!   anchored on the current last key and replays the block's successive
//!   differences, so the motion keeps going instead of snapping back.
//! - Times and values are continued independently with the same rule.
//! - Loop `i` chains from the previous loop's tail: its window is the last key
//!   written so far followed by the keys the previous loop produced.
//! - The first new key of each loop gets a seam tangent (last key's incoming
//!   half, first key's outgoing half); the other new keys copy the original
//!   tangent at the same offset.
//!
//! All blocks are planned from one snapshot before anything is written,
//! since inserts renumber keys on the host.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::curve::{CurveSnapshot, Keyframe};
use crate::error::CurveError;
use crate::ids::CurveId;
use crate::store::{CurveStore, UndoGroup};
use crate::tangent::TangentInfo;

/// Continue `seq` by replaying its successive differences from its last element.
///
/// `t[0] = s[n-1] + (s[1] - s[0])`, `t[k] = t[k-1] + (s[k+1] - s[k])`.
/// Returns `n - 1` elements (none for fewer than two inputs).
pub fn continuation(seq: &[f64]) -> Vec<f64> {
    let Some(&anchor) = seq.last() else {
        return Vec::new();
    };
    seq.windows(2)
        .scan(anchor, |acc, pair| {
            *acc += pair[1] - pair[0];
            Some(*acc)
        })
        .collect()
}

/// Keys appended by one loop, with their tangents already assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleBlock {
    /// Absolute index of the block's first key once written.
    pub base_index: usize,
    pub keys: Vec<Keyframe>,
}

/// Plan `loop_count` continuation blocks for a curve snapshot.
/// Curves with fewer than two keys produce no blocks.
pub fn plan_cycles(snapshot: &CurveSnapshot, loop_count: usize) -> Vec<CycleBlock> {
    let n = snapshot.len();
    if n < 2 || loop_count == 0 {
        return Vec::new();
    }
    if !snapshot.is_strictly_increasing() {
        debug!("cycle source times are not strictly increasing; continuation may overlap");
    }

    let seam = TangentInfo::seam(&snapshot.tangents[n - 1], &snapshot.tangents[0]);
    let mut times = snapshot.times.clone();
    let mut values = snapshot.values.clone();
    let mut blocks = Vec::with_capacity(loop_count);

    for i in 0..loop_count {
        let new_times = continuation(&times);
        let new_values = continuation(&values);
        let keys = new_times
            .iter()
            .zip(&new_values)
            .enumerate()
            .map(|(j, (&time, &value))| Keyframe {
                time,
                value,
                tangent: if j == 0 { seam } else { snapshot.tangents[j] },
            })
            .collect();
        blocks.push(CycleBlock {
            base_index: n + i * (n - 1),
            keys,
        });

        // Next window: last key so far, then this loop's keys.
        let tail_time = times[times.len() - 1];
        let tail_value = values[values.len() - 1];
        times = std::iter::once(tail_time).chain(new_times).collect();
        values = std::iter::once(tail_value).chain(new_values).collect();
    }
    blocks
}

/// Result of extending one curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Extended { curve: CurveId, keys_added: usize },
    /// Precondition not met (fewer than two keys); nothing was written.
    Skipped { curve: CurveId, found: usize },
}

/// Summary of a batch cycle over the selected objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub extended: Vec<CurveId>,
    pub skipped: Vec<CurveId>,
    pub keys_added: usize,
}

/// Append `loop_count` continuation blocks to one curve.
pub fn extend_curve<S: CurveStore + ?Sized>(
    store: &mut S,
    curve: CurveId,
    loop_count: usize,
) -> Result<CycleOutcome, CurveError> {
    let snapshot = CurveSnapshot::read(store, curve)?;
    if snapshot.len() < 2 {
        let err = CurveError::NotEnoughKeys {
            curve,
            found: snapshot.len(),
        };
        warn!("skipping {}: {err}", store.curve_name(curve));
        return Ok(CycleOutcome::Skipped {
            curve,
            found: snapshot.len(),
        });
    }

    let blocks = plan_cycles(&snapshot, loop_count);
    let mut keys_added = 0;
    for block in &blocks {
        for key in &block.keys {
            store.set_keyframe(curve, key.time, key.value)?;
        }
        for (offset, key) in block.keys.iter().enumerate() {
            store.set_tangent(curve, block.base_index + offset, key.tangent)?;
        }
        keys_added += block.keys.len();
    }
    debug!(
        "{}: appended {loop_count} loop(s), {keys_added} key(s)",
        store.curve_name(curve)
    );
    Ok(CycleOutcome::Extended { curve, keys_added })
}

/// Extend every animated channel of every selected object, in one undo group.
pub fn extend_selected_objects<S: CurveStore + ?Sized>(
    store: &mut S,
    loop_count: usize,
) -> Result<CycleReport, CurveError> {
    let objects = store.list_selected_objects();
    if objects.is_empty() {
        warn!("Please select controllers to copy");
        return Err(CurveError::NoSelection {
            what: "controllers to copy",
        });
    }

    let mut report = CycleReport::default();
    let mut group = UndoGroup::open(store);
    for object in objects {
        for curve in group.list_animated_channels_of(object)? {
            match extend_curve(&mut *group, curve, loop_count)? {
                CycleOutcome::Extended { keys_added, .. } => {
                    report.extended.push(curve);
                    report.keys_added += keys_added;
                }
                CycleOutcome::Skipped { .. } => report.skipped.push(curve),
            }
        }
    }
    group.close()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tangent::TangentType;

    #[test]
    fn continuation_replays_differences() {
        assert_eq!(continuation(&[0.0, 1.0, 2.0]), vec![3.0, 4.0]);
        assert_eq!(continuation(&[0.0, 2.0, 3.0]), vec![5.0, 6.0]);
        assert_eq!(continuation(&[4.0, 1.0]), vec![-2.0]);
        assert!(continuation(&[1.0]).is_empty());
        assert!(continuation(&[]).is_empty());
    }

    #[test]
    fn plan_chains_from_previous_tail() {
        let snap = CurveSnapshot::from_keyframes(&[
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 2.0),
            Keyframe::new(2.0, 3.0),
        ]);
        let blocks = plan_cycles(&snap, 2);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].base_index, 3);
        assert_eq!(blocks[1].base_index, 5);
        let times: Vec<f64> = blocks.iter().flat_map(|b| b.keys.iter().map(|k| k.time)).collect();
        let values: Vec<f64> = blocks.iter().flat_map(|b| b.keys.iter().map(|k| k.value)).collect();
        assert_eq!(times, vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(values, vec![5.0, 6.0, 8.0, 9.0]);
    }

    #[test]
    fn plan_assigns_seam_and_offset_tangents() {
        let t0 = TangentInfo::uniform(TangentType::Flat);
        let t1 = TangentInfo::uniform(TangentType::Linear);
        let t2 = TangentInfo::new(5.0, 6.0, 0.5, 0.7, TangentType::Step, TangentType::Spline);
        let snap = CurveSnapshot::from_keyframes(&[
            Keyframe::new(0.0, 0.0).with_tangent(t0),
            Keyframe::new(1.0, 1.0).with_tangent(t1),
            Keyframe::new(2.0, 0.0).with_tangent(t2),
        ]);
        let blocks = plan_cycles(&snap, 1);
        let keys = &blocks[0].keys;
        assert_eq!(keys[0].tangent, TangentInfo::seam(&t2, &t0));
        assert_eq!(keys[1].tangent, t1);
    }

    #[test]
    fn plan_is_empty_for_short_curves_or_zero_loops() {
        let one = CurveSnapshot::from_keyframes(&[Keyframe::new(0.0, 0.0)]);
        assert!(plan_cycles(&one, 3).is_empty());
        let two = CurveSnapshot::from_keyframes(&[Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)]);
        assert!(plan_cycles(&two, 0).is_empty());
        assert_eq!(plan_cycles(&two, 3).len(), 3);
    }
}
