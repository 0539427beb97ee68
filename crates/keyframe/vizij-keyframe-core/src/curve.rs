//! Curve data model: keys, selections, and the transient snapshot the tools
//! compute against.
//!
//! The host owns the real curve. A [`CurveSnapshot`] is a read-derived view,
//! valid for one read/compute/write cycle only.

use crate::error::StoreError;
use crate::ids::CurveId;
use crate::store::CurveStore;
use crate::tangent::TangentInfo;

/// Two key times closer than this are treated as the same time.
pub const TIME_EPSILON: f64 = 1e-9;

/// A bare `(time, value)` sample as returned by key queries.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeySample {
    pub time: f64,
    pub value: f64,
}

/// A selected key with its index on the curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectedKey {
    pub time: f64,
    pub value: f64,
    pub index: usize,
}

/// A single key on an animation curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    pub tangent: TangentInfo,
}

impl Keyframe {
    /// Key with the host's default tangent.
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            tangent: TangentInfo::default(),
        }
    }

    pub fn with_tangent(mut self, tangent: TangentInfo) -> Self {
        self.tangent = tangent;
        self
    }

    #[inline]
    pub fn sample(&self) -> KeySample {
        KeySample {
            time: self.time,
            value: self.value,
        }
    }
}

/// Parallel time/value/tangent sequences for one curve, indexed by key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveSnapshot {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    pub tangents: Vec<TangentInfo>,
}

impl CurveSnapshot {
    /// Read every key and tangent of `curve` from the store.
    pub fn read<S: CurveStore + ?Sized>(store: &S, curve: CurveId) -> Result<Self, StoreError> {
        let samples = store.query_keyframes(curve)?;
        let mut snapshot = Self {
            times: Vec::with_capacity(samples.len()),
            values: Vec::with_capacity(samples.len()),
            tangents: Vec::with_capacity(samples.len()),
        };
        for (index, sample) in samples.iter().enumerate() {
            snapshot.times.push(sample.time);
            snapshot.values.push(sample.value);
            snapshot.tangents.push(store.query_tangent(curve, index)?);
        }
        Ok(snapshot)
    }

    pub fn from_keyframes(keys: &[Keyframe]) -> Self {
        Self {
            times: keys.iter().map(|k| k.time).collect(),
            values: keys.iter().map(|k| k.value).collect(),
            tangents: keys.iter().map(|k| k.tangent).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// True when key times strictly increase, which every host curve guarantees.
    pub fn is_strictly_increasing(&self) -> bool {
        self.times.windows(2).all(|w| w[1] > w[0])
    }

    pub fn keyframes(&self) -> Vec<Keyframe> {
        self.times
            .iter()
            .zip(&self.values)
            .zip(&self.tangents)
            .map(|((&time, &value), &tangent)| Keyframe {
                time,
                value,
                tangent,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tangent::TangentType;

    #[test]
    fn snapshot_from_keyframes_keeps_order() {
        let keys = vec![
            Keyframe::new(0.0, 1.0),
            Keyframe::new(2.0, 3.0).with_tangent(TangentInfo::uniform(TangentType::Flat)),
        ];
        let snap = CurveSnapshot::from_keyframes(&keys);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.times, vec![0.0, 2.0]);
        assert_eq!(snap.values, vec![1.0, 3.0]);
        assert_eq!(snap.tangents[1].outgoing.kind, TangentType::Flat);
        assert_eq!(snap.keyframes(), keys);
    }

    #[test]
    fn strictly_increasing_check() {
        let ok = CurveSnapshot::from_keyframes(&[Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 0.0)]);
        assert!(ok.is_strictly_increasing());
        let flat = CurveSnapshot::from_keyframes(&[Keyframe::new(1.0, 0.0), Keyframe::new(1.0, 0.0)]);
        assert!(!flat.is_strictly_increasing());
        assert!(CurveSnapshot::default().is_strictly_increasing());
    }
}
