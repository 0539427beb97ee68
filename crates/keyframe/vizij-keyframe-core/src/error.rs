//! Error types for host store access and the curve tools.

use crate::ids::{CurveId, ObjectId};

/// Failures reported by a [`CurveStore`](crate::store::CurveStore).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum StoreError {
    /// Curve handle not known to the store
    #[error("Curve not found: {curve}")]
    UnknownCurve { curve: CurveId },

    /// Object handle not known to the store
    #[error("Object not found: {object}")]
    UnknownObject { object: ObjectId },

    /// Key index past the end of the curve
    #[error("Key index {index} out of range for {curve} ({len} keys)")]
    IndexOutOfRange {
        curve: CurveId,
        index: usize,
        len: usize,
    },

    /// A time write would collide with or cross a neighbouring key
    #[error("Key {index} on {curve} cannot move to time {time}: keys must stay strictly ordered")]
    OrderingViolation {
        curve: CurveId,
        index: usize,
        time: f64,
    },

    /// Key data rejected on creation
    #[error("Invalid keys: {reason}")]
    InvalidKeys { reason: String },

    /// close_undo_group without a matching open
    #[error("No undo group is open")]
    UndoGroupNotOpen,

    /// Any other host failure
    #[error("Host error: {reason}")]
    Host { reason: String },
}

impl StoreError {
    #[inline]
    pub fn is_ordering_violation(&self) -> bool {
        matches!(self, Self::OrderingViolation { .. })
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownCurve { .. } | Self::UnknownObject { .. } => "lookup",
            Self::IndexOutOfRange { .. } => "index",
            Self::OrderingViolation { .. } | Self::InvalidKeys { .. } => "ordering",
            Self::UndoGroupNotOpen => "undo",
            Self::Host { .. } => "host",
        }
    }
}

/// Errors produced by the curve tools.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CurveError {
    /// Curve has too few keys for the requested operation
    #[error("{curve} has {found} key(s); at least 2 are required")]
    NotEnoughKeys { curve: CurveId, found: usize },

    /// Nothing selected to operate on
    #[error("Nothing selected: please select {what}")]
    NoSelection { what: &'static str },

    /// Scale factor is NaN or infinite
    #[error("Invalid scale factor: {factor}")]
    InvalidFactor { factor: f64 },

    /// Configuration failed to parse or validate
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CurveError {
    /// Precondition failures: the operation was a no-op and the user should be warned.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotEnoughKeys { .. } | Self::NoSelection { .. } | Self::InvalidFactor { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotEnoughKeys { .. } | Self::NoSelection { .. } => "precondition",
            Self::InvalidFactor { .. } => "validation",
            Self::Config { .. } => "config",
            Self::Store(inner) => inner.category(),
        }
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
