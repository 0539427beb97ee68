//! Vizij Keyframe Core (host-agnostic)
//!
//! Curve editing tools that run against a host's keyframe store:
//! - [`cycle`]: append continuation blocks that replay a curve's successive
//!   differences past its last key, with seam tangent blending.
//! - [`scale`]: rescale keys in time or value around the first/last selected key.
//! - [`dial`] and [`session`]: the numeric state behind an interactive scale field
//!   and the undo-grouped gesture that drives the scaler.
//!
//! The host is abstracted behind [`CurveStore`]; [`MemoryCurveStore`] is an
//! in-memory implementation used by tests and hosts without their own storage.

pub mod config;
pub mod curve;
pub mod cycle;
pub mod dial;
pub mod error;
pub mod ids;
pub mod memory;
pub mod scale;
pub mod session;
pub mod store;
pub mod tangent;

// Re-exports for consumers (host adapters)
pub use config::{Config, DialConfig};
pub use curve::{CurveSnapshot, KeySample, Keyframe, SelectedKey, TIME_EPSILON};
pub use cycle::{
    continuation, extend_curve, extend_selected_objects, plan_cycles, CycleBlock, CycleOutcome,
    CycleReport,
};
pub use dial::ScaleDial;
pub use error::{CurveError, StoreError};
pub use ids::{CurveId, ObjectId};
pub use memory::MemoryCurveStore;
pub use scale::{
    plan_scale, scale_curve, scale_selected_curves, Axis, Pivot, ScaleOutcome, ScaleParams,
    ScalePlan, ScaleReport, SelectionMode,
};
pub use session::ScaleSession;
pub use store::{CurveStore, UndoGroup};
pub use tangent::{TangentInfo, TangentSide, TangentType, UnknownTangentType};
