//! Per-key tangent data.
//!
//! Tangent types are opaque tags owned by the host. They are copied and
//! rearranged by the editing tools but never interpreted, so the closed set
//! below mirrors the host's categories one to one.

use std::fmt;
use std::str::FromStr;

/// Interpolation category of one tangent side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TangentType {
    Spline,
    Linear,
    Fast,
    Slow,
    Flat,
    Step,
    StepNext,
    Fixed,
    Clamped,
    Plateau,
    #[default]
    Auto,
}

impl TangentType {
    pub const ALL: [TangentType; 11] = [
        TangentType::Spline,
        TangentType::Linear,
        TangentType::Fast,
        TangentType::Slow,
        TangentType::Flat,
        TangentType::Step,
        TangentType::StepNext,
        TangentType::Fixed,
        TangentType::Clamped,
        TangentType::Plateau,
        TangentType::Auto,
    ];

    /// Host-side name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TangentType::Spline => "spline",
            TangentType::Linear => "linear",
            TangentType::Fast => "fast",
            TangentType::Slow => "slow",
            TangentType::Flat => "flat",
            TangentType::Step => "step",
            TangentType::StepNext => "stepnext",
            TangentType::Fixed => "fixed",
            TangentType::Clamped => "clamped",
            TangentType::Plateau => "plateau",
            TangentType::Auto => "auto",
        }
    }
}

impl fmt::Display for TangentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tangent type name the host reported but this crate does not know.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tangent type: '{0}'")]
pub struct UnknownTangentType(pub String);

impl FromStr for TangentType {
    type Err = UnknownTangentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        TangentType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownTangentType(s.to_string()))
    }
}

/// One half (arrival or departure) of a key's tangent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TangentSide {
    /// Angle in degrees, as reported by the host.
    pub angle: f64,
    pub weight: f64,
    pub kind: TangentType,
}

impl Default for TangentSide {
    fn default() -> Self {
        Self {
            angle: 0.0,
            weight: 1.0,
            kind: TangentType::Auto,
        }
    }
}

impl TangentSide {
    pub fn new(angle: f64, weight: f64, kind: TangentType) -> Self {
        Self {
            angle,
            weight,
            kind,
        }
    }
}

/// Full tangent of a key: `incoming` shapes the segment arriving at the key,
/// `outgoing` the segment leaving it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TangentInfo {
    pub incoming: TangentSide,
    pub outgoing: TangentSide,
}

impl TangentInfo {
    /// Build from the flat field order hosts usually report
    /// (in/out angle, in/out weight, in/out type).
    pub fn new(
        in_angle: f64,
        out_angle: f64,
        in_weight: f64,
        out_weight: f64,
        in_type: TangentType,
        out_type: TangentType,
    ) -> Self {
        Self {
            incoming: TangentSide::new(in_angle, in_weight, in_type),
            outgoing: TangentSide::new(out_angle, out_weight, out_type),
        }
    }

    /// Same tangent type and default angle/weight on both sides.
    pub fn uniform(kind: TangentType) -> Self {
        let side = TangentSide {
            kind,
            ..TangentSide::default()
        };
        Self {
            incoming: side,
            outgoing: side,
        }
    }

    /// Tangent for a loop seam: arrive the way the block's last key arrives,
    /// leave the way its first key leaves.
    pub fn seam(last: &TangentInfo, first: &TangentInfo) -> Self {
        Self {
            incoming: last.incoming,
            outgoing: first.outgoing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangent_type_names_round_trip() {
        for kind in TangentType::ALL {
            assert_eq!(kind.to_string().parse::<TangentType>(), Ok(kind));
        }
        assert_eq!("StepNext".parse::<TangentType>(), Ok(TangentType::StepNext));
        assert_eq!(" FLAT ".parse::<TangentType>(), Ok(TangentType::Flat));
    }

    #[test]
    fn unknown_tangent_type_is_rejected() {
        let err = "bouncy".parse::<TangentType>().unwrap_err();
        assert_eq!(err, UnknownTangentType("bouncy".into()));
        assert_eq!(err.to_string(), "Unknown tangent type: 'bouncy'");
    }

    #[test]
    fn seam_takes_last_incoming_and_first_outgoing() {
        let first = TangentInfo::new(10.0, 20.0, 1.0, 2.0, TangentType::Flat, TangentType::Linear);
        let last = TangentInfo::new(30.0, 40.0, 3.0, 4.0, TangentType::Step, TangentType::Spline);
        let seam = TangentInfo::seam(&last, &first);
        assert_eq!(seam.incoming, TangentSide::new(30.0, 3.0, TangentType::Step));
        assert_eq!(seam.outgoing, TangentSide::new(20.0, 2.0, TangentType::Linear));
    }
}
