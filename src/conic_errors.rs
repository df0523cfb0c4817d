use thiserror::Error;

use crate::constants::Degree;

#[derive(Error, Debug)]
pub enum ConicError {
    #[error("Eccentricity {0} lies in the near-parabolic band (0.98, 1.02)")]
    ForbiddenEccentricity(f64),

    #[error("Eccentricity {eccentricity} is outside the {conic} domain")]
    EccentricityOutOfDomain {
        eccentricity: f64,
        conic: &'static str,
    },

    #[error("Invalid semi-major axis {0}: must be finite and non-zero")]
    InvalidSemiMajorAxis(f64),

    #[error("Semi-major axis {a} and eccentricity {e} describe different conic types")]
    ConicMismatch { a: f64, e: f64 },

    #[error("True anomaly {0}° lies beyond the hyperbolic asymptote")]
    BeyondAsymptote(Degree),

    #[error("Trajectory table has no usable samples")]
    EmptyTrajectoryTable,

    #[error("Invalid session parameter: {0}")]
    InvalidSessionParameter(String),

    #[error("Unknown central body: {0}")]
    UnknownCentralBody(String),

    #[error("Unknown time scale: {0}")]
    UnknownTimeScale(String),

    #[error("Invalid value for setting {key}: {value}")]
    InvalidSetting { key: String, value: String },

    #[error("Unable to write the trajectory table: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for ConicError {
    fn eq(&self, other: &Self) -> bool {
        use ConicError::*;
        match (self, other) {
            (ForbiddenEccentricity(a), ForbiddenEccentricity(b)) => a == b,
            (
                EccentricityOutOfDomain {
                    eccentricity: e1,
                    conic: c1,
                },
                EccentricityOutOfDomain {
                    eccentricity: e2,
                    conic: c2,
                },
            ) => e1 == e2 && c1 == c2,
            (InvalidSemiMajorAxis(a), InvalidSemiMajorAxis(b)) => a == b,
            (ConicMismatch { a: a1, e: e1 }, ConicMismatch { a: a2, e: e2 }) => {
                a1 == a2 && e1 == e2
            }
            (BeyondAsymptote(a), BeyondAsymptote(b)) => a == b,
            (InvalidSessionParameter(a), InvalidSessionParameter(b)) => a == b,
            (UnknownCentralBody(a), UnknownCentralBody(b)) => a == b,
            (UnknownTimeScale(a), UnknownTimeScale(b)) => a == b,
            (
                InvalidSetting {
                    key: k1,
                    value: v1,
                },
                InvalidSetting {
                    key: k2,
                    value: v2,
                },
            ) => k1 == k2 && v1 == v2,

            // csv errors are not comparable: equal if same variant
            (CsvError(_), CsvError(_)) => true,

            (EmptyTrajectoryTable, EmptyTrajectoryTable) => true,

            _ => false,
        }
    }
}
