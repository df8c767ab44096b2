use thiserror::Error;

/// Everything that can go wrong while building or evaluating a scene.
///
/// Absence of an intersection and total internal reflection are *not* errors;
/// they are ordinary values in the shading pipeline. `TraceError` covers
/// construction preconditions (bad ray endpoints, bad transforms) and the
/// recoverable linear-algebra failures (dimension mismatch, singularity).
#[derive(Debug, Error, PartialEq)]
pub enum TraceError {
    #[error("ray origin must be a point (w = 1), got w = {0}")]
    NonPointOrigin(f64),

    #[error("ray direction must be a vector (w = 0), got w = {0}")]
    NonVectorDirection(f64),

    #[error("matrix dimension mismatch: {0}x{1} * {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("determinant is only defined for square matrices, got {0}x{1}")]
    NotSquare(usize, usize),

    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,

    #[error("shape transform must be an invertible 4x4 matrix")]
    InvalidTransform,

    #[error("shape {0} is not a group")]
    NotAGroup(usize),

    #[error("unknown shape kind '{0}' in scene description")]
    UnknownShapeKind(String),

    #[error("unknown pattern kind '{0}' in scene description")]
    UnknownPatternKind(String),

    #[error("unknown transform op '{0}' in scene description")]
    UnknownTransformOp(String),

    #[error("scene description is not valid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TraceError {
    fn from(err: serde_json::Error) -> TraceError {
        TraceError::Json(err.to_string())
    }
}
