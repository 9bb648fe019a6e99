use thiserror::Error;

/// Errors from the checked progress accessors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProgressError {
    /// The target value is zero, so the progress ratio is undefined.
    #[error("progress target is zero")]
    ZeroTarget,
    /// The target value is NaN or infinite.
    #[error("progress target is not finite: {0}")]
    NonFiniteTarget(f32),
}
