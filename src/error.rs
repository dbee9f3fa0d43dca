use thiserror::Error;

/// Errors surfaced by catalog/grid/plan construction and by the Director.
///
/// Relaxation (cooldown, category floor, wrap-around, padding) is never an
/// error; it is reported through `GenerationReport` instead.
#[derive(Debug, Error)]
pub enum DirectorError {
    /// An input invariant was violated. Fatal, no partial output.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The scene catalog holds no scenes at all, nothing to assign.
    #[error("scene catalog is empty")]
    InsufficientFootage,

    /// The assembled timeline failed its own validation gate. This is a
    /// bug in the assignment algorithm, not in the caller's inputs.
    #[error("generated timeline failed validation: {0}")]
    InvariantViolation(String),
}
