use thiserror::Error;

/// Engine failure taxonomy.
///
/// `InputData` degrades a single record to a zero-score outcome inside a
/// batch; it never aborts the batch. `Configuration` is a startup-time
/// validation failure and is fatal to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input record: {0}")]
    InputData(String),
    #[error("invalid scoring configuration: {0}")]
    Configuration(String),
}
