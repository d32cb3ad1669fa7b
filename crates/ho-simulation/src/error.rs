use ho_core::CoreError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that abort a simulation step. Bad player input never lands here;
/// these are programming defects in static data or system wiring.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Static game data contradicts itself.
    #[error("inconsistent game data: {0}")]
    InconsistentData(#[from] CoreError),

    /// A system failed for a reason of its own.
    #[error("system error: {0}")]
    SystemError(String),
}
