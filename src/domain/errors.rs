//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into `DomainError`. Draft validation
//! failures get their own type: they are local, non-fatal, and recoverable
//! by user correction, so the UI matches on them to re-open the form.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Expense service error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Validation failures for an expense draft. Never raised as panics; the
/// form layer renders these and lets the user correct the entry.
#[derive(Error, Debug, PartialEq)]
pub enum DraftError {
    /// One or more required fields absent. Surfaced as a single aggregate message.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    /// Selected payer is not in the current participant set. Reachable when a
    /// stale payer selection survives a group switch.
    #[error("The selected payer is not a member of the chosen group")]
    PayerNotMember,

    /// No participant has a positive recorded payment.
    #[error("No payments recorded: at least one participant must contribute")]
    EmptyContributions,

    /// Declared payments do not add up to the claimed total. Carries both
    /// values so the message can show "sum X does not match total Y".
    #[error("The sum of payments ({sum}) does not match the total amount ({total})")]
    ReconciliationMismatch { sum: f64, total: f64 },
}
