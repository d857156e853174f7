//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the split validator, and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod split;

pub use entities::{
    Contribution, ExpenseDraft, ExpensePayload, ExpenseSplit, Group, GroupMember, Participant,
    Payment, PaymentMethod, PaymentStatus, Session,
};
pub use errors::{DomainError, DraftError};
pub use split::{derive_equal_split, upsert_contribution, validate_draft, validate_reconciliation};
