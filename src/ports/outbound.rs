//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::entities::{GroupId, UserId};
use crate::domain::{
    DomainError, ExpensePayload, ExpenseSplit, Group, GroupMember, Participant, Payment, Session,
};

/// Remote expense-service API gateway.
///
/// One HTTP call per method, no retry policy. The bearer credential comes
/// from the session the caller passes in; this trait never reads storage.
#[async_trait::async_trait]
pub trait ExpenseGateway: Send + Sync {
    /// Register a new account. Returns the service's confirmation message.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<String, DomainError>;

    /// Exchange credentials for a session token.
    async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError>;

    /// Fetch the display name for a user (the dashboard greeting).
    async fn user_profile(&self, session: &Session, user_id: UserId)
        -> Result<String, DomainError>;

    /// Fetch the groups the authenticated user belongs to.
    async fn groups_for_user(&self, session: &Session) -> Result<Vec<Group>, DomainError>;

    /// Create a group with an initial member roster. Returns the service's
    /// confirmation message.
    async fn create_group(
        &self,
        session: &Session,
        group_name: &str,
        members: &[GroupMember],
    ) -> Result<String, DomainError>;

    /// Fetch the membership list for a group. The result is treated as an
    /// externally validated participant set for expense entry.
    async fn group_members(
        &self,
        session: &Session,
        group_id: GroupId,
    ) -> Result<Vec<Participant>, DomainError>;

    /// Submit a validated, normalized expense draft.
    async fn create_expense(
        &self,
        session: &Session,
        payload: &ExpensePayload,
    ) -> Result<(), DomainError>;

    /// Fetch the recorded splits for a committed expense.
    async fn expense_splits(
        &self,
        session: &Session,
        expense_id: i64,
    ) -> Result<Vec<ExpenseSplit>, DomainError>;

    /// Record one user's owed/paid split against a committed expense.
    async fn create_expense_split(
        &self,
        session: &Session,
        expense_id: i64,
        split: &ExpenseSplit,
    ) -> Result<(), DomainError>;

    /// Fetch the authenticated user's settlement payment history.
    async fn payments_for_user(&self, session: &Session) -> Result<Vec<Payment>, DomainError>;

    /// Create a settlement payment to another group member.
    async fn create_payment(
        &self,
        session: &Session,
        group_id: GroupId,
        payee_id: UserId,
        amount: f64,
        method: crate::domain::PaymentMethod,
    ) -> Result<Payment, DomainError>;

    /// Mark a pending payment as completed.
    async fn complete_payment(
        &self,
        session: &Session,
        payment_id: i64,
    ) -> Result<(), DomainError>;
}

/// Session store port. Persists the opaque token and user identity between runs.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored session, if any.
    async fn load(&self) -> Result<Option<Session>, DomainError>;

    /// Persist the session after a successful login.
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Forget the stored session (logout).
    async fn clear(&self) -> Result<(), DomainError>;
}
