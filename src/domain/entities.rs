//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here — these are mapped from adapters.

use serde::{Deserialize, Serialize};

/// Opaque user identifier assigned by the remote service.
pub type UserId = i64;

/// Opaque group identifier assigned by the remote service.
pub type GroupId = i64;

/// A member of the active group, as supplied by the group-membership source.
///
/// Immutable for the duration of one expense-drafting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub username: String,
    pub avatar: Option<String>,
}

/// One participant's declared payment toward an expense.
///
/// At most one contribution per participant: updates replace, never accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub user_id: UserId,
    pub amount: f64,
}

/// An in-memory, not-yet-submitted expense record.
///
/// Constructed transiently by the expense form, validated by
/// [`crate::domain::split::validate_draft`], submitted once, then discarded.
/// The authoritative expense record lives on the remote service.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub group_id: Option<GroupId>,
    pub amount: Option<f64>,
    pub description: String,
    pub paid_by: Option<UserId>,
    pub participants: Vec<Participant>,
    pub contributions: Vec<Contribution>,
}

/// Normalized draft payload, exactly the shape the remote expense service accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    pub group_id: GroupId,
    pub paid_by: UserId,
    pub amount: f64,
    pub description: String,
    pub expense_type: String,
    pub participants: Vec<ParticipantRef>,
    pub payments: Vec<PaymentEntry>,
}

/// `{user_id}` pair in the expense payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRef {
    pub user_id: UserId,
}

/// `{user_id, amount}` pair in the expense payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub user_id: UserId,
    pub amount: f64,
}

/// A group the authenticated user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    pub group_name: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

/// Member entry on a group roster (distinct from [`Participant`], which is
/// the trimmed shape the membership endpoint returns for expense entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// One user's owed/paid standing against a single recorded expense.
///
/// Unlike [`Contribution`], which is draft-side input, this is the
/// service's view of a committed expense split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount_owed: f64,
    #[serde(default)]
    pub amount_paid: f64,
}

/// A settlement payment between two members of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub payee_id: UserId,
    pub payee_name: Option<String>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Upi,
    Cash,
    BankTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Upi => write!(f, "UPI"),
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::BankTransfer => write!(f, "Bank transfer"),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Authenticated session. The token is opaque to this client; it is stored
/// as-is and attached as a bearer credential by the HTTP adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub username: Option<String>,
}
