//! Mock gateway for running without a configured API.
//!
//! Returns fixture groups and members and keeps payments in memory.
//! Simulates network latency with configurable delay.

use crate::domain::entities::{GroupId, UserId};
use crate::domain::{
    DomainError, ExpensePayload, ExpenseSplit, Group, GroupMember, Participant, Payment,
    PaymentMethod, PaymentStatus, Session,
};
use crate::ports::ExpenseGateway;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory gateway for demos and tests.
///
/// Any email/password pair logs in as user 1 ("alice"). Expenses are
/// accepted and dropped; groups, payments, and expense splits are stored so
/// creation, history, and completion behave like the real service within
/// one run.
pub struct MockGateway {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    groups: RwLock<Vec<Group>>,
    next_group_id: RwLock<GroupId>,
    payments: RwLock<Vec<Payment>>,
    next_payment_id: RwLock<i64>,
    splits: RwLock<HashMap<i64, Vec<ExpenseSplit>>>,
}

impl MockGateway {
    /// Create a new mock gateway with default delay (100ms).
    pub fn new() -> Self {
        Self::with_delay(100)
    }

    /// Create a mock gateway with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            groups: RwLock::new(Self::fixture_groups()),
            next_group_id: RwLock::new(3),
            payments: RwLock::new(Vec::new()),
            next_payment_id: RwLock::new(1),
            splits: RwLock::new(HashMap::new()),
        }
    }

    async fn simulate_latency(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }

    fn fixture_groups() -> Vec<Group> {
        vec![
            Group {
                group_id: 1,
                group_name: "Flatmates".to_string(),
                created_at: Some("2026-01-10".to_string()),
                members: vec![
                    GroupMember {
                        username: "alice".to_string(),
                        email: "alice@example.com".to_string(),
                        is_admin: true,
                    },
                    GroupMember {
                        username: "bob".to_string(),
                        email: "bob@example.com".to_string(),
                        is_admin: false,
                    },
                    GroupMember {
                        username: "carol".to_string(),
                        email: "carol@example.com".to_string(),
                        is_admin: false,
                    },
                ],
            },
            Group {
                group_id: 2,
                group_name: "Road trip".to_string(),
                created_at: Some("2026-03-02".to_string()),
                members: vec![
                    GroupMember {
                        username: "alice".to_string(),
                        email: "alice@example.com".to_string(),
                        is_admin: true,
                    },
                    GroupMember {
                        username: "dave".to_string(),
                        email: "dave@example.com".to_string(),
                        is_admin: false,
                    },
                ],
            },
        ]
    }

    fn display_name(user_id: UserId) -> String {
        Self::fixture_members(1)
            .into_iter()
            .chain(Self::fixture_members(2))
            .find(|p| p.user_id == user_id)
            .map(|p| p.username)
            .unwrap_or_else(|| format!("User {}", user_id))
    }

    fn fixture_members(group_id: GroupId) -> Vec<Participant> {
        let names: &[(UserId, &str)] = match group_id {
            1 => &[(1, "alice"), (2, "bob"), (3, "carol")],
            2 => &[(1, "alice"), (4, "dave")],
            _ => &[],
        };
        names
            .iter()
            .map(|&(user_id, username)| Participant {
                user_id,
                username: username.to_string(),
                avatar: None,
            })
            .collect()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ExpenseGateway for MockGateway {
    async fn register(
        &self,
        username: &str,
        _email: &str,
        _password: &str,
        _phone_number: &str,
    ) -> Result<String, DomainError> {
        self.simulate_latency().await;
        info!(username, "[MOCK] registered account");
        Ok(format!("[MOCK] Account created for {}", username))
    }

    async fn login(&self, email: &str, _password: &str) -> Result<Session, DomainError> {
        self.simulate_latency().await;
        info!(email, "[MOCK] login accepted");
        Ok(Session {
            token: "mock-token".to_string(),
            user_id: 1,
            username: Some("alice".to_string()),
        })
    }

    async fn user_profile(
        &self,
        _session: &Session,
        user_id: UserId,
    ) -> Result<String, DomainError> {
        self.simulate_latency().await;
        Ok(Self::display_name(user_id))
    }

    async fn groups_for_user(&self, _session: &Session) -> Result<Vec<Group>, DomainError> {
        self.simulate_latency().await;
        Ok(self.groups.read().await.clone())
    }

    async fn create_group(
        &self,
        _session: &Session,
        group_name: &str,
        members: &[GroupMember],
    ) -> Result<String, DomainError> {
        self.simulate_latency().await;
        let group_id = {
            let mut next = self.next_group_id.write().await;
            let id = *next;
            *next += 1;
            id
        };
        self.groups.write().await.push(Group {
            group_id,
            group_name: group_name.to_string(),
            created_at: Some(chrono::Utc::now().format("%Y-%m-%d").to_string()),
            members: members.to_vec(),
        });
        info!(group_name, members = members.len(), "[MOCK] group created");
        Ok(format!("[MOCK] Group {} created", group_name))
    }

    async fn group_members(
        &self,
        _session: &Session,
        group_id: GroupId,
    ) -> Result<Vec<Participant>, DomainError> {
        self.simulate_latency().await;
        let members = Self::fixture_members(group_id);
        if !members.is_empty() {
            return Ok(members);
        }
        // Created groups: synthesize ids from the stored roster
        let groups = self.groups.read().await;
        match groups.iter().find(|g| g.group_id == group_id) {
            Some(group) => Ok(group
                .members
                .iter()
                .enumerate()
                .map(|(i, m)| Participant {
                    user_id: group_id * 100 + i as i64,
                    username: m.username.clone(),
                    avatar: None,
                })
                .collect()),
            None => Err(DomainError::Api(format!(
                "[MOCK] unknown group {}",
                group_id
            ))),
        }
    }

    async fn create_expense(
        &self,
        _session: &Session,
        payload: &ExpensePayload,
    ) -> Result<(), DomainError> {
        self.simulate_latency().await;
        info!(
            group_id = payload.group_id,
            amount = payload.amount,
            payments = payload.payments.len(),
            "[MOCK] expense accepted"
        );
        Ok(())
    }

    async fn expense_splits(
        &self,
        _session: &Session,
        expense_id: i64,
    ) -> Result<Vec<ExpenseSplit>, DomainError> {
        self.simulate_latency().await;
        Ok(self
            .splits
            .read()
            .await
            .get(&expense_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_expense_split(
        &self,
        _session: &Session,
        expense_id: i64,
        split: &ExpenseSplit,
    ) -> Result<(), DomainError> {
        self.simulate_latency().await;
        let mut stored = split.clone();
        if stored.name.is_none() {
            stored.name = Some(Self::display_name(split.user_id));
        }
        self.splits
            .write()
            .await
            .entry(expense_id)
            .or_default()
            .push(stored);
        info!(expense_id, user_id = split.user_id, "[MOCK] split recorded");
        Ok(())
    }

    async fn payments_for_user(&self, _session: &Session) -> Result<Vec<Payment>, DomainError> {
        self.simulate_latency().await;
        Ok(self.payments.read().await.clone())
    }

    async fn create_payment(
        &self,
        _session: &Session,
        _group_id: GroupId,
        payee_id: UserId,
        amount: f64,
        method: PaymentMethod,
    ) -> Result<Payment, DomainError> {
        self.simulate_latency().await;
        let payment_id = {
            let mut next = self.next_payment_id.write().await;
            let id = *next;
            *next += 1;
            id
        };
        let payee_name = Self::fixture_members(1)
            .into_iter()
            .chain(Self::fixture_members(2))
            .find(|p| p.user_id == payee_id)
            .map(|p| p.username);
        let payment = Payment {
            payment_id,
            payee_id,
            payee_name,
            amount,
            payment_method: method,
            payment_status: PaymentStatus::Pending,
            created_at: Some(chrono::Utc::now()),
        };
        self.payments.write().await.insert(0, payment.clone());
        Ok(payment)
    }

    async fn complete_payment(
        &self,
        _session: &Session,
        payment_id: i64,
    ) -> Result<(), DomainError> {
        self.simulate_latency().await;
        let mut payments = self.payments.write().await;
        match payments.iter_mut().find(|p| p.payment_id == payment_id) {
            Some(payment) => {
                payment.payment_status = PaymentStatus::Completed;
                Ok(())
            }
            None => Err(DomainError::Api(format!(
                "[MOCK] no payment {}",
                payment_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "mock-token".into(),
            user_id: 1,
            username: Some("alice".into()),
        }
    }

    #[tokio::test]
    async fn test_login_and_groups() {
        let gateway = MockGateway::with_delay(1);
        let session = gateway.login("alice@example.com", "pw").await.unwrap();
        assert_eq!(session.user_id, 1);

        let groups = gateway.groups_for_user(&session).await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members.len(), 3);
    }

    #[tokio::test]
    async fn test_members_by_group() {
        let gateway = MockGateway::with_delay(1);
        let members = gateway.group_members(&session(), 1).await.unwrap();
        assert_eq!(members.len(), 3);
        assert!(gateway.group_members(&session(), 42).await.is_err());
    }

    #[tokio::test]
    async fn test_user_profile_names() {
        let gateway = MockGateway::with_delay(1);
        assert_eq!(gateway.user_profile(&session(), 2).await.unwrap(), "bob");
        assert_eq!(
            gateway.user_profile(&session(), 99).await.unwrap(),
            "User 99"
        );
    }

    #[tokio::test]
    async fn test_created_group_appears_with_members() {
        let gateway = MockGateway::with_delay(1);
        let roster = vec![
            GroupMember {
                username: "erin".to_string(),
                email: "erin@example.com".to_string(),
                is_admin: true,
            },
            GroupMember {
                username: "frank".to_string(),
                email: "frank@example.com".to_string(),
                is_admin: false,
            },
        ];
        gateway
            .create_group(&session(), "Ski weekend", &roster)
            .await
            .unwrap();

        let groups = gateway.groups_for_user(&session()).await.unwrap();
        assert_eq!(groups.len(), 3);
        let created = groups.iter().find(|g| g.group_name == "Ski weekend").unwrap();
        assert_eq!(created.members.len(), 2);

        let members = gateway
            .group_members(&session(), created.group_id)
            .await
            .unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "erin");
        assert_ne!(members[0].user_id, members[1].user_id);
    }

    #[tokio::test]
    async fn test_expense_split_lifecycle() {
        let gateway = MockGateway::with_delay(1);
        assert!(gateway.expense_splits(&session(), 7).await.unwrap().is_empty());

        gateway
            .create_expense_split(
                &session(),
                7,
                &ExpenseSplit {
                    user_id: 2,
                    name: None,
                    amount_owed: 40.0,
                    amount_paid: 10.0,
                },
            )
            .await
            .unwrap();

        let splits = gateway.expense_splits(&session(), 7).await.unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].name.as_deref(), Some("bob"));
        assert_eq!(splits[0].amount_owed, 40.0);
        assert!(gateway.expense_splits(&session(), 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_lifecycle() {
        let gateway = MockGateway::with_delay(1);
        let payment = gateway
            .create_payment(&session(), 1, 2, 50.0, PaymentMethod::Upi)
            .await
            .unwrap();
        assert_eq!(payment.payment_status, PaymentStatus::Pending);

        gateway
            .complete_payment(&session(), payment.payment_id)
            .await
            .unwrap();
        let history = gateway.payments_for_user(&session()).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].payment_status, PaymentStatus::Completed);
    }
}
