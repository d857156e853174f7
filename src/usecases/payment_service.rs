//! Settlement payments between group members: history, creation, completion.

use crate::domain::entities::{GroupId, UserId};
use crate::domain::{DomainError, Participant, Payment, PaymentMethod, Session};
use crate::ports::ExpenseGateway;
use std::sync::Arc;
use tracing::info;

pub struct PaymentService {
    gateway: Arc<dyn ExpenseGateway>,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self { gateway }
    }

    pub async fn history(&self, session: &Session) -> Result<Vec<Payment>, DomainError> {
        self.gateway.payments_for_user(session).await
    }

    /// Candidate payees in a group: its members, excluding the payer.
    pub async fn payees(
        &self,
        session: &Session,
        group_id: GroupId,
    ) -> Result<Vec<Participant>, DomainError> {
        let members = self.gateway.group_members(session, group_id).await?;
        Ok(members
            .into_iter()
            .filter(|m| m.user_id != session.user_id)
            .collect())
    }

    /// Create a payment. Unlike contribution entry, the amount here is
    /// strict: a payment of garbage or ≤ 0 is an input error, not "absent".
    pub async fn send(
        &self,
        session: &Session,
        group_id: GroupId,
        payee_id: UserId,
        raw_amount: &str,
        method: PaymentMethod,
    ) -> Result<Payment, DomainError> {
        let amount = raw_amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| *a > 0.0 && a.is_finite())
            .ok_or_else(|| {
                DomainError::Input(format!("Invalid payment amount: {}", raw_amount))
            })?;

        let payment = self
            .gateway
            .create_payment(session, group_id, payee_id, amount, method)
            .await?;
        info!(
            payment_id = payment.payment_id,
            payee_id, amount, "payment sent"
        );
        Ok(payment)
    }

    pub async fn complete(&self, session: &Session, payment_id: i64) -> Result<(), DomainError> {
        self.gateway.complete_payment(session, payment_id).await
    }
}
