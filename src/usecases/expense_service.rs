//! Expense drafting flow: fetch groups and members, keep the draft's
//! participant set in step with the selected group, and submit validated
//! drafts to the remote service.
//!
//! The UI owns the mutable draft; this service applies the rules that must
//! hold across group switches and at submission time.

use crate::domain::entities::{GroupId, UserId};
use crate::domain::{
    derive_equal_split, validate_draft, DomainError, ExpenseDraft, ExpenseSplit, Group,
    Participant, Session,
};
use crate::ports::ExpenseGateway;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ExpenseService {
    gateway: Arc<dyn ExpenseGateway>,
}

impl ExpenseService {
    pub fn new(gateway: Arc<dyn ExpenseGateway>) -> Self {
        Self { gateway }
    }

    pub async fn groups(&self, session: &Session) -> Result<Vec<Group>, DomainError> {
        self.gateway.groups_for_user(session).await
    }

    pub async fn members(
        &self,
        session: &Session,
        group_id: GroupId,
    ) -> Result<Vec<Participant>, DomainError> {
        self.gateway.group_members(session, group_id).await
    }

    /// Point the draft at a new group.
    ///
    /// Fetches the membership list, replaces the participant set, and clears
    /// all prior payments — amounts entered against the old roster are
    /// meaningless. A payer who is not on the new roster is dropped too. If
    /// a total is already entered, the cleared payments are re-seeded with
    /// an equal split as a starting point for the form.
    pub async fn select_group(
        &self,
        session: &Session,
        draft: &mut ExpenseDraft,
        group_id: GroupId,
    ) -> Result<(), DomainError> {
        let members = self.gateway.group_members(session, group_id).await?;

        draft.group_id = Some(group_id);
        draft.participants = members;
        draft.contributions.clear();

        if let Some(paid_by) = draft.paid_by {
            if !draft.participants.iter().any(|p| p.user_id == paid_by) {
                warn!(paid_by, group_id, "payer not in new group, clearing");
                draft.paid_by = None;
            }
        }

        if let Some(total) = draft.amount {
            self.seed_equal_split(draft, total);
        }
        Ok(())
    }

    /// Record the expense total and, when no payments have been entered yet,
    /// seed the form with an equal split over the current participants.
    pub fn set_amount(&self, draft: &mut ExpenseDraft, total: f64) {
        draft.amount = Some(total);
        if draft.contributions.is_empty() {
            self.seed_equal_split(draft, total);
        }
    }

    fn seed_equal_split(&self, draft: &mut ExpenseDraft, total: f64) {
        let ids: Vec<_> = draft.participants.iter().map(|p| p.user_id).collect();
        match derive_equal_split(total, &ids) {
            Ok(contributions) => draft.contributions = contributions,
            Err(_) => draft.contributions.clear(),
        }
    }

    /// Validate the draft and submit it. Validation failures come back as
    /// `DomainError::Draft` so the form can re-open for correction.
    pub async fn submit(
        &self,
        session: &Session,
        draft: &ExpenseDraft,
    ) -> Result<(), DomainError> {
        let payload = validate_draft(draft)?;
        self.gateway.create_expense(session, &payload).await?;
        info!(
            group_id = payload.group_id,
            amount = payload.amount,
            "expense submitted"
        );
        Ok(())
    }

    /// Fetch the recorded splits for a committed expense.
    pub async fn splits(
        &self,
        session: &Session,
        expense_id: i64,
    ) -> Result<Vec<ExpenseSplit>, DomainError> {
        self.gateway.expense_splits(session, expense_id).await
    }

    /// Record a member's owed/paid standing against a committed expense.
    /// Both amounts come in as raw form text; unlike draft contributions
    /// these are required fields, so parsing is strict.
    pub async fn add_split(
        &self,
        session: &Session,
        expense_id: i64,
        user_id: UserId,
        raw_owed: &str,
        raw_paid: &str,
    ) -> Result<(), DomainError> {
        let amount_owed = parse_amount(raw_owed, "Amount owed")?;
        let amount_paid = parse_amount(raw_paid, "Amount paid")?;
        let split = ExpenseSplit {
            user_id,
            name: None,
            amount_owed,
            amount_paid,
        };
        self.gateway
            .create_expense_split(session, expense_id, &split)
            .await?;
        info!(expense_id, user_id, "split recorded");
        Ok(())
    }
}

fn parse_amount(raw: &str, field: &str) -> Result<f64, DomainError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(DomainError::Input(format!(
            "{} must be a non-negative number",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::MockGateway;
    use crate::domain::{Contribution, DraftError};

    fn service() -> ExpenseService {
        ExpenseService::new(Arc::new(MockGateway::with_delay(1)))
    }

    fn session() -> Session {
        Session {
            token: "mock-token".into(),
            user_id: 1,
            username: Some("alice".into()),
        }
    }

    #[tokio::test]
    async fn test_group_switch_resets_payments_and_stale_payer() {
        let svc = service();
        let mut draft = ExpenseDraft::default();

        svc.select_group(&session(), &mut draft, 1).await.unwrap();
        assert_eq!(draft.participants.len(), 3);

        draft.paid_by = Some(2); // bob, only in group 1
        draft.contributions = vec![Contribution {
            user_id: 2,
            amount: 10.0,
        }];

        svc.select_group(&session(), &mut draft, 2).await.unwrap();
        assert_eq!(draft.participants.len(), 2);
        assert!(draft.contributions.is_empty());
        assert_eq!(draft.paid_by, None);
    }

    #[tokio::test]
    async fn test_group_switch_reseeds_when_total_known() {
        let svc = service();
        let mut draft = ExpenseDraft::default();
        draft.amount = Some(900.0);

        svc.select_group(&session(), &mut draft, 1).await.unwrap();
        assert_eq!(draft.contributions.len(), 3);
        assert!(draft.contributions.iter().all(|c| c.amount == 300.0));
    }

    #[tokio::test]
    async fn test_set_amount_seeds_but_keeps_explicit_entries() {
        let svc = service();
        let mut draft = ExpenseDraft::default();
        svc.select_group(&session(), &mut draft, 2).await.unwrap();

        svc.set_amount(&mut draft, 100.0);
        assert_eq!(draft.contributions.len(), 2);
        assert!(draft.contributions.iter().all(|c| c.amount == 50.0));

        // Explicit entries survive a later total edit
        draft.contributions = vec![Contribution {
            user_id: 1,
            amount: 80.0,
        }];
        svc.set_amount(&mut draft, 80.0);
        assert_eq!(draft.contributions.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_happy_path() {
        let svc = service();
        let mut draft = ExpenseDraft::default();
        svc.select_group(&session(), &mut draft, 1).await.unwrap();
        draft.paid_by = Some(1);
        draft.description = "Groceries".into();
        svc.set_amount(&mut draft, 900.0);

        svc.submit(&session(), &draft).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_split_parses_strictly() {
        let svc = service();
        let s = session();

        assert!(matches!(
            svc.add_split(&s, 5, 2, "abc", "10").await,
            Err(DomainError::Input(_))
        ));
        assert!(matches!(
            svc.add_split(&s, 5, 2, "-1", "10").await,
            Err(DomainError::Input(_))
        ));
        assert!(svc.splits(&s, 5).await.unwrap().is_empty());

        svc.add_split(&s, 5, 2, " 40.50 ", "0").await.unwrap();
        let splits = svc.splits(&s, 5).await.unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].amount_owed, 40.5);
        assert_eq!(splits[0].amount_paid, 0.0);
    }

    #[tokio::test]
    async fn test_submit_surfaces_draft_errors() {
        let svc = service();
        let mut draft = ExpenseDraft::default();
        svc.select_group(&session(), &mut draft, 1).await.unwrap();
        draft.paid_by = Some(1);
        draft.description = "Groceries".into();
        draft.amount = Some(900.0);
        draft.contributions = vec![Contribution {
            user_id: 1,
            amount: 600.0,
        }];

        match svc.submit(&session(), &draft).await {
            Err(DomainError::Draft(DraftError::ReconciliationMismatch { sum, total })) => {
                assert_eq!(sum, 600.0);
                assert_eq!(total, 900.0);
            }
            other => panic!("expected reconciliation mismatch, got {:?}", other.err()),
        }
    }
}
