//! Split validator: reconciliation of per-participant payments against an
//! expense total, plus equal-split derivation.
//!
//! Pure functions over explicit value types. No side effects, no I/O, no
//! internal state — the form layer owns the mutable draft and re-invokes
//! [`validate_draft`] on each submission attempt.

use crate::domain::entities::{
    Contribution, ExpenseDraft, ExpensePayload, ParticipantRef, PaymentEntry, UserId,
};
use crate::domain::errors::DraftError;

/// Split strategy recorded on every submitted expense: equal division,
/// confirmed as explicit per-participant amounts.
pub const EXPENSE_TYPE_EQUAL: &str = "EQUAL";

/// Insert or replace the contribution for `user_id`, returning a new set.
///
/// `raw_amount` is parsed permissively, matching form-entry semantics: a
/// value that fails to parse or is ≤ 0 means "not contributing" and removes
/// any existing entry for that participant. No error is raised for garbage
/// input. All other participants' contributions are preserved unchanged.
pub fn upsert_contribution(
    contributions: &[Contribution],
    user_id: UserId,
    raw_amount: &str,
) -> Vec<Contribution> {
    let amount = raw_amount.trim().parse::<f64>().unwrap_or(0.0);
    let mut next: Vec<Contribution> = contributions
        .iter()
        .filter(|c| c.user_id != user_id)
        .cloned()
        .collect();
    if amount > 0.0 && amount.is_finite() {
        next.push(Contribution { user_id, amount });
    }
    next
}

/// Check that the declared contributions add up to `total`.
///
/// Succeeds only for a non-empty set whose sum equals the total exactly.
/// Equality is exact on the parsed f64 values — no epsilon. This mirrors the
/// behavior the rest of the system relies on, but it can false-negative on
/// amounts that are not exactly representable (thirds of a total entered as
/// 33.33 each); callers seed such cases through [`derive_equal_split`] and
/// let the user adjust the remainder.
pub fn validate_reconciliation(
    total: f64,
    contributions: &[Contribution],
) -> Result<(), DraftError> {
    if contributions.is_empty() {
        return Err(DraftError::EmptyContributions);
    }
    let sum: f64 = contributions.iter().map(|c| c.amount).sum();
    if sum != total {
        return Err(DraftError::ReconciliationMismatch { sum, total });
    }
    Ok(())
}

/// Derive an equal split of `total` across `participant_ids`.
///
/// Each participant is assigned `total / n`, rounded half-up to 2 decimals.
/// The result is advisory: it seeds the payment form when the active group
/// changes and no explicit payments have been entered yet. The committed
/// draft still goes through [`validate_reconciliation`], so a division that
/// does not round evenly (100 across 3 → 33.33 each, summing to 99.99) must
/// be corrected by the user before submission.
pub fn derive_equal_split(
    total: f64,
    participant_ids: &[UserId],
) -> Result<Vec<Contribution>, DraftError> {
    if participant_ids.is_empty() {
        return Err(DraftError::MissingField(vec!["participants"]));
    }
    let share = round_to_2_decimals(total / participant_ids.len() as f64);
    Ok(participant_ids
        .iter()
        .map(|&user_id| Contribution {
            user_id,
            amount: share,
        })
        .collect())
}

fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Validate a complete draft and normalize it for transmission.
///
/// Preconditions, checked in order, first violation returned:
/// 1. `group_id`, `amount`, `description`, `paid_by` all present
///    (aggregated into one `MissingField`)
/// 2. payer is a member of the participant set
/// 3. contributions reconcile against the total
///
/// On success, participants and payments are reduced to the `{user_id}` /
/// `{user_id, amount}` pairs the remote service expects.
pub fn validate_draft(draft: &ExpenseDraft) -> Result<ExpensePayload, DraftError> {
    let mut missing = Vec::new();
    if draft.group_id.is_none() {
        missing.push("group");
    }
    if !draft.amount.is_some_and(|a| a > 0.0) {
        missing.push("amount");
    }
    if draft.description.trim().is_empty() {
        missing.push("description");
    }
    if draft.paid_by.is_none() {
        missing.push("paid by");
    }
    if !missing.is_empty() {
        return Err(DraftError::MissingField(missing));
    }

    // Present by the checks above
    let group_id = draft.group_id.unwrap_or_default();
    let amount = draft.amount.unwrap_or_default();
    let paid_by = draft.paid_by.unwrap_or_default();

    if !draft.participants.iter().any(|p| p.user_id == paid_by) {
        return Err(DraftError::PayerNotMember);
    }

    validate_reconciliation(amount, &draft.contributions)?;

    Ok(ExpensePayload {
        group_id,
        paid_by,
        amount,
        description: draft.description.trim().to_string(),
        expense_type: EXPENSE_TYPE_EQUAL.to_string(),
        participants: draft
            .participants
            .iter()
            .map(|p| ParticipantRef { user_id: p.user_id })
            .collect(),
        payments: draft
            .contributions
            .iter()
            .map(|c| PaymentEntry {
                user_id: c.user_id,
                amount: c.amount,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Participant;

    fn contributions(entries: &[(UserId, f64)]) -> Vec<Contribution> {
        entries
            .iter()
            .map(|&(user_id, amount)| Contribution { user_id, amount })
            .collect()
    }

    fn participant(user_id: UserId, name: &str) -> Participant {
        Participant {
            user_id,
            username: name.to_string(),
            avatar: None,
        }
    }

    fn draft_900() -> ExpenseDraft {
        ExpenseDraft {
            group_id: Some(7),
            amount: Some(900.0),
            description: "Trip hotel".to_string(),
            paid_by: Some(1),
            participants: vec![
                participant(1, "alice"),
                participant(2, "bob"),
                participant(3, "carol"),
            ],
            contributions: contributions(&[(1, 300.0), (2, 300.0), (3, 300.0)]),
        }
    }

    #[test]
    fn upsert_adds_new_contribution() {
        let set = upsert_contribution(&[], 1, "250");
        assert_eq!(set, contributions(&[(1, 250.0)]));
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let set = contributions(&[(1, 100.0), (2, 50.0)]);
        let set = upsert_contribution(&set, 1, "175.5");
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Contribution {
            user_id: 1,
            amount: 175.5
        }));
        assert!(set.contains(&Contribution {
            user_id: 2,
            amount: 50.0
        }));
    }

    #[test]
    fn upsert_is_idempotent() {
        let once = upsert_contribution(&[], 1, "42");
        let twice = upsert_contribution(&once, 1, "42");
        assert_eq!(once, twice);
    }

    #[test]
    fn upsert_zero_removes_entry() {
        let set = contributions(&[(1, 100.0), (2, 50.0)]);
        let set = upsert_contribution(&set, 1, "0");
        assert_eq!(set, contributions(&[(2, 50.0)]));
    }

    #[test]
    fn upsert_zero_is_noop_when_absent() {
        let set = contributions(&[(2, 50.0)]);
        assert_eq!(upsert_contribution(&set, 1, "0"), set);
    }

    #[test]
    fn upsert_garbage_degrades_to_absent() {
        let set = contributions(&[(1, 100.0)]);
        assert!(upsert_contribution(&set, 1, "abc").is_empty());
        assert!(upsert_contribution(&set, 1, "").is_empty());
        assert!(upsert_contribution(&set, 1, "-5").is_empty());
    }

    #[test]
    fn upsert_does_not_mutate_input() {
        let set = contributions(&[(1, 100.0)]);
        let _ = upsert_contribution(&set, 1, "200");
        assert_eq!(set, contributions(&[(1, 100.0)]));
    }

    #[test]
    fn reconciliation_succeeds_on_exact_sum() {
        let set = contributions(&[(1, 300.0), (2, 300.0), (3, 300.0)]);
        assert!(validate_reconciliation(900.0, &set).is_ok());
    }

    #[test]
    fn reconciliation_reports_mismatch_with_both_values() {
        let set = contributions(&[(1, 300.0), (2, 300.0)]);
        assert_eq!(
            validate_reconciliation(900.0, &set),
            Err(DraftError::ReconciliationMismatch {
                sum: 600.0,
                total: 900.0
            })
        );
    }

    #[test]
    fn reconciliation_rejects_empty_set_for_any_total() {
        for total in [1.0, 900.0, 0.01] {
            assert_eq!(
                validate_reconciliation(total, &[]),
                Err(DraftError::EmptyContributions)
            );
        }
    }

    #[test]
    fn equal_split_divides_evenly() {
        let set = derive_equal_split(900.0, &[1, 2, 3]).unwrap();
        assert_eq!(set, contributions(&[(1, 300.0), (2, 300.0), (3, 300.0)]));
        assert!(validate_reconciliation(900.0, &set).is_ok());
    }

    #[test]
    fn equal_split_rounds_shares_to_cents() {
        let set = derive_equal_split(100.0, &[1, 2, 3]).unwrap();
        assert_eq!(set, contributions(&[(1, 33.33), (2, 33.33), (3, 33.33)]));
        // 33.33 * 3 leaves a cent on the table: the advisory split is not
        // guaranteed to reconcile, the user closes the gap in the form.
        assert!(validate_reconciliation(100.0, &set).is_err());
    }

    #[test]
    fn equal_split_rejects_empty_participants() {
        assert_eq!(
            derive_equal_split(100.0, &[]),
            Err(DraftError::MissingField(vec!["participants"]))
        );
    }

    #[test]
    fn draft_normalizes_payload() {
        let payload = validate_draft(&draft_900()).unwrap();
        assert_eq!(payload.group_id, 7);
        assert_eq!(payload.paid_by, 1);
        assert_eq!(payload.amount, 900.0);
        assert_eq!(payload.expense_type, "EQUAL");
        assert_eq!(
            payload.participants,
            vec![
                ParticipantRef { user_id: 1 },
                ParticipantRef { user_id: 2 },
                ParticipantRef { user_id: 3 }
            ]
        );
        assert_eq!(payload.payments.len(), 3);
        assert!(payload.payments.iter().all(|p| p.amount == 300.0));
    }

    #[test]
    fn draft_aggregates_missing_fields() {
        let draft = ExpenseDraft::default();
        assert_eq!(
            validate_draft(&draft),
            Err(DraftError::MissingField(vec![
                "group",
                "amount",
                "description",
                "paid by"
            ]))
        );
    }

    #[test]
    fn draft_rejects_blank_description() {
        let mut draft = draft_900();
        draft.description = "   ".to_string();
        assert_eq!(
            validate_draft(&draft),
            Err(DraftError::MissingField(vec!["description"]))
        );
    }

    #[test]
    fn draft_rejects_stale_payer_before_reconciliation() {
        let mut draft = draft_900();
        draft.paid_by = Some(99);
        // Contributions are also wrong here; the payer check wins.
        draft.contributions = contributions(&[(1, 1.0)]);
        assert_eq!(validate_draft(&draft), Err(DraftError::PayerNotMember));
    }

    #[test]
    fn draft_rejects_unreconciled_contributions() {
        let mut draft = draft_900();
        draft.contributions = contributions(&[(1, 450.0), (2, 450.0), (3, 100.0)]);
        assert_eq!(
            validate_draft(&draft),
            Err(DraftError::ReconciliationMismatch {
                sum: 1000.0,
                total: 900.0
            })
        );
    }

    #[test]
    fn draft_rejects_empty_contributions() {
        let mut draft = draft_900();
        draft.contributions.clear();
        assert_eq!(validate_draft(&draft), Err(DraftError::EmptyContributions));
    }
}
