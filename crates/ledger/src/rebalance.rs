//! Re-proportioning an expense when a participant leaves the group.
//!
//! Both sides are re-split through [`split_by_weight`], so the rounding policy
//! is the same one the allocation engine uses.

use rust_decimal::Decimal;

use splitledger_core::{DomainError, DomainResult, ParticipantId};

use crate::allocation::split_by_weight;
use crate::expense::{Expense, PayerAllocation};

/// Remove `participant` from both sides of `expense` and redistribute the total.
///
/// Remaining shares keep their weights; remaining payers are weighted by what
/// they had paid. A side the participant was not on is left untouched.
pub fn remove_participant(expense: &Expense, participant: ParticipantId) -> DomainResult<Expense> {
    let was_payer = expense.payers.iter().any(|p| p.participant_id == participant);
    let was_sharer = expense.shares.iter().any(|s| s.participant_id == participant);
    if !was_payer && !was_sharer {
        return Err(DomainError::not_found());
    }

    let total = expense.total_amount_cents;

    let shares = if was_sharer {
        let weights: Vec<(ParticipantId, Decimal)> = expense
            .shares
            .iter()
            .filter(|s| s.participant_id != participant)
            .map(|s| (s.participant_id, s.weight))
            .collect();
        if weights.is_empty() {
            return Err(DomainError::invariant("expense would have no participants left"));
        }
        split_by_weight(total, &weights)?
    } else {
        expense.shares.clone()
    };

    let payers = if was_payer {
        let weights: Vec<(ParticipantId, Decimal)> = expense
            .payers
            .iter()
            .filter(|p| p.participant_id != participant)
            .map(|p| (p.participant_id, Decimal::from(p.amount_cents)))
            .collect();
        if weights.is_empty() {
            return Err(DomainError::invariant("expense would have no payers left"));
        }
        let payers: Vec<PayerAllocation> = split_by_weight(total, &weights)?
            .into_iter()
            .map(|s| PayerAllocation {
                participant_id: s.participant_id,
                amount_cents: s.amount_cents,
            })
            .collect();
        if payers.iter().any(|p| p.amount_cents <= 0) {
            return Err(DomainError::invariant("rebalanced payer amount must be positive"));
        }
        payers
    } else {
        expense.payers.clone()
    };

    tracing::debug!(
        expense_id = %expense.id,
        participant_id = %participant,
        was_payer,
        was_sharer,
        "participant removed from expense"
    );

    Ok(Expense {
        payers,
        shares,
        ..expense.clone()
    })
}
