//! Balance aggregator: one net position per participant across a group's
//! expense history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use splitledger_core::ParticipantId;

use crate::expense::{Expense, Participant};

/// Derived net position of one participant. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub participant_id: ParticipantId,
    pub paid_cents: i64,
    pub owed_cents: i64,
    /// `paid_cents - owed_cents`; positive means the group owes this participant.
    pub net_cents: i64,
}

impl BalanceEntry {
    pub fn is_settled(&self) -> bool {
        self.net_cents == 0
    }
}

/// Fold every expense's payer and share allocations into per-member balances.
///
/// Output follows roster order (first occurrence wins for repeated ids), and
/// every roster member appears even with no activity. Allocations referencing
/// ids outside the roster are ignored.
pub fn compute_balances(expenses: &[Expense], members: &[Participant]) -> Vec<BalanceEntry> {
    // Running (paid, owed) totals, widened so long histories cannot overflow.
    let mut totals: Vec<(ParticipantId, i128, i128)> = Vec::with_capacity(members.len());
    let mut index: HashMap<ParticipantId, usize> = HashMap::with_capacity(members.len());

    for member in members {
        if !index.contains_key(&member.id) {
            index.insert(member.id, totals.len());
            totals.push((member.id, 0, 0));
        }
    }

    for expense in expenses {
        for payer in &expense.payers {
            if let Some(&slot) = index.get(&payer.participant_id) {
                totals[slot].1 += payer.amount_cents as i128;
            }
        }
        for share in &expense.shares {
            if let Some(&slot) = index.get(&share.participant_id) {
                totals[slot].2 += share.amount_cents as i128;
            }
        }
    }

    totals
        .into_iter()
        .map(|(participant_id, paid, owed)| BalanceEntry {
            participant_id,
            paid_cents: saturate(paid),
            owed_cents: saturate(owed),
            net_cents: saturate(paid - owed),
        })
        .collect()
}

/// Clamp into `i64`. Only reachable with totals no allocation accepts.
fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
