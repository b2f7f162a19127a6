//! Settlement simplifier: greedy matching of debtors against creditors.
//!
//! The result is small and correct, not minimal. Finding the true minimum
//! number of transfers is NP-hard and deliberately not attempted.

use serde::{Deserialize, Serialize};

use splitledger_core::ParticipantId;

use crate::balance::BalanceEntry;

/// Residual (in cents) at or below which a party counts as settled.
pub const SETTLEMENT_EPSILON_CENTS: i64 = 1;

/// "`from` should pay `to` `amount_cents`."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementSuggestion {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount_cents: i64,
}

#[derive(Debug)]
struct Position {
    participant_id: ParticipantId,
    net_cents: i64,
}

/// Reduce net balances to a list of suggested transfers.
///
/// Debtors are visited most-negative first and creditors most-positive first;
/// ties keep input order. Each step settles `min(credit, debt)` between the
/// current pair. At most `n - 1` suggestions are produced for `n` non-zero
/// balances.
pub fn simplify_settlements(balances: &[BalanceEntry]) -> Vec<SettlementSuggestion> {
    let mut debtors: Vec<Position> = balances
        .iter()
        .filter(|b| b.net_cents < 0)
        .map(|b| Position {
            participant_id: b.participant_id,
            net_cents: b.net_cents,
        })
        .collect();
    let mut creditors: Vec<Position> = balances
        .iter()
        .filter(|b| b.net_cents > 0)
        .map(|b| Position {
            participant_id: b.participant_id,
            net_cents: b.net_cents,
        })
        .collect();

    // Stable sorts: equal balances keep roster order.
    debtors.sort_by_key(|p| p.net_cents);
    creditors.sort_by_key(|p| core::cmp::Reverse(p.net_cents));

    let mut settlements = Vec::with_capacity(debtors.len() + creditors.len());
    let mut d = 0;
    let mut c = 0;

    while d < debtors.len() && c < creditors.len() {
        let debtor = &debtors[d];
        let creditor = &creditors[c];
        let amount = creditor.net_cents.min(debtor.net_cents.saturating_neg());

        if amount <= 0 {
            if debtor.net_cents >= 0 {
                d += 1;
            }
            if creditor.net_cents <= 0 {
                c += 1;
            }
            continue;
        }

        settlements.push(SettlementSuggestion {
            from: debtor.participant_id,
            to: creditor.participant_id,
            amount_cents: amount,
        });

        debtors[d].net_cents += amount;
        creditors[c].net_cents -= amount;

        if debtors[d].net_cents.abs() <= SETTLEMENT_EPSILON_CENTS {
            debtors[d].net_cents = 0;
            d += 1;
        }
        if creditors[c].net_cents.abs() <= SETTLEMENT_EPSILON_CENTS {
            creditors[c].net_cents = 0;
            c += 1;
        }
    }

    settlements
}
