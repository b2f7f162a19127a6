//! Ledger assembly: balances + settlement suggestions for one group snapshot.

use serde::{Deserialize, Serialize};

use splitledger_core::ParticipantId;

use crate::balance::{compute_balances, BalanceEntry};
use crate::expense::{Expense, Participant};
use crate::settlement::{simplify_settlements, SettlementSuggestion};

/// Result of one ledger computation. Recomputed on every read; nothing here is
/// a source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLedger {
    pub balances: Vec<BalanceEntry>,
    pub settlements: Vec<SettlementSuggestion>,
}

impl SettlementLedger {
    pub fn balance_of(&self, participant: ParticipantId) -> Option<&BalanceEntry> {
        self.balances
            .iter()
            .find(|b| b.participant_id == participant)
    }

    /// Total amount owed to creditors before any settlement.
    pub fn outstanding_cents(&self) -> i64 {
        self.balances.iter().map(|b| b.net_cents.max(0)).sum()
    }

    pub fn is_settled_up(&self) -> bool {
        self.settlements.is_empty()
    }
}

/// Aggregate balances, then simplify them into suggested transfers.
///
/// The snapshot must be fully committed: every expense's payers and shares
/// summing to its total. An inconsistent snapshot produces balances that do
/// not sum to zero.
pub fn build_settlement_ledger(expenses: &[Expense], members: &[Participant]) -> SettlementLedger {
    let balances = compute_balances(expenses, members);
    let settlements = simplify_settlements(&balances);

    tracing::debug!(
        expenses = expenses.len(),
        members = members.len(),
        settlements = settlements.len(),
        "settlement ledger computed"
    );

    SettlementLedger {
        balances,
        settlements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{allocate_at, ExpenseDraft, PayerDraft, ShareDraft};
    use crate::balance::tests::{expense, members, pid};
    use chrono::Utc;
    use proptest::prelude::*;
    use splitledger_core::ExpenseId;
    use std::collections::HashSet;

    #[test]
    fn two_people_one_dinner() {
        let roster = members(&[1, 2]);
        let valid: HashSet<_> = roster.iter().map(|m| m.id).collect();
        let draft = ExpenseDraft {
            description: "Dinner".to_string(),
            total_amount: Some("100.00".into()),
            payers: vec![PayerDraft {
                participant_id: pid(1).to_string(),
                amount: "100.00".into(),
            }],
            shares: vec![
                ShareDraft {
                    participant_id: pid(1).to_string(),
                    weight: 1i64.into(),
                },
                ShareDraft {
                    participant_id: pid(2).to_string(),
                    weight: 1i64.into(),
                },
            ],
            ..ExpenseDraft::default()
        };
        let expense = allocate_at(&draft, &valid, "USD", Utc::now())
            .unwrap()
            .into_expense(ExpenseId::new());

        let ledger = build_settlement_ledger(&[expense], &roster);

        assert_eq!(ledger.balance_of(pid(1)).unwrap().net_cents, 5_000);
        assert_eq!(ledger.balance_of(pid(2)).unwrap().net_cents, -5_000);
        assert_eq!(
            ledger.settlements,
            vec![SettlementSuggestion {
                from: pid(2),
                to: pid(1),
                amount_cents: 5_000,
            }]
        );
        assert_eq!(ledger.outstanding_cents(), 5_000);
    }

    #[test]
    fn three_way_equal_split() {
        let ledger = build_settlement_ledger(&[expense(&[(1, 10_000)], &[1, 2, 3])], &members(&[1, 2, 3]));

        assert_eq!(ledger.balance_of(pid(1)).unwrap().owed_cents, 3_333);
        assert_eq!(ledger.balance_of(pid(3)).unwrap().owed_cents, 3_334);
        assert_eq!(ledger.balance_of(pid(1)).unwrap().net_cents, 6_667);
        let settled: i64 = ledger.settlements.iter().map(|s| s.amount_cents).sum();
        assert_eq!(settled, 6_667);
        assert_eq!(ledger.settlements.len(), 2);
    }

    #[test]
    fn empty_group_history() {
        let ledger = build_settlement_ledger(&[], &members(&[1, 2, 3]));
        assert_eq!(ledger.balances.len(), 3);
        assert!(ledger.is_settled_up());
    }

    #[test]
    fn no_members_means_no_balances() {
        let ledger = build_settlement_ledger(&[expense(&[(1, 100)], &[1, 2])], &[]);
        assert!(ledger.balances.is_empty());
        assert!(ledger.settlements.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: the same snapshot always yields byte-identical output.
        #[test]
        fn ledger_is_idempotent(
            raw in prop::collection::vec(
                (1u128..6, 1i64..100_000i64, prop::collection::vec(1u128..6, 1..5)),
                0..15,
            )
        ) {
            let expenses: Vec<_> = raw
                .iter()
                .map(|(payer, amount, sharers)| {
                    let mut unique = sharers.clone();
                    unique.sort_unstable();
                    unique.dedup();
                    expense(&[(*payer, *amount)], &unique)
                })
                .collect();
            let roster = members(&[1, 2, 3, 4, 5]);

            let first = serde_json::to_vec(&build_settlement_ledger(&expenses, &roster)).unwrap();
            let second = serde_json::to_vec(&build_settlement_ledger(&expenses, &roster)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
