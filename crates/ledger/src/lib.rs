//! Expense ledger engine (allocation, balances, settlement suggestions).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. Every
//! function here is deterministic for a given input and safe to call
//! concurrently without synchronization.

pub mod allocation;
pub mod balance;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod rebalance;
pub mod settlement;
pub mod status;

pub use allocation::{
    allocate, allocate_at, split_by_weight, ExpenseDraft, PayerDraft, ShareDraft,
};
pub use balance::{compute_balances, BalanceEntry};
pub use expense::{AllocatedExpense, Expense, Participant, PayerAllocation, ShareAllocation};
pub use ledger::{build_settlement_ledger, SettlementLedger};
pub use money::{parse_amount_to_cents, parse_weight, NumericInput};
pub use rebalance::remove_participant;
pub use settlement::{simplify_settlements, SettlementSuggestion, SETTLEMENT_EPSILON_CENTS};
pub use status::{
    merge_settlement_statuses, record_settlement_status, InMemorySettlementStatusStore,
    SettlementStatus, SettlementStatusStore, SettlementView, TrackedSettlement,
};
