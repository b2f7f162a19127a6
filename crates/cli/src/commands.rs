//! JSON-in/JSON-out commands.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use splitledger_core::ParticipantId;
use splitledger_ledger::{
    allocate, build_settlement_ledger, merge_settlement_statuses, AllocatedExpense, BalanceEntry,
    Expense, ExpenseDraft, Participant, SettlementView, TrackedSettlement,
};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "splitledger", about = "Expense allocation and settlement engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Validate an expense draft and split it into whole cents
    Allocate {
        /// Request JSON file; stdin when omitted or `-`
        input: Option<PathBuf>,
    },
    /// Compute balances and suggested settlements for a group snapshot
    Ledger {
        /// Request JSON file; stdin when omitted or `-`
        input: Option<PathBuf>,
    },
}

impl Command {
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Command::Allocate { input } | Command::Ledger { input } => input.as_ref(),
        }
    }
}

/// Input of `allocate`.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocateRequest {
    pub valid_participant_ids: Vec<ParticipantId>,
    pub expense: ExpenseDraft,
}

/// Input of `ledger`: a committed snapshot of one group.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRequest {
    pub members: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Persisted settlement statuses to join against.
    #[serde(default)]
    pub tracked: Vec<TrackedSettlement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerResponse {
    pub balances: Vec<BalanceEntry>,
    pub settlements: Vec<SettlementView>,
}

/// Validation failures come back as `splitledger_core::DomainError` inside the
/// `anyhow::Error`, so callers can `downcast_ref` and show the bare reason.
pub fn run_allocate(input: &str, config: &Config) -> anyhow::Result<AllocatedExpense> {
    let request: AllocateRequest =
        serde_json::from_str(input).context("failed to parse allocate request")?;
    let valid: HashSet<ParticipantId> = request.valid_participant_ids.into_iter().collect();

    let allocated = allocate(&request.expense, &valid, &config.fallback_currency)?;
    Ok(allocated)
}

pub fn run_ledger(input: &str) -> anyhow::Result<LedgerResponse> {
    let request: LedgerRequest =
        serde_json::from_str(input).context("failed to parse ledger request")?;

    for expense in request.expenses.iter().filter(|e| !e.is_balanced()) {
        tracing::warn!(
            expense_id = %expense.id,
            total_amount_cents = expense.total_amount_cents,
            "expense allocations do not sum to its total; balances will not reconcile"
        );
    }

    let ledger = build_settlement_ledger(&request.expenses, &request.members);
    let settlements = merge_settlement_statuses(&ledger.settlements, &request.tracked);

    tracing::info!(
        members = request.members.len(),
        expenses = request.expenses.len(),
        settlements = settlements.len(),
        "ledger computed"
    );

    Ok(LedgerResponse {
        balances: ledger.balances,
        settlements,
    })
}

/// Run `command` on `input` and render the result as pretty JSON.
pub fn run(command: &Command, input: &str, config: &Config) -> anyhow::Result<String> {
    let output = match command {
        Command::Allocate { .. } => serde_json::to_string_pretty(&run_allocate(input, config)?)?,
        Command::Ledger { .. } => serde_json::to_string_pretty(&run_ledger(input)?)?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        let cli = Cli::try_parse_from(["splitledger", "allocate", "draft.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Allocate {
                input: Some(PathBuf::from("draft.json"))
            }
        );

        let cli = Cli::try_parse_from(["splitledger", "ledger"]).unwrap();
        assert_eq!(cli.command, Command::Ledger { input: None });
        assert_eq!(cli.command.input(), None);

        assert!(Cli::try_parse_from(["splitledger", "settle"]).is_err());
        assert!(Cli::try_parse_from(["splitledger"]).is_err());
    }

    #[test]
    fn command_help_renders() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn malformed_json_is_reported_with_context() {
        let err = run_ledger("{not json").unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to parse ledger request"));
    }
}
