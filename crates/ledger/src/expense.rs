use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use splitledger_core::{Entity, ExpenseId, ParticipantId};

/// A group member as seen by the ledger.
///
/// Identity and display fields are owned by the membership system; the ledger
/// treats the whole record as an immutable value keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Participant {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            name: None,
            email: None,
        }
    }

    pub fn named(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            email: None,
        }
    }
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Money actually paid by one participant for one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerAllocation {
    pub participant_id: ParticipantId,
    /// Positive amount in cents.
    pub amount_cents: i64,
}

/// The part of one expense a participant is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareAllocation {
    pub participant_id: ParticipantId,
    /// Relative proportion (not a percentage). Always `> 0`.
    pub weight: Decimal,
    pub amount_cents: i64,
}

/// Output of the allocation engine: a validated, cent-exact expense that has
/// not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedExpense {
    pub description: String,
    pub currency: String,
    pub total_amount_cents: i64,
    pub occurred_at: DateTime<Utc>,
    pub payers: Vec<PayerAllocation>,
    pub shares: Vec<ShareAllocation>,
}

impl AllocatedExpense {
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            description: self.description,
            currency: self.currency,
            total_amount_cents: self.total_amount_cents,
            occurred_at: self.occurred_at,
            payers: self.payers,
            shares: self.shares,
        }
    }
}

/// A committed expense with resolved allocations.
///
/// Invariants (established by the allocation engine, assumed by aggregation):
/// payer amounts and share amounts each sum to `total_amount_cents`, and no
/// participant appears twice on either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub currency: String,
    pub total_amount_cents: i64,
    pub occurred_at: DateTime<Utc>,
    pub payers: Vec<PayerAllocation>,
    pub shares: Vec<ShareAllocation>,
}

impl Expense {
    pub fn paid_total_cents(&self) -> i128 {
        self.payers.iter().map(|p| p.amount_cents as i128).sum()
    }

    pub fn share_total_cents(&self) -> i128 {
        self.shares.iter().map(|s| s.amount_cents as i128).sum()
    }

    /// Whether both allocation sides sum exactly to the total.
    pub fn is_balanced(&self) -> bool {
        let total = self.total_amount_cents as i128;
        self.paid_total_cents() == total && self.share_total_cents() == total
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.payers.iter().any(|p| p.participant_id == participant)
            || self.shares.iter().any(|s| s.participant_id == participant)
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
