//! Allocation engine: turns a submitted expense draft into cent-exact payer and
//! share allocations.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use splitledger_core::{DomainError, DomainResult, ParticipantId};

use crate::expense::{AllocatedExpense, PayerAllocation, ShareAllocation};
use crate::money::{parse_amount_to_cents, parse_weight, round_to_whole, NumericInput};

/// One submitted payer line: who paid and how much (major units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerDraft {
    pub participant_id: String,
    pub amount: NumericInput,
}

/// One submitted share line: who takes part and with which weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareDraft {
    pub participant_id: String,
    pub weight: NumericInput,
}

/// Raw expense payload as submitted by a user. Nothing here is trusted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseDraft {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_amount: Option<NumericInput>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<String>,
    #[serde(default)]
    pub payers: Vec<PayerDraft>,
    #[serde(default)]
    pub shares: Vec<ShareDraft>,
}

/// Largest accepted expense total: one trillion in major units.
///
/// Keeps every per-participant sum over a group's history far inside `i64`.
pub const MAX_TOTAL_AMOUNT_CENTS: i64 = 100_000_000_000_000;

/// Validate and allocate a draft, using the current time when `occurred_at` is
/// missing or unparsable.
pub fn allocate(
    draft: &ExpenseDraft,
    valid_participants: &HashSet<ParticipantId>,
    fallback_currency: &str,
) -> DomainResult<AllocatedExpense> {
    allocate_at(draft, valid_participants, fallback_currency, Utc::now())
}

/// Same as [`allocate`] with an explicit clock.
///
/// Checks run in a fixed order and the first failure is returned; there is
/// never a partial result.
pub fn allocate_at(
    draft: &ExpenseDraft,
    valid_participants: &HashSet<ParticipantId>,
    fallback_currency: &str,
    now: DateTime<Utc>,
) -> DomainResult<AllocatedExpense> {
    let description = draft.description.trim();
    if description.is_empty() {
        return Err(reject("Description is required"));
    }

    let total_amount_cents = draft
        .total_amount
        .as_ref()
        .and_then(parse_amount_to_cents)
        .filter(|cents| *cents > 0)
        .ok_or_else(|| reject("Total amount must be greater than zero"))?;
    if total_amount_cents > MAX_TOTAL_AMOUNT_CENTS {
        return Err(reject("Total amount is too large"));
    }

    let payers = collect_payers(&draft.payers, valid_participants, total_amount_cents)?;
    let weights = collect_weights(&draft.shares, valid_participants)?;
    let shares = split_by_weight(total_amount_cents, &weights)?;

    let allocated = AllocatedExpense {
        description: description.to_string(),
        currency: normalize_currency(draft.currency.as_deref(), fallback_currency),
        total_amount_cents,
        occurred_at: normalize_occurred_at(draft.occurred_at.as_deref(), now),
        payers,
        shares,
    };

    tracing::debug!(
        total_amount_cents,
        payers = allocated.payers.len(),
        shares = allocated.shares.len(),
        "expense allocated"
    );

    Ok(allocated)
}

/// Split `total_cents` across `weights` in the given order.
///
/// Every entry but the last gets `round(w / Σw × total)` (halves away from
/// zero); the last entry gets whatever is left, so the amounts always sum to
/// `total_cents` exactly. Weights are expected to be positive.
pub fn split_by_weight(
    total_cents: i64,
    weights: &[(ParticipantId, Decimal)],
) -> DomainResult<Vec<ShareAllocation>> {
    if weights.is_empty() {
        return Err(reject("Include at least one participant with a weight"));
    }

    let total_weight: Decimal = weights.iter().map(|(_, weight)| *weight).sum();
    if total_weight <= Decimal::ZERO {
        return Err(reject("Participant weights must total more than zero"));
    }

    let total = Decimal::from(total_cents);
    let last = weights.len() - 1;
    let mut distributed: i128 = 0;
    let mut shares = Vec::with_capacity(weights.len());

    for (index, (participant_id, weight)) in weights.iter().enumerate() {
        let amount_cents = if index == last {
            i64::try_from(total_cents as i128 - distributed)
                .map_err(|_| DomainError::invariant("share amount out of range"))?
        } else {
            weight
                .checked_div(total_weight)
                .and_then(|ratio| ratio.checked_mul(total))
                .map(round_to_whole)
                .and_then(|amount| amount.to_i64())
                .ok_or_else(|| DomainError::invariant("share amount out of range"))?
        };
        distributed += amount_cents as i128;
        shares.push(ShareAllocation {
            participant_id: *participant_id,
            weight: *weight,
            amount_cents,
        });
    }

    Ok(shares)
}

fn reject(reason: &str) -> DomainError {
    tracing::debug!(reason, "expense draft rejected");
    DomainError::validation(reason)
}

/// Unknown ids (unparsable or not in the group) resolve to `None`.
fn resolve_participant(raw: &str, valid: &HashSet<ParticipantId>) -> Option<ParticipantId> {
    raw.parse::<ParticipantId>()
        .ok()
        .filter(|id| valid.contains(id))
}

fn collect_payers(
    drafts: &[PayerDraft],
    valid: &HashSet<ParticipantId>,
    total_amount_cents: i64,
) -> DomainResult<Vec<PayerAllocation>> {
    let payers: Vec<PayerAllocation> = drafts
        .iter()
        .filter_map(|draft| {
            let participant_id = resolve_participant(&draft.participant_id, valid)?;
            let amount_cents = parse_amount_to_cents(&draft.amount).filter(|c| *c > 0)?;
            Some(PayerAllocation {
                participant_id,
                amount_cents,
            })
        })
        .collect();

    if payers.is_empty() {
        return Err(reject("At least one payer with an amount is required"));
    }

    let mut seen = HashSet::with_capacity(payers.len());
    if !payers.iter().all(|p| seen.insert(p.participant_id)) {
        return Err(reject("Duplicate payer entries detected"));
    }

    let paid: i128 = payers.iter().map(|p| p.amount_cents as i128).sum();
    if paid != total_amount_cents as i128 {
        return Err(reject("Payer amounts must add up to the total"));
    }

    Ok(payers)
}

fn collect_weights(
    drafts: &[ShareDraft],
    valid: &HashSet<ParticipantId>,
) -> DomainResult<Vec<(ParticipantId, Decimal)>> {
    let weights: Vec<(ParticipantId, Decimal)> = drafts
        .iter()
        .filter_map(|draft| {
            let participant_id = resolve_participant(&draft.participant_id, valid)?;
            let weight = parse_weight(&draft.weight)?;
            Some((participant_id, weight))
        })
        .collect();

    if weights.is_empty() {
        return Err(reject("Include at least one participant with a weight"));
    }

    let mut seen = HashSet::with_capacity(weights.len());
    if !weights.iter().all(|(id, _)| seen.insert(*id)) {
        return Err(reject("Duplicate participant entries detected"));
    }

    Ok(weights)
}

fn normalize_currency(raw: Option<&str>, fallback: &str) -> String {
    raw.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| fallback.to_string())
}

/// Zoneless datetimes accepted after RFC 3339, read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// RFC 3339 timestamps, zoneless `YYYY-MM-DDTHH:MM[:SS]` datetimes (UTC) and
/// plain `YYYY-MM-DD` dates are accepted; anything else falls back to `now`.
fn normalize_occurred_at(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return now;
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return naive.and_utc();
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}
