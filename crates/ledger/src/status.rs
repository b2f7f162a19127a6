//! Settlement status tracking (pending/requested/paid), kept outside the pure
//! ledger computation.
//!
//! Suggestions are recomputed on every read and carry no history. Whether a
//! human has requested or confirmed a transfer lives in a separate store keyed
//! by `(group, from, to)`, and callers join the two with
//! [`merge_settlement_statuses`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{DomainError, DomainResult, GroupId, ParticipantId};

use crate::settlement::SettlementSuggestion;

/// Human-confirmed state of a suggested transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Requested,
    Paid,
    Cancelled,
}

/// Persisted status record for one `(from, to)` pair in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSettlement {
    pub group_id: GroupId,
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Amount at the time the record was first created.
    pub amount_cents: i64,
    pub status: SettlementStatus,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// A suggestion joined with its tracked status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementView {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount_cents: i64,
    pub status: SettlementStatus,
}

/// Group-isolated store for settlement status records.
pub trait SettlementStatusStore: Send + Sync {
    fn get(&self, group_id: GroupId, from: ParticipantId, to: ParticipantId)
    -> Option<TrackedSettlement>;
    fn upsert(&self, record: TrackedSettlement);
    /// All records of a group, ordered by `(from, to)`.
    fn list(&self, group_id: GroupId) -> Vec<TrackedSettlement>;
    fn clear_group(&self, group_id: GroupId);
}

impl<S> SettlementStatusStore for Arc<S>
where
    S: SettlementStatusStore + ?Sized,
{
    fn get(
        &self,
        group_id: GroupId,
        from: ParticipantId,
        to: ParticipantId,
    ) -> Option<TrackedSettlement> {
        (**self).get(group_id, from, to)
    }

    fn upsert(&self, record: TrackedSettlement) {
        (**self).upsert(record)
    }

    fn list(&self, group_id: GroupId) -> Vec<TrackedSettlement> {
        (**self).list(group_id)
    }

    fn clear_group(&self, group_id: GroupId) {
        (**self).clear_group(group_id)
    }
}

type StatusKey = (GroupId, ParticipantId, ParticipantId);

/// In-memory status store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySettlementStatusStore {
    inner: RwLock<HashMap<StatusKey, TrackedSettlement>>,
}

impl InMemorySettlementStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettlementStatusStore for InMemorySettlementStatusStore {
    fn get(
        &self,
        group_id: GroupId,
        from: ParticipantId,
        to: ParticipantId,
    ) -> Option<TrackedSettlement> {
        let map = self.inner.read().ok()?;
        map.get(&(group_id, from, to)).cloned()
    }

    fn upsert(&self, record: TrackedSettlement) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((record.group_id, record.from, record.to), record);
        }
    }

    fn list(&self, group_id: GroupId) -> Vec<TrackedSettlement> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut records: Vec<TrackedSettlement> = map
            .iter()
            .filter(|((g, _, _), _)| *g == group_id)
            .map(|(_, v)| v.clone())
            .collect();
        records.sort_by_key(|r| (r.from, r.to));
        records
    }

    fn clear_group(&self, group_id: GroupId) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|(g, _, _), _| *g != group_id);
        }
    }
}

/// Create or update the status record for `(from, to)`.
///
/// A new record takes `amount_cents`; an existing one keeps its amount and only
/// changes status. `requested_at`/`paid_at` are stamped with `now` when moving
/// to `Requested`/`Paid`.
pub fn record_settlement_status<S>(
    store: &S,
    group_id: GroupId,
    from: ParticipantId,
    to: ParticipantId,
    amount_cents: i64,
    status: SettlementStatus,
    now: DateTime<Utc>,
) -> DomainResult<TrackedSettlement>
where
    S: SettlementStatusStore + ?Sized,
{
    if from == to {
        return Err(DomainError::validation("Cannot settle with yourself"));
    }

    let mut record = match store.get(group_id, from, to) {
        Some(existing) => existing,
        None => {
            if amount_cents <= 0 {
                return Err(DomainError::validation(
                    "Settlement amount must be greater than zero",
                ));
            }
            TrackedSettlement {
                group_id,
                from,
                to,
                amount_cents,
                status,
                requested_at: None,
                paid_at: None,
            }
        }
    };

    record.status = status;
    match status {
        SettlementStatus::Requested => record.requested_at = Some(now),
        SettlementStatus::Paid => record.paid_at = Some(now),
        SettlementStatus::Pending | SettlementStatus::Cancelled => {}
    }

    tracing::info!(
        group_id = %group_id,
        from = %from,
        to = %to,
        status = ?status,
        "settlement status recorded"
    );

    store.upsert(record.clone());
    Ok(record)
}

/// Attach tracked statuses to freshly computed suggestions.
///
/// Matching is by exact `(from, to)` pair; suggestions without a record are
/// `Pending`. Suggestion amounts are never replaced by tracked amounts.
pub fn merge_settlement_statuses(
    suggestions: &[SettlementSuggestion],
    tracked: &[TrackedSettlement],
) -> Vec<SettlementView> {
    let mut by_pair: HashMap<(ParticipantId, ParticipantId), SettlementStatus> =
        HashMap::with_capacity(tracked.len());
    for record in tracked {
        by_pair.entry((record.from, record.to)).or_insert(record.status);
    }

    suggestions
        .iter()
        .map(|s| SettlementView {
            from: s.from,
            to: s.to,
            amount_cents: s.amount_cents,
            status: by_pair.get(&(s.from, s.to)).copied().unwrap_or_default(),
        })
        .collect()
}
