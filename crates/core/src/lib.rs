//! `splitledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, and the entity marker shared by the ledger
//! engine.
//!
//! Identifiers are UUIDs. Membership systems that mint other id formats (cuid,
//! numeric keys) must map them to UUIDs before handing data to the ledger;
//! non-UUID participant ids are treated as unknown by allocation and fail to
//! deserialize in ledger snapshots.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ExpenseId, GroupId, ParticipantId};
