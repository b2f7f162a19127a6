//! Command-line surface over the ledger engine.
//!
//! Reads one JSON document, runs a single pure computation, and returns JSON.

pub mod commands;
pub mod config;

pub use commands::{
    run, run_allocate, run_ledger, AllocateRequest, Cli, Command, LedgerRequest, LedgerResponse,
};
pub use config::Config;
