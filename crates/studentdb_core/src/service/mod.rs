//! Use-case services driven by the interactive shell.
//!
//! # Responsibility
//! - Pair each store or ledger call with its activity line.
//! - Route capabilities by role.
//!
//! # Invariants
//! - The record store stays unaware of who calls it.

pub mod account_service;
pub mod session;
