//! Rental Pricing Engine
//!
//! This crate prices vehicle rentals against effective-dated rate tables,
//! applies surcharges and discounts, charges for overdue returns, and keeps
//! an append-only payment ledger per rental. An axum router exposes the
//! same operations over JSON, with follow-up documents queued in an outbox.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod documents;
pub mod error;
pub mod ledger;
pub mod models;
pub mod rentals;

#[cfg(test)]
pub(crate) mod test_support;
