#![doc(test(attr(deny(warnings))))]

//! Cashbook records income and expense transactions, keeps running totals,
//! renders them through a pluggable surface and persists them to a
//! key-value store.

pub mod cli;
pub mod config;
pub mod controller;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod render;
pub mod storage;
pub mod utils;
pub mod validation;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashbook tracing initialized.");
    });
}
