//! Binary-local application orchestration.
//!
//! `main.rs` keeps process setup (tracing, argv); this module decides which
//! role to run and turns outcomes into exit codes.

pub(crate) mod entry;
mod send;
mod serve;
