//! The settlement and share-calculation engine.
//!
//! Everything in here is a pure function over the trip snapshot it is given:
//! no I/O, no shared state, no caching. The pipeline is rate resolution
//! ([`rates`]), share allocation ([`shares`]), ledger building ([`ledger`])
//! and debt reduction ([`settlement`]); it is re-run from scratch whenever
//! the underlying data changes.

pub mod ledger;
pub mod rates;
pub mod settlement;
pub mod shares;

/// Amounts within one cent of each other are considered equal. Splitting
/// rarely divides exactly and repeated division leaves floating-point drift,
/// so every comparison in the engine goes through this tolerance.
pub const TOLERANCE: f64 = 0.01;
