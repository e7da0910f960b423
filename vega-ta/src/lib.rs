#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! Numeric building blocks for the Vega signal engine.
//!
//! This crate provides moving average indicators, crossover detection and ordinary least
//! squares line fitting over plain `f64` sequences. It knows nothing about bars, symbols or
//! time; the `vega` crate layers those on top.

pub mod indicators;
pub mod patterns;
pub mod regression;
