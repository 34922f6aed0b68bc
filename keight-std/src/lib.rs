//! # keight-std
//!
//! Standard routing strategies for the keight path dispatch engine.
//!
//! This crate provides:
//! - **Linear scans**: [`NaiveLinearRouter`](routing::NaiveLinearRouter),
//!   [`PrefixLinearRouter`](routing::PrefixLinearRouter),
//!   [`FixedLinearRouter`](routing::FixedLinearRouter)
//! - **Combined expressions**: naive, smart, nested, optimized, sliced and
//!   hashed regexp routers
//! - **Segment automaton**: [`StateMachineRouter`](routing::StateMachineRouter)
//! - **Test fixtures**: the [`testing`] corpus every strategy must agree on

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use keight_core;

// Modules
pub mod routing;
pub mod testing;
