//! # lobsim
//!
//! A discrete-event limit-order-book backtesting core for market-making strategies.
//!
//! Given a time-ordered replay of order-book snapshots and anonymous trade prints, and a strategy
//! that reacts to updates by placing and cancelling orders, [`Simulator`](simulator::Simulator)
//! produces, in time order, the market-data updates delivered to the strategy and the own-trade
//! executions that would have occurred against the replayed market. Both execution latency
//! (strategy → exchange) and market-data latency (exchange → strategy) are modelled explicitly.
//!
//! The simulator is deliberately narrow: single asset, full fills only, no queue-position or fee
//! modelling. What it does model — the indexed resting-order ladder and the three-queue event
//! loop — is built to be correct and fast to match against, not to be a complete exchange
//! simulation.

/// Defines the core value types: sides, orders, market-data events, and fills.
pub mod types;

/// The price-indexed resting-order ladder.
pub mod ladder;

/// The market-data, action, and strategy-update queues the simulator drains.
pub mod queue;

/// The event-loop core.
pub mod simulator;

/// Error types returned by the simulator.
pub mod error;

/// Re-exports the types a strategy typically needs.
pub mod prelude;
