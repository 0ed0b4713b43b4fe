//! Analysis modules.
//!
//! Rating aggregation over a whole target.

pub mod aggregator;

pub use aggregator::*;
