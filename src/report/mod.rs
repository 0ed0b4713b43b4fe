//! Console summary and report files.

pub mod generator;

pub use generator::*;
