//! Benchmark categories

pub mod frame;
pub mod march;
