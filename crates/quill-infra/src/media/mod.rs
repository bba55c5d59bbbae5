//! Media processing implementations.

mod optimizer;

pub use optimizer::{OptimizerConfig, StandardOptimizer};
