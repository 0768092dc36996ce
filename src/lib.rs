//! Latency regression gate and cross-platform comparison for JSON benchmark
//! results. The `ci_regression` and `compare_platforms` binaries are thin
//! wrappers over [`commands`].

pub mod cli;
pub mod commands;
pub mod compare;
pub mod errors;
pub mod format;
pub mod logging;
pub mod regression;
pub mod report;

pub use crate::compare::{LatencyComparison, PlatformComparison};
pub use crate::errors::BenchCheckError;
pub use crate::regression::{RegressionCheck, RegressionMeasurement, RegressionOutcome};
pub use crate::report::{BenchmarkReport, LatencyStats, load_report};
