//! Fee aggregation, banding and cross-city comparison.
//!
//! Averages are computed either directly over location records or as a
//! count-weighted rollup of per-city summaries. Each location's recurring fee
//! is then banded High/Medium/Low against the average of its dataset.

pub mod aggregate;
pub mod band;
pub mod comparison;
pub mod types;
pub mod utility;
