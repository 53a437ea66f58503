//! # ds-drift
//!
//! Per-column statistical drift detection between an original and a new
//! dataset snapshot: seasonal-trend decomposition with a signed-rank test
//! on the trend for time-series columns, and new-value detection for
//! categorical columns.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod categorical;
pub mod decompose;
pub mod trend;
pub mod wilcoxon;

pub use categorical::{detect_new_categories, NewCategories};
pub use decompose::{seasonal_decompose, Decomposition};
pub use trend::{detect_trend_change, TrendChange, TREND_SIGNIFICANCE_LEVEL};
pub use wilcoxon::{wilcoxon_signed_rank, WilcoxonResult};
