//! Summary Statistics

use crate::features::DerivedFeature;
use serde::{Deserialize, Serialize};

/// Headline figures over the derived feature set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of listings with complete features
    pub sample_count: usize,
    /// Mean current price (万元)
    pub mean_price: f64,
    /// Mean depreciation rate (fraction, not percent)
    pub mean_depreciation_rate: f64,
}

/// Arithmetic mean, `NaN` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unweighted summary of `features`, or `None` when there are none
pub fn summarize(features: &[DerivedFeature]) -> Option<SummaryStats> {
    if features.is_empty() {
        return None;
    }

    let n = features.len() as f64;
    let price_sum: f64 = features.iter().map(|f| f.current_price).sum();
    let rate_sum: f64 = features.iter().map(|f| f.depreciation_rate).sum();

    Some(SummaryStats {
        sample_count: features.len(),
        mean_price: price_sum / n,
        mean_depreciation_rate: rate_sum / n,
    })
}
