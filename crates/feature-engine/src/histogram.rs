//! Equal-Width Histogram Binning

use serde::{Deserialize, Serialize};

/// Default number of buckets per histogram
pub const DEFAULT_BIN_COUNT: usize = 8;

/// How the upper edge of the last bucket is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Every bucket is `[low, high)`; the sample maximum is never counted
    HalfOpen,
    /// Last bucket is `[low, max]` so every sample lands in exactly one bucket
    #[default]
    InclusiveLast,
}

/// One interval of the partition with its membership count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

impl HistogramBucket {
    /// Axis label, e.g. `"12.5~15.0"`
    pub fn label(&self) -> String {
        format!("{:.1}~{:.1}", self.low, self.high)
    }
}

/// Histogram binner with a fixed bucket count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    bin_count: usize,
    policy: BoundaryPolicy,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_COUNT, BoundaryPolicy::default())
    }
}

impl Histogram {
    /// Create a binner producing `bin_count` buckets
    pub fn new(bin_count: usize, policy: BoundaryPolicy) -> Self {
        Self { bin_count, policy }
    }

    /// Number of buckets produced for non-empty samples
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Boundary policy in use
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Partition `[min, max]` of `samples` into equal-width buckets.
    ///
    /// Empty input (or `bin_count == 0`) yields no buckets. Non-finite
    /// samples are ignored. A single-valued sample uses a step of 1.
    pub fn compute(&self, samples: &[f64]) -> Vec<HistogramBucket> {
        let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || self.bin_count == 0 {
            return Vec::new();
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (max - min) / self.bin_count as f64;
        let step = if width > 0.0 { width } else { 1.0 };
        let last = self.bin_count - 1;
        let edge = |k: usize| {
            if step.is_finite() {
                min + k as f64 * step
            } else {
                // max - min overflowed, interpolate between the finite bounds
                let t = k as f64 / self.bin_count as f64;
                min * (1.0 - t) + max * t
            }
        };

        (0..self.bin_count)
            .map(|i| {
                let low = edge(i);
                let mut high = edge(i + 1);
                let inclusive = i == last && self.policy == BoundaryPolicy::InclusiveLast;
                if inclusive && max > min {
                    // min + n * step can round away from max
                    high = max;
                }

                let count = finite
                    .iter()
                    .filter(|&&v| v >= low && (v < high || (inclusive && v <= high)))
                    .count();

                HistogramBucket { low, high, count }
            })
            .collect()
    }
}

/// Bin `samples` into `bin_count` buckets with the last bucket inclusive
pub fn histogram(samples: &[f64], bin_count: usize) -> Vec<HistogramBucket> {
    Histogram::new(bin_count, BoundaryPolicy::InclusiveLast).compute(samples)
}
