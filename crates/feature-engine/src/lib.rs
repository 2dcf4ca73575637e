//! Feature Engineering Engine
//!
//! Turns raw listings into depreciation features and computes the
//! exploratory statistics behind the visualization page: summary figures,
//! equal-width histograms and a Pearson correlation matrix.

mod analysis;
mod correlation;
mod features;
mod histogram;
mod statistics;

pub use analysis::{AnalysisConfig, AnalysisReport, Analyzer};
pub use correlation::{
    build_matrix, pearson, CorrelationCell, CorrelationMatrix, FeatureSet, NamedFeature,
};
pub use features::{DerivedFeature, Derivation, Exclusion, ExclusionReason, FeatureDeriver};
pub use histogram::{histogram, BoundaryPolicy, Histogram, HistogramBucket, DEFAULT_BIN_COUNT};
pub use statistics::{mean, summarize, SummaryStats};
