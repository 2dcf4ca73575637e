//! One-Pass Exploratory Analysis

use crate::correlation::{CorrelationMatrix, FeatureSet};
use crate::features::{DerivedFeature, Exclusion, FeatureDeriver};
use crate::histogram::{BoundaryPolicy, Histogram, HistogramBucket, DEFAULT_BIN_COUNT};
use crate::statistics::{summarize, SummaryStats};
use field_parser::{FieldNames, ListingParser, YearMonth};
use listing_model::RawListing;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Buckets per histogram
    pub bin_count: usize,
    /// Treatment of the histogram maximum
    pub boundary: BoundaryPolicy,
    /// Info keys to read from listings
    pub fields: FieldNames,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            boundary: BoundaryPolicy::default(),
            fields: FieldNames::default(),
        }
    }
}

/// Everything the visualization page renders, computed from one derived set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Month that ages were measured against
    pub reference: YearMonth,
    /// Listings supplied
    pub input_count: usize,
    /// Headline figures, absent when no listing was usable
    pub summary: Option<SummaryStats>,
    /// Current price distribution
    pub price_histogram: Vec<HistogramBucket>,
    /// Age (years) distribution
    pub age_histogram: Vec<HistogramBucket>,
    /// Depreciation rate distribution
    pub depreciation_histogram: Vec<HistogramBucket>,
    /// Pairwise feature correlations
    pub correlation: CorrelationMatrix,
    /// Derived features, for scatter plots
    pub features: Vec<DerivedFeature>,
    /// Listings left out and why
    pub exclusions: Vec<Exclusion>,
}

impl AnalysisReport {
    /// Number of listings that made it into the statistics
    pub fn sample_count(&self) -> usize {
        self.features.len()
    }
}

/// Runs the full analysis over a listing collection
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    histogram: Histogram,
    feature_set: FeatureSet,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    /// Create an analyzer correlating the default feature set
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_feature_set(config, FeatureSet::default())
    }

    /// Create an analyzer correlating a custom feature set
    pub fn with_feature_set(config: AnalysisConfig, feature_set: FeatureSet) -> Self {
        Self {
            histogram: Histogram::new(config.bin_count, config.boundary),
            config,
            feature_set,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a complete listing collection, measuring ages against `reference`
    pub fn run(&self, listings: &[RawListing], reference: YearMonth) -> AnalysisReport {
        let parser = ListingParser::new(self.config.fields.clone());
        let derivation = FeatureDeriver::with_parser(parser, reference).derive_all(listings);
        let features = derivation.features;

        let prices: Vec<f64> = features.iter().map(|f| f.current_price).collect();
        let ages: Vec<f64> = features.iter().map(|f| f.age_years).collect();
        let rates: Vec<f64> = features.iter().map(|f| f.depreciation_rate).collect();

        let report = AnalysisReport {
            reference,
            input_count: listings.len(),
            summary: summarize(&features),
            price_histogram: self.histogram.compute(&prices),
            age_histogram: self.histogram.compute(&ages),
            depreciation_histogram: self.histogram.compute(&rates),
            correlation: CorrelationMatrix::build(&features, &self.feature_set),
            features,
            exclusions: derivation.exclusions,
        };

        info!(
            "Analysis complete: {} of {} listings usable, {} buckets per histogram",
            report.sample_count(),
            report.input_count,
            self.config.bin_count
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing_model::fields;

    fn reference() -> YearMonth {
        YearMonth::new(2024, 4).unwrap()
    }

    #[test]
    fn test_end_to_end_single_complete_listing() {
        let listings = vec![
            RawListing::new("complete")
                .with_field(fields::REGISTRATION_DATE, "2018年04月")
                .with_field(fields::NEW_PRICE, 30.0)
                .with_field(fields::CURRENT_PRICE, 20.0)
                .with_field(fields::SAVED_AMOUNT, 10.0),
            RawListing::new("incomplete")
                .with_field(fields::REGISTRATION_DATE, "2018年04月")
                .with_field(fields::NEW_PRICE, 30.0),
        ];

        let report = Analyzer::default().run(&listings, reference());

        assert_eq!(report.input_count, 2);
        assert_eq!(report.features.len(), 1);
        let summary = report.summary.unwrap();
        assert_eq!(summary.sample_count, 1);
        assert_eq!(summary.mean_price, 20.0);
        assert!((summary.mean_depreciation_rate - 0.333).abs() < 1e-3);
        assert_eq!(report.exclusions.len(), 1);
        assert_eq!(report.exclusions[0].listing_id, "incomplete");

        // One sample: each histogram has the single value in its first bucket
        assert_eq!(report.price_histogram.len(), DEFAULT_BIN_COUNT);
        assert_eq!(report.price_histogram[0].count, 1);

        // One sample has no variance: every cell undefined
        assert_eq!(report.correlation.cells.len(), 16);
        assert!(report.correlation.cells.iter().all(|c| !c.is_defined()));
    }

    #[test]
    fn test_report_reads_back_from_json() {
        let listings = vec![RawListing::new("only")
            .with_field(fields::REGISTRATION_DATE, "2020年01月")
            .with_field(fields::NEW_PRICE, 25.0)
            .with_field(fields::CURRENT_PRICE, 15.0)];
        let report = Analyzer::default().run(&listings, reference());

        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.reference, report.reference);
        assert_eq!(back.sample_count(), 1);
        assert_eq!(back.features[0].age_months, report.features[0].age_months);
        let mean_price = back.summary.unwrap().mean_price;
        assert!((mean_price - 15.0).abs() < 1e-9);
        assert_eq!(back.price_histogram.len(), report.price_histogram.len());
        assert_eq!(back.correlation.names, report.correlation.names);
        assert_eq!(back.correlation.cells.len(), 16);
        assert!(back.correlation.cells.iter().all(|c| !c.is_defined()));
    }

    #[test]
    fn test_empty_input() {
        let report = Analyzer::default().run(&[], reference());
        assert!(report.summary.is_none());
        assert!(report.price_histogram.is_empty());
        assert!(report.age_histogram.is_empty());
        assert!(report.depreciation_histogram.is_empty());
        assert!(report.correlation.cells.is_empty());
    }

    #[test]
    fn test_sample_counts_consistent() {
        let listings: Vec<RawListing> = (0..12)
            .map(|i| {
                let date = format!("{}年0{}月", 2014 + i % 8, 1 + i % 9);
                let listing = RawListing::new(i.to_string())
                    .with_field(fields::REGISTRATION_DATE, date.as_str())
                    .with_field(fields::NEW_PRICE, 20.0 + i as f64);
                if i % 4 == 0 {
                    listing
                } else {
                    listing.with_field(fields::CURRENT_PRICE, 8.0 + i as f64 / 2.0)
                }
            })
            .collect();

        let config = AnalysisConfig {
            bin_count: 5,
            ..AnalysisConfig::default()
        };
        let report = Analyzer::new(config).run(&listings, reference());

        let n = report.sample_count();
        assert_eq!(n, 9);
        assert_eq!(report.summary.unwrap().sample_count, n);
        assert_eq!(n + report.exclusions.len(), listings.len());
        let histograms = [
            &report.price_histogram,
            &report.age_histogram,
            &report.depreciation_histogram,
        ];
        for hist in histograms {
            assert_eq!(hist.len(), 5);
            assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), n);
        }
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"bin_count": 10}"#).unwrap();
        assert_eq!(config.bin_count, 10);
        assert_eq!(config.boundary, BoundaryPolicy::InclusiveLast);
        assert_eq!(config.fields, FieldNames::default());

        let config: AnalysisConfig = serde_json::from_str(r#"{"boundary": "half_open"}"#).unwrap();
        assert_eq!(config.boundary, BoundaryPolicy::HalfOpen);
    }
}
