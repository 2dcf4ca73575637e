//! Analysis Routes

use axum::{
    extract::{Query, State},
    Json,
};
use feature_engine::{AnalysisConfig, AnalysisReport, Analyzer};
use field_parser::YearMonth;
use listing_model::RawListing;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, MAX_BIN_COUNT};
use crate::{AppState, SharedState};

/// Query parameters for analysis endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// Reference month `YYYY-MM`; defaults to the current month
    pub reference: Option<String>,
    /// Override the configured bucket count
    pub bins: Option<usize>,
}

/// Analyze the listings loaded at startup
pub async fn get_analysis(
    State(state): State<SharedState>,
    Query(params): Query<AnalysisQuery>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let state = state.read().await;
    analyze(&state, &state.listings, &params).map(Json)
}

/// Analyze listings supplied in the request body
pub async fn post_analysis(
    State(state): State<SharedState>,
    Query(params): Query<AnalysisQuery>,
    Json(listings): Json<Vec<RawListing>>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let state = state.read().await;
    analyze(&state, &listings, &params).map(Json)
}

fn analyze(
    state: &AppState,
    listings: &[RawListing],
    params: &AnalysisQuery,
) -> Result<AnalysisReport, ApiError> {
    // The clock is read here and nowhere below
    let reference = match &params.reference {
        Some(text) => text.parse::<YearMonth>()?,
        None => YearMonth::now(),
    };

    let custom;
    let analyzer = match params.bins {
        Some(bins) if bins == 0 || bins > MAX_BIN_COUNT => {
            return Err(ApiError::InvalidBinCount(bins))
        }
        Some(bins) => {
            custom = Analyzer::new(AnalysisConfig {
                bin_count: bins,
                ..state.analyzer.config().clone()
            });
            &custom
        }
        None => &state.analyzer,
    };

    debug!("Analyzing {} listings against {}", listings.len(), reference);
    let report = analyzer.run(listings, reference);

    metrics::counter!("analysis_runs_total").increment(1);
    metrics::counter!("listings_analyzed_total").increment(report.input_count as u64);
    metrics::counter!("listings_excluded_total").increment(report.exclusions.len() as u64);

    Ok(report)
}
