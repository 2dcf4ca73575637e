//! HTTP Route Handlers

pub mod analysis;
pub mod metrics;
