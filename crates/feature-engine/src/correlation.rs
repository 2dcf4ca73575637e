//! Pearson Correlation Matrix

use crate::features::DerivedFeature;
use crate::statistics::mean;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::debug;

/// Product-moment correlation of two equal-length samples.
///
/// Returns `NaN` when either sample has zero variance, when the samples
/// are empty, or when their lengths differ. Never panics.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return f64::NAN;
    }

    let mx = mean(x);
    let my = mean(y);

    let mut num = 0.0;
    let mut dx = 0.0;
    let mut dy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let a = xi - mx;
        let b = yi - my;
        num += a * b;
        dx += a * a;
        dy += b * b;
    }

    let denom = (dx * dy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (num / denom).clamp(-1.0, 1.0)
}

/// A numeric projection of [`DerivedFeature`] with a display name
#[derive(Clone)]
pub struct NamedFeature {
    /// Stable key, e.g. `age_years`
    pub name: String,
    /// Display label for the console axis
    pub label: String,
    /// Projection
    pub extract: fn(&DerivedFeature) -> f64,
}

impl NamedFeature {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        extract: fn(&DerivedFeature) -> f64,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            extract,
        }
    }
}

impl fmt::Debug for NamedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFeature")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Ordered set of features to correlate
#[derive(Debug, Clone)]
pub struct FeatureSet {
    features: Vec<NamedFeature>,
}

impl Default for FeatureSet {
    /// Age, price, depreciation rate and amount saved
    fn default() -> Self {
        Self::new(vec![
            NamedFeature::new("age_years", "车龄", |f| f.age_years),
            NamedFeature::new("current_price", "价格", |f| f.current_price),
            NamedFeature::new("depreciation_rate", "折旧率", |f| f.depreciation_rate),
            NamedFeature::new("saved_amount", "省钱", |f| f.saved_amount),
        ])
    }
}

impl FeatureSet {
    pub fn new(features: Vec<NamedFeature>) -> Self {
        Self { features }
    }

    /// Number of features in the set
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in matrix order
    pub fn features(&self) -> &[NamedFeature] {
        &self.features
    }

    /// One column per feature, each in the same element order as `samples`
    fn columns(&self, samples: &[DerivedFeature]) -> Vec<Vec<f64>> {
        self.features
            .iter()
            .map(|feature| samples.iter().map(feature.extract).collect())
            .collect()
    }
}

/// One entry of the correlation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCell {
    pub row: usize,
    pub column: usize,
    pub row_name: String,
    pub column_name: String,
    /// Coefficient in [-1, 1]; `NaN` (serialized as `null`) when undefined
    #[serde(deserialize_with = "nan_from_null")]
    pub value: f64,
}

fn nan_from_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl CorrelationCell {
    /// Whether the coefficient is defined
    pub fn is_defined(&self) -> bool {
        !self.value.is_nan()
    }

    /// Magnitude for heat-map shading; 0 for undefined cells
    pub fn intensity(&self) -> f64 {
        if self.is_defined() {
            self.value.abs()
        } else {
            0.0
        }
    }
}

/// Full pairwise correlation grid, row-major
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Feature keys in row/column order
    pub names: Vec<String>,
    /// Display labels in row/column order
    pub labels: Vec<String>,
    /// `names.len()²` cells, or none for an empty sample
    pub cells: Vec<CorrelationCell>,
}

impl CorrelationMatrix {
    /// Correlate every feature pair of `set` over `samples`, diagonal included.
    ///
    /// An empty sample produces a matrix with no cells.
    pub fn build(samples: &[DerivedFeature], set: &FeatureSet) -> Self {
        let names: Vec<String> = set.features().iter().map(|f| f.name.clone()).collect();
        let labels: Vec<String> = set.features().iter().map(|f| f.label.clone()).collect();

        if samples.is_empty() {
            return Self {
                names,
                labels,
                cells: Vec::new(),
            };
        }

        let columns = set.columns(samples);
        let n = columns.len();

        // Upper triangle only; the lower half mirrors it exactly
        let mut values = vec![f64::NAN; n * n];
        for i in 0..n {
            for j in i..n {
                let r = pearson(&columns[i], &columns[j]);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        let cells = values
            .iter()
            .enumerate()
            .map(|(idx, &value)| {
                let (row, column) = (idx / n, idx % n);
                CorrelationCell {
                    row,
                    column,
                    row_name: names[row].clone(),
                    column_name: names[column].clone(),
                    value,
                }
            })
            .collect::<Vec<_>>();

        let undefined = cells.iter().filter(|c| !c.is_defined()).count();
        debug!(
            "Correlation matrix {}x{} over {} samples ({} undefined cells)",
            n,
            n,
            samples.len(),
            undefined
        );

        Self { names, labels, cells }
    }

    /// Side length of the grid
    pub fn dimension(&self) -> usize {
        self.names.len()
    }

    /// Cell at (`row`, `column`)
    pub fn get(&self, row: usize, column: usize) -> Option<&CorrelationCell> {
        let n = self.dimension();
        if row >= n || column >= n {
            return None;
        }
        self.cells.get(row * n + column)
    }
}

/// Correlation cells over the default four-feature set
pub fn build_matrix(samples: &[DerivedFeature]) -> Vec<CorrelationCell> {
    CorrelationMatrix::build(samples, &FeatureSet::default()).cells
}
