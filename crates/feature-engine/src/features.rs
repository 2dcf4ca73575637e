//! Derived Feature Assembly

use field_parser::{ListingParser, ParsedSignal, YearMonth};
use listing_model::RawListing;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Depreciation features for one listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeature {
    /// Months since first registration (always > 0)
    pub age_months: i32,
    /// `age_months / 12`
    pub age_years: f64,
    /// Current asking price (万元)
    pub current_price: f64,
    /// `(new_price - current_price) / new_price`
    pub depreciation_rate: f64,
    /// Amount saved versus new (万元), 0 when not listed
    pub saved_amount: f64,
}

impl DerivedFeature {
    /// Build features from parsed signals.
    ///
    /// Listings with no usable age, an age of zero months or less, or a
    /// missing/zero price are rejected. A brand-new vehicle (age 0) is
    /// therefore excluded rather than scored with zero depreciation.
    pub fn from_signal(signal: &ParsedSignal) -> Result<Self, ExclusionReason> {
        let age_months = signal.age_months.ok_or(ExclusionReason::MissingAge)?;
        if age_months <= 0 {
            return Err(ExclusionReason::NonPositiveAge(age_months));
        }

        let new_price = signal.new_price.ok_or(ExclusionReason::MissingNewPrice)?;
        if new_price == 0.0 {
            return Err(ExclusionReason::ZeroNewPrice);
        }

        let current_price = signal
            .current_price
            .ok_or(ExclusionReason::MissingCurrentPrice)?;
        if current_price == 0.0 {
            return Err(ExclusionReason::ZeroCurrentPrice);
        }

        Ok(Self {
            age_months,
            age_years: f64::from(age_months) / 12.0,
            current_price,
            depreciation_rate: (new_price - current_price) / new_price,
            saved_amount: signal.saved_amount,
        })
    }
}

/// Why a listing was left out of the derived set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    #[error("registration date missing or unparseable")]
    MissingAge,

    #[error("age of {0} months is not positive")]
    NonPositiveAge(i32),

    #[error("new price missing or unparseable")]
    MissingNewPrice,

    #[error("new price is zero")]
    ZeroNewPrice,

    #[error("current price missing or unparseable")]
    MissingCurrentPrice,

    #[error("current price is zero")]
    ZeroCurrentPrice,
}

/// A listing dropped from the derived set, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub listing_id: String,
    pub reason: ExclusionReason,
}

/// Result of deriving features over a listing collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    /// Retained features, in input order
    pub features: Vec<DerivedFeature>,
    /// Dropped listings, in input order
    pub exclusions: Vec<Exclusion>,
}

/// Derives features from raw listings against a fixed reference month
#[derive(Debug, Clone)]
pub struct FeatureDeriver {
    parser: ListingParser,
    reference: YearMonth,
}

impl FeatureDeriver {
    /// Create a deriver with the default info keys
    pub fn new(reference: YearMonth) -> Self {
        Self::with_parser(ListingParser::default(), reference)
    }

    /// Create a deriver with a custom parser
    pub fn with_parser(parser: ListingParser, reference: YearMonth) -> Self {
        Self { parser, reference }
    }

    /// Month that listing ages are measured against
    pub fn reference(&self) -> YearMonth {
        self.reference
    }

    /// Derive features, reporting why a listing was rejected
    pub fn try_derive(&self, listing: &RawListing) -> Result<DerivedFeature, ExclusionReason> {
        let signal = self.parser.parse(listing, self.reference);
        DerivedFeature::from_signal(&signal)
    }

    /// Derive features, or `None` for incomplete listings
    pub fn derive(&self, listing: &RawListing) -> Option<DerivedFeature> {
        self.try_derive(listing).ok()
    }

    /// Derive features for every listing, keeping input order
    pub fn derive_all(&self, listings: &[RawListing]) -> Derivation {
        let mut derivation = Derivation {
            features: Vec::with_capacity(listings.len()),
            exclusions: Vec::new(),
        };

        for listing in listings {
            match self.try_derive(listing) {
                Ok(feature) => derivation.features.push(feature),
                Err(reason) => {
                    debug!("Excluding listing {}: {}", listing.id, reason);
                    derivation.exclusions.push(Exclusion {
                        listing_id: listing.id.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "Derived {} features from {} listings ({} excluded, reference {})",
            derivation.features.len(),
            listings.len(),
            derivation.exclusions.len(),
            self.reference
        );

        derivation
    }
}
