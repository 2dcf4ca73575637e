//! Listing Signal Parser

use crate::date::{parse_age_months, YearMonth};
use crate::error::FieldError;
use crate::number::parse_amount;
use listing_model::{fields, FieldValue, RawListing};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Info keys the parser reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Registration date text ("YYYY年MM月")
    pub registration_date: String,
    /// Guide price when new
    pub new_price: String,
    /// Current asking price
    pub current_price: String,
    /// Amount saved versus new
    pub saved_amount: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            registration_date: fields::REGISTRATION_DATE.to_string(),
            new_price: fields::NEW_PRICE.to_string(),
            current_price: fields::CURRENT_PRICE.to_string(),
            saved_amount: fields::SAVED_AMOUNT.to_string(),
        }
    }
}

/// Numeric signals extracted from one listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedSignal {
    /// Months since first registration
    pub age_months: Option<i32>,
    /// Guide price when new
    pub new_price: Option<f64>,
    /// Current asking price
    pub current_price: Option<f64>,
    /// Amount saved versus new, 0 when absent
    pub saved_amount: f64,
    /// Why each absent signal is absent
    pub issues: Vec<FieldError>,
}

/// Parser turning raw listings into [`ParsedSignal`]s
#[derive(Debug, Clone, Default)]
pub struct ListingParser {
    names: FieldNames,
}

impl ListingParser {
    /// Create a parser reading the given info keys
    pub fn new(names: FieldNames) -> Self {
        Self { names }
    }

    /// Info keys in use
    pub fn names(&self) -> &FieldNames {
        &self.names
    }

    /// Extract signals, measuring age against `reference`
    pub fn parse(&self, listing: &RawListing, reference: YearMonth) -> ParsedSignal {
        let mut issues = Vec::new();

        let age_months = match listing.field(&self.names.registration_date) {
            None => {
                issues.push(FieldError::missing(&self.names.registration_date));
                None
            }
            Some(value) => {
                let age = parse_age_months(value.as_text(), reference);
                if age.is_none() {
                    issues.push(invalid(&self.names.registration_date, value));
                }
                age
            }
        };

        let new_price = self.amount(listing, &self.names.new_price, &mut issues);
        let current_price = self.amount(listing, &self.names.current_price, &mut issues);
        let saved_amount = self
            .amount(listing, &self.names.saved_amount, &mut issues)
            .unwrap_or(0.0);

        if !issues.is_empty() {
            trace!("Listing {} parsed with {} issue(s)", listing.id, issues.len());
        }

        ParsedSignal {
            age_months,
            new_price,
            current_price,
            saved_amount,
            issues,
        }
    }

    fn amount(
        &self,
        listing: &RawListing,
        name: &str,
        issues: &mut Vec<FieldError>,
    ) -> Option<f64> {
        let Some(value) = listing.field(name) else {
            issues.push(FieldError::missing(name));
            return None;
        };
        let amount = parse_amount(value);
        if amount.is_none() {
            issues.push(invalid(name, value));
        }
        amount
    }
}

fn invalid(name: &str, value: &FieldValue) -> FieldError {
    match value {
        FieldValue::Number(v) => FieldError::invalid(name, v),
        FieldValue::Flag(b) => FieldError::invalid(name, b),
        FieldValue::Text(s) => FieldError::invalid(name, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    #[test]
    fn test_complete_listing() {
        let listing = RawListing::new("1")
            .with_field(fields::REGISTRATION_DATE, "2018年04月")
            .with_field(fields::NEW_PRICE, 30.0)
            .with_field(fields::CURRENT_PRICE, "20万")
            .with_field(fields::SAVED_AMOUNT, 10.0);

        let signal = ListingParser::default().parse(&listing, reference());

        assert_eq!(signal.age_months, Some(74));
        assert_eq!(signal.new_price, Some(30.0));
        assert_eq!(signal.current_price, Some(20.0));
        assert_eq!(signal.saved_amount, 10.0);
        assert!(signal.issues.is_empty());
    }

    #[test]
    fn test_missing_fields_are_recorded() {
        let listing = RawListing::new("2").with_field(fields::REGISTRATION_DATE, "去年");

        let signal = ListingParser::default().parse(&listing, reference());

        assert_eq!(signal.age_months, None);
        assert_eq!(signal.new_price, None);
        assert_eq!(signal.current_price, None);
        assert_eq!(signal.saved_amount, 0.0);
        assert_eq!(signal.issues.len(), 4);
        assert_eq!(
            signal.issues[0],
            FieldError::InvalidFormat {
                field: fields::REGISTRATION_DATE.to_string(),
                value: "去年".to_string(),
            }
        );
        assert_eq!(signal.issues[1].field(), fields::NEW_PRICE);
    }

    #[test]
    fn test_numeric_date_is_invalid() {
        let listing = RawListing::new("3").with_field(fields::REGISTRATION_DATE, 2018.0);
        let signal = ListingParser::default().parse(&listing, reference());
        assert_eq!(signal.age_months, None);
        assert!(matches!(signal.issues[0], FieldError::InvalidFormat { .. }));
    }

    #[test]
    fn test_custom_field_names() {
        let names = FieldNames {
            current_price: "price".to_string(),
            ..FieldNames::default()
        };
        let listing = RawListing::new("4").with_field("price", 8.8);

        let signal = ListingParser::new(names).parse(&listing, reference());
        assert_eq!(signal.current_price, Some(8.8));
    }

    #[test]
    fn test_signal_serializes_with_issues() {
        let listing = RawListing::new("5")
            .with_field(fields::REGISTRATION_DATE, "2020年02月")
            .with_field(fields::CURRENT_PRICE, "abc");
        let signal = ListingParser::default().parse(&listing, reference());

        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["age_months"], 52);
        assert_eq!(json["issues"][0]["kind"], "missing");
        assert_eq!(json["issues"][0]["field"], fields::NEW_PRICE);
        assert_eq!(json["issues"][1]["kind"], "invalid_format");

        let back: ParsedSignal = serde_json::from_value(json).unwrap();
        assert_eq!(back, signal);
    }
}
