//! Field Parsing
//!
//! Extracts listing age and price signals from the loosely typed info
//! fields of crawled listings. Nothing here fails loudly: unusable fields
//! come back as absent, with the reason recorded on the signal.

mod date;
mod error;
mod number;
mod parser;

pub use date::{parse_age_months, parse_year_month, YearMonth};
pub use error::FieldError;
pub use number::parse_amount;
pub use parser::{FieldNames, ListingParser, ParsedSignal};
