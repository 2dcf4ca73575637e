//! Listing Model
//!
//! Raw used-car listings as delivered by the crawler and the `/crawl-cars`
//! endpoint. The analysis crates only ever read these records.

mod listing;
mod source;

pub use listing::{FieldValue, RawListing};
pub use source::{listings_from_json, load_dir, LoadReport, SourceError};

/// Info field names used by the crawler (keys of [`RawListing::info`])
pub mod fields {
    /// First registration date, e.g. "2018年04月"
    pub const REGISTRATION_DATE: &str = "上牌时间";
    /// City of first registration
    pub const REGISTRATION_CITY: &str = "上牌地";
    /// Current asking price (万元)
    pub const CURRENT_PRICE: &str = "当前售价";
    /// Manufacturer guide price when new (万元)
    pub const NEW_PRICE: &str = "新车指导价";
    /// Amount saved versus buying new (万元)
    pub const SAVED_AMOUNT: &str = "比新车省";
    /// Number of ownership transfers, e.g. "0次"
    pub const TRANSFER_COUNT: &str = "过户次数";
}
