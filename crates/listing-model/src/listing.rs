//! Raw Listing Record

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Scalar value stored under an info key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value (prices arrive as numbers from the API)
    Number(f64),
    /// Boolean flag
    Flag(bool),
    /// Free text (dates, prices with units, counts like "0次")
    Text(String),
}

impl FieldValue {
    /// Borrow the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// One crawled used-car listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    /// Source identifier (`source_car_id` from the API, `car_id` in crawl files)
    #[serde(rename = "source_car_id", alias = "car_id")]
    pub id: String,
    /// Listing headline
    #[serde(default)]
    pub title: Option<String>,
    /// Listing tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Open mapping of archive field name to value; `None` marks an explicit null
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: BTreeMap<String, Option<FieldValue>>,
    /// Original image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Locally stored image path
    #[serde(default)]
    pub image_path: Option<String>,
}

impl RawListing {
    /// Create an empty listing with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper to set an info field
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.info.insert(name.to_string(), Some(value.into()));
        self
    }

    /// Look up an info field; explicit nulls read as absent
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.info.get(name).and_then(Option::as_ref)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
