//! Price / Amount Parsing

use listing_model::FieldValue;

/// Unit suffix used by the crawler for prices (ten-thousand yuan)
const WAN: &str = "万";

/// Read a price-like amount, in 万元.
///
/// Numbers pass through when finite. Text is trimmed and an optional
/// trailing `万` is stripped before parsing, so `"10.98万"` and `"10.98"`
/// both read as `10.98`.
pub fn parse_amount(value: &FieldValue) -> Option<f64> {
    let amount = match value {
        FieldValue::Number(v) => *v,
        FieldValue::Text(text) => {
            let text = text.trim();
            let text = text.strip_suffix(WAN).unwrap_or(text).trim_end();
            text.parse::<f64>().ok()?
        }
        FieldValue::Flag(_) => return None,
    };

    amount.is_finite().then_some(amount)
}
