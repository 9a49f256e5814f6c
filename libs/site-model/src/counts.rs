//! Count normalization
//!
//! Turns an arbitrary, possibly malformed request object into a complete [`CountMap`].
//! Bad values never fail the request; they degrade to zero. The transformer count is
//! never read from input and is always derived from the battery total.

use crate::catalog::DeviceType;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Device count per type; always contains every catalog type
///
/// Every map starts from [`CountMap::zeroed`] and entries are only ever overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CountMap(BTreeMap<DeviceType, u32>);

impl CountMap {
    /// All types present with a count of zero
    pub fn zeroed() -> Self {
        Self(DeviceType::all().iter().map(|&t| (t, 0)).collect())
    }

    pub fn get(&self, device_type: DeviceType) -> u32 {
        self.0.get(&device_type).copied().unwrap_or(0)
    }

    pub fn set(&mut self, device_type: DeviceType, count: u32) {
        self.0.insert(device_type, count);
    }

    /// Iterate `(type, count)` in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, u32)> + '_ {
        self.0.iter().map(|(&t, &c)| (t, c))
    }

    /// Sum of the battery-type counts
    pub fn battery_total(&self) -> u64 {
        DeviceType::battery_types()
            .iter()
            .map(|&t| u64::from(self.get(t)))
            .sum()
    }

    /// Sum over every type, transformer included
    pub fn unit_total(&self) -> u64 {
        self.iter().map(|(_, c)| u64::from(c)).sum()
    }
}

impl Default for CountMap {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Transformers required for a given number of battery units: one per two, rounded up
pub fn derive_transformer_count(battery_total: u64) -> u32 {
    let needed = battery_total.div_ceil(2);
    u32::try_from(needed).unwrap_or(u32::MAX)
}

/// Coerce a request value to a number the way a permissive form field would
///
/// Numbers pass through, numeric strings are parsed after trimming (empty means 0,
/// `0x`/`0o`/`0b` prefixes are honored), booleans map to 1/0 and null to 0. An array
/// counts as its text form: empty is 0, a single element is coerced by its own text, and
/// anything longer is not a number. Objects are not numbers.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        },
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_numeric_text(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => coerce_array_element(single),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

// An array element contributes through its text form, so `[true]` reads as "true"
fn coerce_array_element(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(_) | Value::Object(_) => f64::NAN,
        other => coerce_number(Some(other)),
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix_digits = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|d| (d, radix)));
    if let Some((digits, radix)) = radix_digits {
        if !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return u64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // "inf" and "nan" spellings parse here but clamp to 0 like any non-finite value
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Clamp a coerced number to a non-negative whole count
///
/// Non-finite values become 0; finite values are floored and clamped at 0.
/// Values beyond `u32::MAX` saturate.
pub fn clamp_non_neg_int(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let floored = n.floor();
    if floored <= 0.0 {
        0
    } else {
        floored as u32
    }
}

/// Build a complete count map from raw request input
///
/// Only the four battery keys are read. A `Transformer` key (or any other key) is
/// ignored; the transformer count is overwritten with the derived value.
pub fn normalize_counts(raw: Option<&Map<String, Value>>) -> CountMap {
    let mut counts = CountMap::zeroed();

    for &device_type in DeviceType::battery_types() {
        let value = raw.and_then(|m| m.get(device_type.as_str()));
        counts.set(device_type, clamp_non_neg_int(coerce_number(value)));
    }

    let transformers = derive_transformer_count(counts.battery_total());
    counts.set(DeviceType::Transformer, transformers);

    debug!(
        batteries = counts.battery_total(),
        transformers, "Normalized device counts"
    );
    counts
}

/// Normalize any JSON value; non-object input yields an all-zero count map
pub fn normalize_value(raw: &Value) -> CountMap {
    normalize_counts(raw.as_object())
}
