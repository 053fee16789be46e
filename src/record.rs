//! ATM record model.
//!
//! Records serialize as `{"name": <int>, "location": [<lat>, <lon>]}`, the
//! shape the simulation service and its web front end read. Any extra fields
//! on a template (e.g. `refillAmount`) ride along untouched.

use serde::{Deserialize, Serialize};

/// Identifier carried by the built-in template before substitution.
pub const DEFAULT_TEMPLATE_IDENTIFIER: u64 = 123;

/// Latitude/longitude of the built-in template (Kraków main square).
pub const DEFAULT_TEMPLATE_LOCATION: Location = Location(50.062_235_7, 19.935_908_7);

/// Geographic position as a `(latitude, longitude)` pair.
///
/// Serializes as a two-element JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location(pub f64, pub f64);

/// A single ATM as understood by the simulation config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmRecord {
    /// Numeric identifier; the service calls this field `name`.
    #[serde(rename = "name")]
    pub identifier: u64,
    /// Where the ATM sits.
    pub location: Location,
    /// Any other fields present on the template.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AtmRecord {
    /// Creates a record with no extra fields.
    #[must_use]
    pub fn new(identifier: u64, location: Location) -> Self {
        Self { identifier, location, extra: serde_json::Map::new() }
    }

    /// Returns a copy of this record carrying a different identifier.
    #[must_use]
    pub fn with_identifier(&self, identifier: u64) -> Self {
        Self { identifier, ..self.clone() }
    }
}

impl Default for AtmRecord {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_IDENTIFIER, DEFAULT_TEMPLATE_LOCATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_template_serializes_like_service_expects() {
        let value = serde_json::to_value(AtmRecord::default()).unwrap();
        assert_eq!(value, json!({"name": 123, "location": [50.062_235_7, 19.935_908_7]}));
    }

    #[test]
    fn extra_fields_survive_deserialize_and_copy() {
        let template: AtmRecord = serde_json::from_value(json!({
            "name": 1,
            "location": [1.5, -2.5],
            "refillAmount": 5000
        }))
        .unwrap();

        assert_eq!(template.location, Location(1.5, -2.5));
        assert_eq!(template.extra.get("refillAmount"), Some(&json!(5000)));

        let copy = template.with_identifier(42);
        assert_eq!(copy.identifier, 42);
        assert_eq!(copy.extra, template.extra);
        assert_eq!(template.identifier, 1);
    }

    #[test]
    fn rejects_location_with_wrong_arity() {
        let result: Result<AtmRecord, _> =
            serde_json::from_value(json!({"name": 1, "location": [1.0]}));
        assert!(result.is_err());
    }
}
