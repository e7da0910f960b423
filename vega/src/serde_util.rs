/// Serialise `f64` with `NaN` (and infinities) as `null`, and deserialise `null` back to `NaN`.
///
/// Use with `#[serde(with = "crate::serde_util::nan_as_null")]`.
pub mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Value {
        #[serde(with = "super::nan_as_null")]
        value: f64,
    }

    #[test]
    fn test_nan_as_null() {
        let json = serde_json::to_string(&Value { value: f64::NAN }).unwrap();
        assert_eq!(json, r#"{"value":null}"#);

        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.value.is_nan());

        let parsed: Value = serde_json::from_str(r#"{"value":1.5}"#).unwrap();
        assert_eq!(parsed.value, 1.5);
    }
}
