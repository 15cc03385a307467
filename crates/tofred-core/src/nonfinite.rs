//! Serde adapters for `f64` data that may hold infinities or NaN.
//!
//! JSON has no literal for non-finite numbers and `serde_json` writes them as
//! `null`. In human-readable formats these adapters write `"inf"`, `"-inf"`
//! and `"nan"` instead and accept them back; binary formats see plain `f64`.
//!
//! ```ignore
//! #[serde(with = "tofred_core::nonfinite::vec")]
//! pub y: Vec<f64>,
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy)]
struct Float(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

fn parse_text(text: &str) -> Option<f64> {
    match text {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        "nan" | "NaN" => Some(f64::NAN),
        _ => None,
    }
}

impl Serialize for Float {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() || !serializer.is_human_readable() {
            serializer.serialize_f64(value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

impl<'de> Deserialize<'de> for Float {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if !deserializer.is_human_readable() {
            return f64::deserialize(deserializer).map(Float);
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(Float(value)),
            Repr::Text(text) => parse_text(&text).map(Float).ok_or_else(|| {
                D::Error::custom(format!("expected a number, \"inf\", \"-inf\" or \"nan\", got {text:?}"))
            }),
        }
    }
}

/// Adapter for a single `f64`.
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Float(*value).serialize(serializer)
}

/// Adapter for a single `f64`.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Float::deserialize(deserializer).map(|float| float.0)
}

/// Adapter for `Vec<f64>`.
pub mod vec {
    use super::Float;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Writes every element through the non-finite encoding.
    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&value| Float(value)))
    }

    /// Reads numbers and non-finite markers.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let floats = Vec::<Float>::deserialize(deserializer)?;
        Ok(floats.into_iter().map(|float| float.0).collect())
    }
}

/// Adapter for `Option<Vec<f64>>`.
pub mod option_vec {
    use super::Float;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Writes `None` as null and the elements through the non-finite encoding.
    pub fn serialize<S: Serializer>(
        values: &Option<Vec<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        values
            .as_ref()
            .map(|values| values.iter().map(|&value| Float(value)).collect::<Vec<_>>())
            .serialize(serializer)
    }

    /// Reads an optional sequence of numbers and non-finite markers.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<f64>>, D::Error> {
        let floats = Option::<Vec<Float>>::deserialize(deserializer)?;
        Ok(floats.map(|floats| floats.into_iter().map(|float| float.0).collect()))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super::vec")]
        values: Vec<f64>,
        #[serde(with = "super")]
        scalar: f64,
    }

    #[test]
    fn non_finite_values_survive_json() {
        let sample = Sample {
            values: vec![1.5, f64::INFINITY, f64::NEG_INFINITY, f64::NAN],
            scalar: f64::NAN,
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"values":[1.5,"inf","-inf","nan"],"scalar":"nan"}"#);
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back.values[0], 1.5);
        assert_eq!(back.values[1], f64::INFINITY);
        assert_eq!(back.values[2], f64::NEG_INFINITY);
        assert!(back.values[3].is_nan());
        assert!(back.scalar.is_nan());
    }

    #[test]
    fn integers_and_unknown_text() {
        let back: Sample = serde_json::from_str(r#"{"values":[1,2],"scalar":3}"#).unwrap();
        assert_eq!(back.values, vec![1.0, 2.0]);
        assert_eq!(back.scalar, 3.0);
        assert!(serde_json::from_str::<Sample>(r#"{"values":["big"],"scalar":0}"#).is_err());
    }
}
