//! Serde helpers for targets that may hold the infinite penalty.
//!
//! Formats like JSON have no literal for infinity, so non-finite values are
//! written as the strings `"inf"`, `"-inf"` and `"NaN"`. Finite values stay
//! plain numbers.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatRepr {
    Number(f64),
    Text(String),
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match FloatRepr::deserialize(deserializer)? {
        FloatRepr::Number(value) => Ok(value),
        FloatRepr::Text(text) => match text.as_str() {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(D::Error::custom(format!("invalid float `{}`", other))),
        },
    }
}

#[derive(Serialize, Deserialize)]
struct Extended(#[serde(with = "crate::engine::float_serde")] f64);

/// The same encoding for every element of a sequence.
pub mod seq {
    use super::Extended;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| Extended(*v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Extended>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.0).collect())
    }
}
