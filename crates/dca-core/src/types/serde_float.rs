//! 무한대가 나올 수 있는 `f64` 필드의 serde 헬퍼.
//!
//! serde_json은 무한대와 NaN을 `null`로 기록하고, 그 `null`은 다시 `f64`로 읽을 수 없습니다.
//! 이 모듈은 유한값은 숫자로, 나머지는 `"inf"`, `"-inf"`, `"nan"` 문자열로 기록합니다.
//!
//! # Examples
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Metrics {
//!     #[serde(with = "dca_core::types::serde_float")]
//!     sortino_ratio: f64,
//! }
//!
//! // {"sortino_ratio": 1.25}
//! // {"sortino_ratio": "inf"}
//! ```

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatRepr {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match FloatRepr::deserialize(deserializer)? {
        FloatRepr::Number(value) => Ok(value),
        FloatRepr::Text(text) => match text.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            "nan" => Ok(f64::NAN),
            _ => Err(D::Error::custom(format!("invalid float value: {}", text))),
        },
    }
}
