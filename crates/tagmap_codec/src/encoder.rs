//! Envelope encoder.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value as Json};

/// Encode a value into its self-describing envelope string.
///
/// The envelope is the standard base64 of the UTF-8 bytes of the JSON
/// `[tag, payload]` pair, so the result is printable ASCII and survives
/// non-Latin1 text byte-exactly. Composite kinds nest full envelopes for
/// their elements, which keeps the format self-describing at every level.
///
/// # Errors
///
/// Encoding is total over [`Value`]; this only fails if a nested payload
/// cannot be serialized, which does not happen for well-formed values.
pub fn to_envelope(value: &Value) -> CodecResult<String> {
    EnvelopeEncoder::new().encode_value(value)
}

/// An envelope encoder, optionally holding a default value.
pub struct EnvelopeEncoder {
    raw: Option<Value>,
}

impl EnvelopeEncoder {
    /// Create an encoder with no held value.
    pub fn new() -> Self {
        Self { raw: None }
    }

    /// Create an encoder holding `value` as its default input.
    pub fn with_value(value: Value) -> Self {
        Self { raw: Some(value) }
    }

    /// Encode the held default value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingInput`] if no value is held.
    pub fn encode(&self) -> CodecResult<String> {
        match &self.raw {
            Some(value) => self.encode_value(value),
            None => Err(CodecError::MissingInput),
        }
    }

    /// Encode a single value.
    pub fn encode_value(&self, value: &Value) -> CodecResult<String> {
        let payload = match value {
            Value::Undefined => json!("undefined"),
            Value::Null => Json::Null,
            Value::Bool(b) | Value::BoxedBool(b) => json!(b),
            Value::Number(n) | Value::BoxedNumber(n) => number_payload(*n),
            Value::Text(s)
            | Value::BigInt(s)
            | Value::Symbol(s)
            | Value::Function(s)
            | Value::BoxedText(s) => json!(s),
            Value::Date(ms) => json!(ms),
            Value::Regex { source, flags } => json!({ "source": source, "flags": flags }),
            Value::Error { message, cause } => {
                let cause = match cause {
                    Some(inner) => json!(self.encode_value(inner)?),
                    None => Json::Null,
                };
                json!({ "message": message, "cause": cause })
            }
            Value::Blob(bytes) | Value::Buffer(bytes) => {
                json!(String::from_utf8_lossy(bytes))
            }
            Value::TypedArray(arr) => json!(arr.join()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.encode_value(item).map(Json::String))
                    .collect::<CodecResult<Vec<_>>>()?,
            ),
            Value::Object(fields) => {
                let mut object = serde_json::Map::with_capacity(fields.len());
                for (key, field) in fields {
                    object.insert(key.clone(), Json::String(self.encode_value(field)?));
                }
                Json::Object(object)
            }
            Value::Map(entries) => json!(self.encode_pairs(entries)?),
            Value::Set(elements) => {
                let envelopes = elements
                    .iter()
                    .map(|element| self.encode_value(element).map(Json::String))
                    .collect::<CodecResult<Vec<_>>>()?;
                json!(seal("Array", Json::Array(envelopes))?)
            }
        };
        seal(value.tag(), payload)
    }

    /// Encode map entries as an ordered-sequence envelope of `[key, value]`
    /// pair envelopes.
    fn encode_pairs(&self, entries: &[(Value, Value)]) -> CodecResult<String> {
        let pairs = entries
            .iter()
            .map(|(key, value)| {
                let pair = vec![
                    Json::String(self.encode_value(key)?),
                    Json::String(self.encode_value(value)?),
                ];
                seal("Array", Json::Array(pair)).map(Json::String)
            })
            .collect::<CodecResult<Vec<_>>>()?;
        seal("Array", Json::Array(pairs))
    }
}

impl Default for EnvelopeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Seal a `[tag, payload]` pair into base64 text.
fn seal(tag: &str, payload: Json) -> CodecResult<String> {
    let pair = Json::Array(vec![Json::String(tag.to_string()), payload]);
    let text = serde_json::to_string(&pair)
        .map_err(|e| CodecError::invalid_payload(tag, e.to_string()))?;
    Ok(STANDARD.encode(text.as_bytes()))
}

/// Numbers carry literal payloads for the three non-finite values and
/// their native decimal form otherwise. Integral numbers shed the
/// fractional part so the wire form stays compact.
fn number_payload(n: f64) -> Json {
    if n.is_nan() {
        json!("NaN")
    } else if n == f64::INFINITY {
        json!("Infinity")
    } else if n == f64::NEG_INFINITY {
        json!("-Infinity")
    } else if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}
