//! Envelope decoder.

use crate::error::{CodecError, CodecResult};
use crate::value::{TypedArray, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Decode an envelope string back into a value.
///
/// Uses lenient unknown-tag handling: an unrecognized tag decodes to a
/// best-effort conversion of its raw payload instead of failing. Use
/// [`EnvelopeDecoder`] with [`EnvelopeDecoder::strict`] to reject unknown
/// tags instead.
///
/// # Errors
///
/// Returns an error if the text is not valid base64, the decoded bytes
/// are not a JSON `[tag, payload]` pair, or the payload does not match
/// the shape the tag requires.
pub fn from_envelope(raw: &str) -> CodecResult<Value> {
    EnvelopeDecoder::new().decode_raw(raw)
}

/// An envelope decoder, optionally holding a default input.
pub struct EnvelopeDecoder {
    raw: Option<String>,
    strict: bool,
}

impl EnvelopeDecoder {
    /// Create a lenient decoder with no held input.
    pub fn new() -> Self {
        Self {
            raw: None,
            strict: false,
        }
    }

    /// Create a decoder holding `raw` as its default input.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            strict: false,
        }
    }

    /// Set whether unknown tags are rejected instead of decoded leniently.
    #[must_use]
    pub fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Decode the held default input.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingInput`] if no input is held.
    pub fn decode(&self) -> CodecResult<Value> {
        match &self.raw {
            Some(raw) => self.decode_raw(raw),
            None => Err(CodecError::MissingInput),
        }
    }

    /// Decode a single envelope string.
    pub fn decode_raw(&self, raw: &str) -> CodecResult<Value> {
        let (tag, payload) = unseal(raw)?;
        self.reconstruct(&tag, payload)
    }

    /// Dispatch on the tag and rebuild the matching value kind.
    fn reconstruct(&self, tag: &str, payload: Json) -> CodecResult<Value> {
        match tag {
            "undefined" => Ok(Value::Undefined),
            "null" => Ok(Value::Null),
            "boolean" => Ok(Value::Bool(expect_bool(tag, &payload)?)),
            "number" => Ok(Value::Number(expect_number(tag, &payload)?)),
            "string" => Ok(Value::Text(expect_text(tag, &payload)?)),
            "bigint" => {
                let digits = expect_text(tag, &payload)?;
                let body = digits.strip_prefix('-').unwrap_or(&digits);
                if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CodecError::invalid_payload(tag, "not a decimal integer"));
                }
                Ok(Value::BigInt(digits))
            }
            "symbol" => Ok(Value::Symbol(expect_text(tag, &payload)?)),
            "function" => Ok(Value::Function(expect_text(tag, &payload)?)),
            "String" => Ok(Value::BoxedText(expect_text(tag, &payload)?)),
            "Number" => Ok(Value::BoxedNumber(expect_number(tag, &payload)?)),
            "Boolean" => Ok(Value::BoxedBool(expect_bool(tag, &payload)?)),
            "Date" => payload
                .as_i64()
                .or_else(|| payload.as_f64().map(|n| n as i64))
                .map(Value::Date)
                .ok_or_else(|| CodecError::invalid_payload(tag, "expected epoch milliseconds")),
            "RegExp" => {
                let fields = expect_object(tag, &payload)?;
                Ok(Value::Regex {
                    source: field_text(tag, fields, "source")?,
                    flags: field_text(tag, fields, "flags")?,
                })
            }
            "Error" => {
                let fields = expect_object(tag, &payload)?;
                let cause = match fields.get("cause") {
                    None | Some(Json::Null) => None,
                    Some(Json::String(envelope)) => Some(Box::new(self.decode_raw(envelope)?)),
                    Some(_) => {
                        return Err(CodecError::invalid_payload(
                            tag,
                            "cause must be a nested envelope or null",
                        ))
                    }
                };
                Ok(Value::Error {
                    message: field_text(tag, fields, "message")?,
                    cause,
                })
            }
            "Blob" => Ok(Value::Blob(expect_text(tag, &payload)?.into_bytes())),
            "ArrayBuffer" | "DataView" => {
                Ok(Value::Buffer(expect_text(tag, &payload)?.into_bytes()))
            }
            "Array" => {
                let items = expect_array(tag, &payload)?;
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.decode_raw(expect_envelope(tag, item)?)?);
                }
                Ok(Value::Array(values))
            }
            "Object" => {
                let fields = expect_object(tag, &payload)?;
                let mut object = BTreeMap::new();
                for (key, field) in fields {
                    object.insert(key.clone(), self.decode_raw(expect_envelope(tag, field)?)?);
                }
                Ok(Value::Object(object))
            }
            "Map" => {
                let entries = self.decode_pairs(tag, &payload)?;
                Ok(Value::map(entries))
            }
            "Set" => {
                let inner = self.decode_raw(&expect_text(tag, &payload)?)?;
                match inner {
                    Value::Array(elements) => Ok(Value::set(elements)),
                    _ => Err(CodecError::invalid_payload(
                        tag,
                        "expected an ordered-sequence payload",
                    )),
                }
            }
            // Legacy raw-object tag from the original format.
            "object" => Ok(json_to_value(payload)),
            _ => match parse_typed_array(tag, &payload)? {
                Some(arr) => Ok(Value::TypedArray(arr)),
                None if self.strict => Err(CodecError::unknown_tag(tag)),
                // Lenient fallback: carry the raw payload through.
                None => Ok(json_to_value(payload)),
            },
        }
    }

    /// Decode a map payload: an ordered-sequence envelope of `[key, value]`
    /// pair envelopes.
    fn decode_pairs(&self, tag: &str, payload: &Json) -> CodecResult<Vec<(Value, Value)>> {
        let inner = self.decode_raw(&expect_text(tag, payload)?)?;
        let pairs = match inner {
            Value::Array(pairs) => pairs,
            _ => {
                return Err(CodecError::invalid_payload(
                    tag,
                    "expected an ordered-sequence payload",
                ))
            }
        };

        let mut entries = Vec::with_capacity(pairs.len());
        for pair in pairs {
            match pair {
                Value::Array(mut kv) if kv.len() == 2 => {
                    let value = kv.pop().unwrap_or(Value::Undefined);
                    let key = kv.pop().unwrap_or(Value::Undefined);
                    entries.push((key, value));
                }
                _ => {
                    return Err(CodecError::invalid_payload(
                        tag,
                        "each entry must be a [key, value] pair",
                    ))
                }
            }
        }
        Ok(entries)
    }
}

impl Default for EnvelopeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Invert the opaque transform: base64 text back to a `(tag, payload)` pair.
fn unseal(raw: &str) -> CodecResult<(String, Json)> {
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|e| CodecError::invalid_envelope(format!("not valid base64: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| CodecError::invalid_envelope("envelope body is not UTF-8"))?;
    let json: Json = serde_json::from_str(&text)
        .map_err(|e| CodecError::invalid_envelope(format!("envelope body is not JSON: {e}")))?;

    match json {
        Json::Array(mut pair) if pair.len() == 2 => {
            let payload = pair.pop().unwrap_or(Json::Null);
            match pair.pop() {
                Some(Json::String(tag)) => Ok((tag, payload)),
                _ => Err(CodecError::invalid_envelope("tag must be a string")),
            }
        }
        _ => Err(CodecError::invalid_envelope(
            "expected a [tag, payload] pair",
        )),
    }
}

fn expect_bool(tag: &str, payload: &Json) -> CodecResult<bool> {
    payload
        .as_bool()
        .ok_or_else(|| CodecError::invalid_payload(tag, "expected a boolean"))
}

fn expect_text(tag: &str, payload: &Json) -> CodecResult<String> {
    payload
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CodecError::invalid_payload(tag, "expected a string"))
}

fn expect_array<'a>(tag: &str, payload: &'a Json) -> CodecResult<&'a [Json]> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CodecError::invalid_payload(tag, "expected an array"))
}

fn expect_object<'a>(
    tag: &str,
    payload: &'a Json,
) -> CodecResult<&'a serde_json::Map<String, Json>> {
    payload
        .as_object()
        .ok_or_else(|| CodecError::invalid_payload(tag, "expected an object"))
}

fn expect_envelope<'a>(tag: &str, item: &'a Json) -> CodecResult<&'a str> {
    item.as_str()
        .ok_or_else(|| CodecError::invalid_payload(tag, "nested element must be an envelope"))
}

fn field_text(
    tag: &str,
    fields: &serde_json::Map<String, Json>,
    name: &str,
) -> CodecResult<String> {
    fields
        .get(name)
        .and_then(Json::as_str)
        .map(str::to_string)
        .ok_or_else(|| CodecError::invalid_payload(tag, format!("missing {name:?} field")))
}

/// Numbers accept the three non-finite literal payloads, native JSON
/// numbers, and numeric strings.
fn expect_number(tag: &str, payload: &Json) -> CodecResult<f64> {
    match payload {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| CodecError::invalid_payload(tag, "number out of range")),
        Json::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other
                .parse::<f64>()
                .map_err(|_| CodecError::invalid_payload(tag, "not a numeric literal")),
        },
        _ => Err(CodecError::invalid_payload(tag, "expected a number")),
    }
}

fn parse_typed_array(tag: &str, payload: &Json) -> CodecResult<Option<TypedArray>> {
    fn elements<T: FromStr>(tag: &str, joined: &str) -> CodecResult<Vec<T>> {
        if joined.is_empty() {
            return Ok(Vec::new());
        }
        joined
            .split(',')
            .map(|e| {
                e.trim()
                    .parse::<T>()
                    .map_err(|_| CodecError::invalid_payload(tag, format!("bad element {e:?}")))
            })
            .collect()
    }

    let arr = match tag {
        "Int8Array" => TypedArray::I8(elements(tag, &expect_text(tag, payload)?)?),
        "Uint8Array" => TypedArray::U8(elements(tag, &expect_text(tag, payload)?)?),
        "Uint8ClampedArray" => TypedArray::U8Clamped(elements(tag, &expect_text(tag, payload)?)?),
        "Int16Array" => TypedArray::I16(elements(tag, &expect_text(tag, payload)?)?),
        "Uint16Array" => TypedArray::U16(elements(tag, &expect_text(tag, payload)?)?),
        "Int32Array" => TypedArray::I32(elements(tag, &expect_text(tag, payload)?)?),
        "Uint32Array" => TypedArray::U32(elements(tag, &expect_text(tag, payload)?)?),
        "Float32Array" => TypedArray::F32(elements(tag, &expect_text(tag, payload)?)?),
        "Float64Array" => TypedArray::F64(elements(tag, &expect_text(tag, payload)?)?),
        "BigInt64Array" => TypedArray::I64(elements(tag, &expect_text(tag, payload)?)?),
        "BigUint64Array" => TypedArray::U64(elements(tag, &expect_text(tag, payload)?)?),
        _ => return Ok(None),
    };
    Ok(Some(arr))
}

/// Best-effort conversion of a raw JSON payload into the nearest value
/// kind, used for lenient unknown-tag decoding.
fn json_to_value(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::Text(s),
        Json::Array(items) => Value::Array(items.into_iter().map(json_to_value).collect()),
        Json::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}
