//! # tagmap Codec
//!
//! Self-describing tagged-envelope encoding/decoding for tagmap.
//!
//! Every value is serialized into an *envelope*: the standard base64 of
//! the JSON `[tag, payload]` pair, encoded over UTF-8 bytes so any text
//! survives byte-exactly. The tag names the value's kind; the payload
//! carries its data. Composite kinds (arrays, records, maps, sets) nest
//! full envelopes for each element, making the format self-describing at
//! every level.
//!
//! ## Guarantees
//!
//! - `from_envelope(to_envelope(v))` reproduces `v` for every supported
//!   kind (symbols and callables are reconstructed from their description
//!   or source text, not preserved by identity)
//! - Identical values produce identical envelope text
//! - Envelopes are printable ASCII
//! - Callable source text is carried verbatim and never evaluated
//!
//! ## Usage
//!
//! ```
//! use tagmap_codec::{to_envelope, from_envelope, Value};
//!
//! // Encode a value
//! let value = Value::object(vec![("name", Value::from("John"))]);
//! let envelope = to_envelope(&value).unwrap();
//!
//! // Decode back
//! let decoded = from_envelope(&envelope).unwrap();
//! assert_eq!(value, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{from_envelope, EnvelopeDecoder};
pub use encoder::{to_envelope, EnvelopeEncoder};
pub use error::{CodecError, CodecResult};
pub use value::{TypedArray, Value};

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) {
        let envelope = to_envelope(&value).unwrap();
        let decoded = from_envelope(&envelope).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn roundtrip_markers() {
        roundtrip(Value::Undefined);
        roundtrip(Value::Null);
    }

    #[test]
    fn roundtrip_scalars() {
        roundtrip(Value::Bool(true));
        roundtrip(Value::Bool(false));
        roundtrip(Value::Number(0.0));
        roundtrip(Value::Number(-273.15));
        roundtrip(Value::Number(f64::INFINITY));
        roundtrip(Value::Number(f64::NEG_INFINITY));
        roundtrip(Value::Number(f64::NAN));
        roundtrip(Value::Text("hello world".to_string()));
        roundtrip(Value::Text(String::new()));
    }

    #[test]
    fn roundtrip_preserves_float_bits() {
        // The wire form is the shortest decimal representation; parsing
        // it back must recover the identical f64, not a neighbor one
        // ULP away.
        let n = f64::from_bits(0x7a9f_53bb_a918_575d);
        let decoded = from_envelope(&to_envelope(&Value::Number(n)).unwrap()).unwrap();
        assert_eq!(decoded.as_number().unwrap().to_bits(), n.to_bits());
    }

    #[test]
    fn roundtrip_unicode_text() {
        roundtrip(Value::Text("a Ā 𐀀 文 🦄".to_string()));
    }

    #[test]
    fn roundtrip_bigint() {
        roundtrip(Value::BigInt("123456789012345678901234567890".to_string()));
        roundtrip(Value::BigInt("-42".to_string()));
    }

    #[test]
    fn roundtrip_symbol_and_function() {
        roundtrip(Value::Symbol("marker".to_string()));
        roundtrip(Value::Function("(a, b) => a + b".to_string()));
    }

    #[test]
    fn roundtrip_boxed_scalars() {
        roundtrip(Value::BoxedText("boxed".to_string()));
        roundtrip(Value::BoxedNumber(1.5));
        roundtrip(Value::BoxedBool(false));
        roundtrip(Value::Date(1_700_000_000_000));
    }

    #[test]
    fn roundtrip_regex() {
        roundtrip(Value::Regex {
            source: r"^\d+$".to_string(),
            flags: "gi".to_string(),
        });
    }

    #[test]
    fn roundtrip_error() {
        roundtrip(Value::Error {
            message: "boom".to_string(),
            cause: None,
        });
        roundtrip(Value::Error {
            message: "outer".to_string(),
            cause: Some(Box::new(Value::Error {
                message: "inner".to_string(),
                cause: None,
            })),
        });
    }

    #[test]
    fn roundtrip_text_blobs() {
        roundtrip(Value::Blob(b"plain text payload".to_vec()));
        roundtrip(Value::Buffer(b"view contents".to_vec()));
    }

    #[test]
    fn roundtrip_typed_arrays() {
        roundtrip(Value::TypedArray(TypedArray::I8(vec![-128, 0, 127])));
        roundtrip(Value::TypedArray(TypedArray::U8(vec![0, 255])));
        roundtrip(Value::TypedArray(TypedArray::U8Clamped(vec![1, 2])));
        roundtrip(Value::TypedArray(TypedArray::I16(vec![-300, 300])));
        roundtrip(Value::TypedArray(TypedArray::U16(vec![65535])));
        roundtrip(Value::TypedArray(TypedArray::I32(vec![-70000, 70000])));
        roundtrip(Value::TypedArray(TypedArray::U32(vec![4_000_000_000])));
        roundtrip(Value::TypedArray(TypedArray::F32(vec![0.5, -2.25])));
        roundtrip(Value::TypedArray(TypedArray::F64(vec![1e100, -0.125])));
        roundtrip(Value::TypedArray(TypedArray::I64(vec![i64::MIN, i64::MAX])));
        roundtrip(Value::TypedArray(TypedArray::U64(vec![u64::MAX])));
    }

    #[test]
    fn roundtrip_array() {
        roundtrip(Value::Array(vec![
            Value::from(1),
            Value::from("two"),
            Value::Null,
            Value::Array(vec![Value::from(3)]),
        ]));
    }

    #[test]
    fn roundtrip_object() {
        roundtrip(Value::object(vec![
            ("name", Value::from("John")),
            ("age", Value::from("25")),
            (
                "tags",
                Value::Array(vec![Value::from("a"), Value::from("b")]),
            ),
        ]));
    }

    #[test]
    fn roundtrip_map_with_mixed_keys() {
        roundtrip(Value::map(vec![
            (Value::from(1), Value::from("a")),
            (Value::from("two"), Value::from(2)),
            (Value::Null, Value::Bool(true)),
        ]));
    }

    #[test]
    fn roundtrip_set() {
        roundtrip(Value::set(vec![
            Value::from(1),
            Value::from("x"),
            Value::Bool(false),
        ]));
    }

    #[test]
    fn roundtrip_deep_nesting() {
        roundtrip(Value::map(vec![(
            Value::from("users"),
            Value::Array(vec![Value::object(vec![
                ("name", Value::from("Alice")),
                ("scores", Value::set(vec![Value::from(10), Value::from(20)])),
            ])]),
        )]));
    }
}
