//! Dynamic tagged value type.

use std::collections::BTreeMap;

/// A fixed-width numeric array.
///
/// Each variant corresponds to one element width/signedness/float
/// combination and crosses the envelope as a comma-joined decimal string.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    /// Signed 8-bit elements.
    I8(Vec<i8>),
    /// Unsigned 8-bit elements.
    U8(Vec<u8>),
    /// Unsigned 8-bit elements with clamped conversion semantics.
    U8Clamped(Vec<u8>),
    /// Signed 16-bit elements.
    I16(Vec<i16>),
    /// Unsigned 16-bit elements.
    U16(Vec<u16>),
    /// Signed 32-bit elements.
    I32(Vec<i32>),
    /// Unsigned 32-bit elements.
    U32(Vec<u32>),
    /// 32-bit float elements.
    F32(Vec<f32>),
    /// 64-bit float elements.
    F64(Vec<f64>),
    /// Signed 64-bit elements.
    I64(Vec<i64>),
    /// Unsigned 64-bit elements.
    U64(Vec<u64>),
}

impl TypedArray {
    /// The wire tag identifying this array's element type.
    pub fn tag(&self) -> &'static str {
        match self {
            TypedArray::I8(_) => "Int8Array",
            TypedArray::U8(_) => "Uint8Array",
            TypedArray::U8Clamped(_) => "Uint8ClampedArray",
            TypedArray::I16(_) => "Int16Array",
            TypedArray::U16(_) => "Uint16Array",
            TypedArray::I32(_) => "Int32Array",
            TypedArray::U32(_) => "Uint32Array",
            TypedArray::F32(_) => "Float32Array",
            TypedArray::F64(_) => "Float64Array",
            TypedArray::I64(_) => "BigInt64Array",
            TypedArray::U64(_) => "BigUint64Array",
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            TypedArray::I8(v) => v.len(),
            TypedArray::U8(v) | TypedArray::U8Clamped(v) => v.len(),
            TypedArray::I16(v) => v.len(),
            TypedArray::U16(v) => v.len(),
            TypedArray::I32(v) => v.len(),
            TypedArray::U32(v) => v.len(),
            TypedArray::F32(v) => v.len(),
            TypedArray::F64(v) => v.len(),
            TypedArray::I64(v) => v.len(),
            TypedArray::U64(v) => v.len(),
        }
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Join the elements into the comma-separated decimal payload form.
    pub fn join(&self) -> String {
        fn join<T: ToString>(items: &[T]) -> String {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        }
        match self {
            TypedArray::I8(v) => join(v),
            TypedArray::U8(v) | TypedArray::U8Clamped(v) => join(v),
            TypedArray::I16(v) => join(v),
            TypedArray::U16(v) => join(v),
            TypedArray::I32(v) => join(v),
            TypedArray::U32(v) => join(v),
            TypedArray::F32(v) => join(v),
            TypedArray::F64(v) => join(v),
            TypedArray::I64(v) => join(v),
            TypedArray::U64(v) => join(v),
        }
    }
}

/// A dynamic value that the envelope codec can round-trip.
///
/// This is the closed universe of kinds the store can persist. Kind
/// dispatch is total by construction: every value a caller can build maps
/// to exactly one variant, so encoding never fails on an unclassifiable
/// input. Foreign application types are expressed as an [`Value::Object`]
/// of their string properties.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent-with-intent marker (distinct from `Null`).
    Undefined,
    /// The null marker.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar. NaN and the infinities round-trip via special
    /// literal payloads.
    Number(f64),
    /// Text scalar.
    Text(String),
    /// Arbitrary-precision integer, carried as its decimal digit string.
    BigInt(String),
    /// Symbolic atom, carried as its description only. Decoding produces
    /// a new atom that is equal by description, never the original.
    Symbol(String),
    /// Callable source text. Decoding carries the text through verbatim;
    /// it is never evaluated.
    Function(String),
    /// Boxed text wrapper object.
    BoxedText(String),
    /// Boxed number wrapper object.
    BoxedNumber(f64),
    /// Boxed boolean wrapper object.
    BoxedBool(bool),
    /// Instant in time, as milliseconds since the Unix epoch.
    Date(i64),
    /// Regular expression pattern.
    Regex {
        /// The pattern source.
        source: String,
        /// The pattern flags.
        flags: String,
    },
    /// Opaque binary blob. The payload crosses the envelope as UTF-8
    /// text, so non-text bytes are lossy.
    Blob(Vec<u8>),
    /// Raw byte buffer or view. Same UTF-8 text mediation as `Blob`.
    Buffer(Vec<u8>),
    /// Fixed-width numeric array.
    TypedArray(TypedArray),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// String-keyed record. Keys are held sorted; insertion order is not
    /// preserved, which keeps the encoded form deterministic.
    Object(BTreeMap<String, Value>),
    /// Insertion-ordered mapping whose keys may be of any kind.
    Map(Vec<(Value, Value)>),
    /// Insertion-ordered collection of unique values.
    Set(Vec<Value>),
    /// Wrapped error with an optional cause.
    Error {
        /// The error message.
        message: String,
        /// The value that caused this error, if any.
        cause: Option<Box<Value>>,
    },
}

fn num_eq(a: f64, b: f64) -> bool {
    // NaN compares equal to NaN so stored values survive a round trip.
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) | (Value::BoxedBool(a), Value::BoxedBool(b)) => {
                a == b
            }
            (Value::Number(a), Value::Number(b))
            | (Value::BoxedNumber(a), Value::BoxedNumber(b)) => num_eq(*a, *b),
            (Value::Text(a), Value::Text(b))
            | (Value::BigInt(a), Value::BigInt(b))
            | (Value::Symbol(a), Value::Symbol(b))
            | (Value::Function(a), Value::Function(b))
            | (Value::BoxedText(a), Value::BoxedText(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (
                Value::Regex {
                    source: a_source,
                    flags: a_flags,
                },
                Value::Regex {
                    source: b_source,
                    flags: b_flags,
                },
            ) => a_source == b_source && a_flags == b_flags,
            (Value::Blob(a), Value::Blob(b)) | (Value::Buffer(a), Value::Buffer(b)) => a == b,
            (Value::TypedArray(a), Value::TypedArray(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Error {
                    message: a_message,
                    cause: a_cause,
                },
                Value::Error {
                    message: b_message,
                    cause: b_cause,
                },
            ) => a_message == b_message && a_cause == b_cause,
            _ => false,
        }
    }
}

impl Value {
    /// Create a map value, deduplicating keys.
    ///
    /// A repeated key keeps its first position but takes the last value,
    /// matching insertion-order map semantics.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            if let Some(existing) = entries.iter_mut().find(|(k, _)| *k == key) {
                existing.1 = value;
            } else {
                entries.push((key, value));
            }
        }
        Value::Map(entries)
    }

    /// Create a set value, deduplicating elements and keeping first
    /// occurrence order.
    pub fn set(elements: Vec<Value>) -> Self {
        let mut unique: Vec<Value> = Vec::with_capacity(elements.len());
        for element in elements {
            if !unique.contains(&element) {
                unique.push(element);
            }
        }
        Value::Set(unique)
    }

    /// Create an object value from string-keyed pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    /// The wire tag this value encodes under.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::BigInt(_) => "bigint",
            Value::Symbol(_) => "symbol",
            Value::Function(_) => "function",
            Value::BoxedText(_) => "String",
            Value::BoxedNumber(_) => "Number",
            Value::BoxedBool(_) => "Boolean",
            Value::Date(_) => "Date",
            Value::Regex { .. } => "RegExp",
            Value::Blob(_) => "Blob",
            Value::Buffer(_) => "ArrayBuffer",
            Value::TypedArray(arr) => arr.tag(),
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Map(_) => "Map",
            Value::Set(_) => "Set",
            Value::Error { .. } => "Error",
        }
    }

    /// Check if this value is the undefined marker.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as an object, if it is one.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get this value's map entries, if it is a map.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get this value's set elements, if it is a set.
    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a field in this object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(fields)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_deduplicates_keys() {
        let map = Value::map(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]);

        if let Value::Map(entries) = map {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0], (Value::from("a"), Value::from(3)));
            assert_eq!(entries[1], (Value::from("b"), Value::from(2)));
        } else {
            panic!("Expected Map");
        }
    }

    #[test]
    fn map_keys_may_be_any_kind() {
        let map = Value::map(vec![
            (Value::from(1), Value::from("one")),
            (Value::Null, Value::from("null")),
        ]);
        let entries = map.as_entries().unwrap();
        assert_eq!(entries[0].0, Value::from(1));
        assert_eq!(entries[1].0, Value::Null);
    }

    #[test]
    fn set_deduplicates_elements() {
        let set = Value::set(vec![
            Value::from(1),
            Value::from(2),
            Value::from(1),
            Value::from(3),
        ]);
        assert_eq!(
            set.as_set().unwrap(),
            &[Value::from(1), Value::from(2), Value::from(3)]
        );
    }

    #[test]
    fn nan_compares_equal_to_itself() {
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Number(f64::NAN), Value::Number(1.0));
    }

    #[test]
    fn boxed_and_plain_scalars_are_distinct() {
        assert_ne!(Value::Text("x".to_string()), Value::BoxedText("x".to_string()));
        assert_ne!(Value::Bool(true), Value::BoxedBool(true));
        assert_ne!(Value::Number(1.0), Value::BoxedNumber(1.0));
    }

    #[test]
    fn value_accessors() {
        assert!(Value::Null.is_null());
        assert!(Value::Undefined.is_undefined());
        assert!(!Value::Null.is_undefined());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(42.0).as_number(), Some(42.0));
        assert_eq!(Value::Text("hi".to_string()).as_text(), Some("hi"));
        assert_eq!(Value::Number(42.0).as_text(), None);
    }

    #[test]
    fn object_get() {
        let object = Value::object(vec![
            ("name", Value::from("Alice")),
            ("age", Value::from(30)),
        ]);

        assert_eq!(object.get("name"), Some(&Value::from("Alice")));
        assert_eq!(object.get("age"), Some(&Value::from(30)));
        assert_eq!(object.get("missing"), None);
    }

    #[test]
    fn typed_array_join() {
        let arr = TypedArray::I16(vec![-1, 0, 300]);
        assert_eq!(arr.tag(), "Int16Array");
        assert_eq!(arr.join(), "-1,0,300");
        assert_eq!(TypedArray::U8(vec![]).join(), "");
    }

    #[test]
    fn tags_match_wire_names() {
        assert_eq!(Value::Undefined.tag(), "undefined");
        assert_eq!(Value::from(1).tag(), "number");
        assert_eq!(Value::BoxedNumber(1.0).tag(), "Number");
        assert_eq!(Value::Date(0).tag(), "Date");
        assert_eq!(
            Value::TypedArray(TypedArray::F64(vec![])).tag(),
            "Float64Array"
        );
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Number(42.0));
        assert_eq!(Value::from(42u32), Value::Number(42.0));
        assert_eq!(Value::from(1.5f64), Value::Number(1.5));
        assert_eq!(Value::from("hello"), Value::Text("hello".to_string()));
        assert_eq!(Value::from(()), Value::Null);
    }
}
