// ABOUTME: Dynamic document value type and the materializing event sink.
// ABOUTME: ValueBuilder composes the decoder's event stream back into a Value tree.

use crate::error::{Error, Result};
use crate::sink::{Context, Sink};
use crate::types::StringTag;
use std::collections::BTreeMap;
use std::fmt;

/// A decoded UBJSON value.
///
/// This is similar to `serde_json::Value` but keeps the distinctions the wire
/// format makes: unsigned 8-bit integers stay unsigned, and high-precision
/// numbers keep their exact textual form with an integer/decimal split.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `Z`
    #[default]
    Null,
    /// `T` / `F`
    Bool(bool),
    /// `i I l L`
    Int(i64),
    /// `U`
    UInt(u64),
    /// `d D`
    Double(f64),
    /// `S` and `C`
    String(String),
    /// `H` with an integer-shaped payload
    BigInt(String),
    /// `H` with any other numeric payload
    BigDecimal(String),
    /// `[`
    Array(Vec<Value>),
    /// `{` (using `BTreeMap` for deterministic ordering)
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns true if this value is null.
    #[must_use] pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a boolean.
    #[must_use] pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this value is any numeric type.
    #[must_use] pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::UInt(_) | Value::Double(_) | Value::BigInt(_) | Value::BigDecimal(_)
        )
    }

    /// Returns true if this value is a string.
    #[must_use] pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this value is an array.
    #[must_use] pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this value is an object.
    #[must_use] pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// If this is a boolean, returns the value.
    #[must_use] pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If this is an integer representable as i64, returns the value.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // try_from check ensures no wrap
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::UInt(n) if i64::try_from(*n).is_ok() => Some(*n as i64),
            Value::BigInt(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// If this is an integer representable as u64, returns the value.
    #[must_use]
    #[allow(clippy::cast_sign_loss)] // >= 0 checked before cast
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            Value::Int(n) if *n >= 0 => Some(*n as u64),
            Value::BigInt(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// If this is a number, returns the value as f64.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Intentional: int-to-float conversion may lose precision
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            Value::BigInt(s) | Value::BigDecimal(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// If this is a string, returns a reference to it.
    #[must_use] pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If this is an array, returns a reference to it.
    #[must_use] pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// If this is an object, returns a reference to it.
    #[must_use] pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Index into an array. Returns None if not an array or index out of bounds.
    #[must_use] pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Index into an object by key. Returns None if not an object or key not found.
    #[must_use] pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
}

// Human-readable JSON-like output
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Double(n) => {
                if n.is_finite() {
                    write!(f, "{n}")
                } else if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_sign_positive() {
                    write!(f, "Infinity")
                } else {
                    write!(f, "-Infinity")
                }
            }
            Value::String(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::BigInt(s) | Value::BigDecimal(s) => write!(f, "{s}"),
            Value::Array(a) => {
                write!(f, "[")?;
                for (i, v) in a.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": {}", k.escape_default(), v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i8> for Value {
    fn from(n: i8) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::UInt(u64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Double(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

/// A partially built container on the materializer's stack.
enum Frame {
    Array(Vec<Value>),
    Object {
        members: BTreeMap<String, Value>,
        pending_key: Option<String>,
    },
}

/// A [`Sink`] that composes the event stream back into a [`Value`] tree.
///
/// Drive a [`Reader`](crate::Reader) with this sink, then take the result
/// with [`into_value`](ValueBuilder::into_value). The decoder never builds
/// trees itself; this sink is the materializing consumer.
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The materialized top-level value, if one was delivered.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.root
    }

    fn push_value(&mut self, value: Value) -> Result<bool> {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object {
                members,
                pending_key,
            }) => match pending_key.take() {
                Some(key) => {
                    members.insert(key, value);
                }
                None => return Err(Error::custom("object value without a key")),
            },
            None => self.root = Some(value),
        }
        Ok(true)
    }
}

impl Sink for ValueBuilder {
    fn on_null(&mut self, _ctx: Context) -> Result<bool> {
        self.push_value(Value::Null)
    }

    fn on_bool(&mut self, value: bool, _ctx: Context) -> Result<bool> {
        self.push_value(Value::Bool(value))
    }

    fn on_int(&mut self, value: i64, _ctx: Context) -> Result<bool> {
        self.push_value(Value::Int(value))
    }

    fn on_uint(&mut self, value: u64, _ctx: Context) -> Result<bool> {
        self.push_value(Value::UInt(value))
    }

    fn on_double(&mut self, value: f64, _ctx: Context) -> Result<bool> {
        self.push_value(Value::Double(value))
    }

    fn on_string(&mut self, value: &str, tag: StringTag, _ctx: Context) -> Result<bool> {
        let value = match tag {
            StringTag::Plain => Value::String(value.to_owned()),
            StringTag::BigInteger => Value::BigInt(value.to_owned()),
            StringTag::BigDecimal => Value::BigDecimal(value.to_owned()),
        };
        self.push_value(value)
    }

    fn on_key(&mut self, key: &str, _ctx: Context) -> Result<bool> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_key, .. }) if pending_key.is_none() => {
                *pending_key = Some(key.to_owned());
                Ok(true)
            }
            _ => Err(Error::custom("key outside of an object")),
        }
    }

    fn on_begin_array(&mut self, _count: Option<usize>, _ctx: Context) -> Result<bool> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(true)
    }

    fn on_end_array(&mut self, _ctx: Context) -> Result<bool> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push_value(Value::Array(items)),
            _ => Err(Error::custom("array end without matching begin")),
        }
    }

    fn on_begin_object(&mut self, _count: Option<usize>, _ctx: Context) -> Result<bool> {
        self.stack.push(Frame::Object {
            members: BTreeMap::new(),
            pending_key: None,
        });
        Ok(true)
    }

    fn on_end_object(&mut self, _ctx: Context) -> Result<bool> {
        match self.stack.pop() {
            Some(Frame::Object {
                members,
                pending_key: None,
            }) => self.push_value(Value::Object(members)),
            Some(Frame::Object { .. }) => Err(Error::custom("object ended after a dangling key")),
            _ => Err(Error::custom("object end without matching begin")),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::UInt(n) => serializer.serialize_u64(*n),
            Value::Double(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            // High-precision numbers keep their exact textual form
            Value::BigInt(s) | Value::BigDecimal(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                use serde::ser::SerializeMap;
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (key, val) in map {
                    m.serialize_entry(key, val)?;
                }
                m.end()
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> serde::de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "any valid UBJSON value")
            }

            fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
                Ok(Value::Int(v))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
                if i64::try_from(v).is_ok() {
                    Ok(Value::Int(v as i64))
                } else {
                    Ok(Value::UInt(v))
                }
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
                Ok(Value::Double(v))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
                Ok(Value::String(v))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> std::result::Result<Value, D::Error> {
                serde::Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Value, A::Error> {
                let mut arr = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    arr.push(elem);
                }
                Ok(Value::Array(arr))
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Value, A::Error> {
                let mut obj = BTreeMap::new();
                while let Some((key, val)) = map.next_entry()? {
                    obj.insert(key, val);
                }
                Ok(Value::Object(obj))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context { position: 0, depth: 0 }
    }

    #[test]
    fn test_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(-3).as_i64(), Some(-3));
        assert_eq!(Value::UInt(7).as_i64(), Some(7));
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::BigInt("42".into()).as_i64(), Some(42));
        assert_eq!(Value::BigDecimal("1.5".into()).as_f64(), Some(1.5));
        assert!(Value::BigInt("9".repeat(40)).is_number());
        assert_eq!(Value::String("x".into()).as_str(), Some("x"));
    }

    #[test]
    fn test_indexing() {
        let v = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(v.get(1), Some(&Value::Int(2)));
        assert_eq!(v.get(2), None);

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Value::Bool(false));
        let v = Value::Object(map);
        assert_eq!(v.get_key("a"), Some(&Value::Bool(false)));
        assert_eq!(v.get_key("b"), None);
    }

    #[test]
    fn test_display() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), Value::Array(vec![Value::Null, Value::Int(1)]));
        let v = Value::Object(map);
        assert_eq!(v.to_string(), "{\"k\": [null, 1]}");
        assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::BigDecimal("1.5".into()).to_string(), "1.5");
    }

    #[test]
    fn test_builder_materializes_nested_document() {
        let mut b = ValueBuilder::new();
        b.on_begin_object(None, ctx()).unwrap();
        b.on_key("items", ctx()).unwrap();
        b.on_begin_array(Some(2), ctx()).unwrap();
        b.on_int(1, ctx()).unwrap();
        b.on_string("two", StringTag::Plain, ctx()).unwrap();
        b.on_end_array(ctx()).unwrap();
        b.on_key("big", ctx()).unwrap();
        b.on_string("-7", StringTag::BigInteger, ctx()).unwrap();
        b.on_end_object(ctx()).unwrap();

        let value = b.into_value().unwrap();
        assert_eq!(
            value.get_key("items"),
            Some(&Value::Array(vec![
                Value::Int(1),
                Value::String("two".into())
            ]))
        );
        assert_eq!(value.get_key("big"), Some(&Value::BigInt("-7".into())));
    }

    #[test]
    fn test_builder_rejects_misordered_events() {
        let mut b = ValueBuilder::new();
        assert!(b.on_key("k", ctx()).is_err());

        let mut b = ValueBuilder::new();
        assert!(b.on_end_array(ctx()).is_err());

        let mut b = ValueBuilder::new();
        b.on_begin_object(None, ctx()).unwrap();
        b.on_key("k", ctx()).unwrap();
        assert!(b.on_end_object(ctx()).is_err());
    }
}
