//! Schema-driven conversion between wire JSON objects and typed resources.
//!
//! # Design
//! Each resource spells out its wire keys as private `const` strings and maps
//! them by hand in its `Resource` impl. Renaming a Rust field therefore never
//! changes what goes over the wire. The helpers here do the per-key reading
//! and writing so those impls stay one line per field:
//!
//! - An absent key and an explicit `null` both mean "unset".
//! - Unknown keys are ignored.
//! - Unset optional fields are omitted on encode, never written as `null`.
//! - Enumerated fields go through `WireEnum`; what happens to a string outside
//!   the known set is decided by `DecodeOptions`, not by the resource.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::DecodeError;

/// What to do when an enumerated field carries an unrecognized string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownVariantPolicy {
    /// Fail the whole decode with `DecodeError::UnknownVariant`.
    #[default]
    Reject,
    /// Keep the raw string in the enum's `Unrecognized` variant.
    Preserve,
}

/// Caller-selected decode behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub unknown_variants: UnknownVariantPolicy,
}

impl DecodeOptions {
    /// Options that keep unrecognized enum strings instead of failing.
    pub fn preserving() -> Self {
        Self {
            unknown_variants: UnknownVariantPolicy::Preserve,
        }
    }
}

/// A REST resource with a fixed wire representation.
pub trait Resource: Sized {
    /// Human-readable resource name, used in logs.
    const KIND: &'static str;

    /// Build the resource from a JSON object. Either every field is populated
    /// or an error is returned; there is no partial result.
    fn decode(object: &Map<String, Value>, options: &DecodeOptions) -> Result<Self, DecodeError>;

    /// Emit every set field under its wire key.
    fn encode(&self) -> Map<String, Value>;
}

/// An enumeration with an explicit mapping to and from wire strings.
pub trait WireEnum: Sized {
    /// Look up a known variant. Returns `None` for anything outside the set.
    fn from_wire(raw: &str) -> Option<Self>;

    /// Wrap a string outside the known set.
    fn unrecognized(raw: String) -> Self;

    /// The wire string for this value.
    fn as_wire(&self) -> &str;
}

/// Decode a resource from an already-parsed JSON value.
pub fn decode_value<R: Resource>(value: &Value, options: &DecodeOptions) -> Result<R, DecodeError> {
    match value {
        Value::Object(object) => R::decode(object, options).inspect_err(|err| {
            debug!(kind = R::KIND, %err, "resource decode failed");
        }),
        other => Err(DecodeError::UnexpectedShape {
            expected: "object",
            found: json_type_name(other),
        }),
    }
}

/// Decode a resource from a JSON document.
pub fn decode_str<R: Resource>(json: &str, options: &DecodeOptions) -> Result<R, DecodeError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    decode_value(&value, options)
}

/// Decode a JSON array of resource objects. Fails on the first bad element.
pub fn decode_list<R: Resource>(
    value: &Value,
    options: &DecodeOptions,
) -> Result<Vec<R>, DecodeError> {
    match value {
        Value::Array(items) => items.iter().map(|item| decode_value(item, options)).collect(),
        other => Err(DecodeError::UnexpectedShape {
            expected: "array",
            found: json_type_name(other),
        }),
    }
}

/// Encode a resource as a JSON object value.
pub fn encode_value<R: Resource>(resource: &R) -> Value {
    Value::Object(resource.encode())
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed read access to the keys of one wire object.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    options: &'a DecodeOptions,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(object: &'a Map<String, Value>, options: &'a DecodeOptions) -> Self {
        Self { object, options }
    }

    fn get(&self, key: &'static str) -> Option<&'a Value> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn required<T>(&self, key: &'static str, value: Option<T>) -> Result<T, DecodeError> {
        value.ok_or(DecodeError::MissingField { field: key })
    }

    pub(crate) fn optional_str(&self, key: &'static str) -> Result<Option<String>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(DecodeError::InvalidType {
                field: key,
                expected: "string",
            }),
        }
    }

    pub(crate) fn required_str(&self, key: &'static str) -> Result<String, DecodeError> {
        let value = self.optional_str(key)?;
        self.required(key, value)
    }

    pub(crate) fn optional_u64(&self, key: &'static str) -> Result<Option<u64>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or(DecodeError::InvalidType {
                field: key,
                expected: "unsigned integer",
            }),
        }
    }

    pub(crate) fn optional_bool(&self, key: &'static str) -> Result<Option<bool>, DecodeError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(DecodeError::InvalidType {
                field: key,
                expected: "boolean",
            }),
        }
    }

    pub(crate) fn optional_str_list(
        &self,
        key: &'static str,
    ) -> Result<Option<Vec<String>>, DecodeError> {
        let invalid = DecodeError::InvalidType {
            field: key,
            expected: "array of strings",
        };
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or(invalid.clone()))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(invalid),
        }
    }

    pub(crate) fn optional_enum<E: WireEnum>(
        &self,
        key: &'static str,
    ) -> Result<Option<E>, DecodeError> {
        match self.optional_str(key)? {
            None => Ok(None),
            Some(raw) => self.resolve_enum(key, raw).map(Some),
        }
    }

    pub(crate) fn required_enum<E: WireEnum>(&self, key: &'static str) -> Result<E, DecodeError> {
        let value = self.optional_enum(key)?;
        self.required(key, value)
    }

    fn resolve_enum<E: WireEnum>(&self, key: &'static str, raw: String) -> Result<E, DecodeError> {
        if let Some(known) = E::from_wire(&raw) {
            return Ok(known);
        }
        match self.options.unknown_variants {
            UnknownVariantPolicy::Reject => Err(DecodeError::UnknownVariant {
                field: key,
                value: raw,
            }),
            UnknownVariantPolicy::Preserve => {
                warn!(field = key, value = %raw, "keeping unrecognized enum value");
                Ok(E::unrecognized(raw))
            }
        }
    }
}

/// Accumulates wire keys for one encoded object, skipping unset fields.
#[derive(Default)]
pub(crate) struct FieldWriter {
    object: Map<String, Value>,
}

impl FieldWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn str(mut self, key: &'static str, value: &str) -> Self {
        self.object.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub(crate) fn opt_str(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.str(key, v),
            None => self,
        }
    }

    pub(crate) fn opt_u64(mut self, key: &'static str, value: Option<u64>) -> Self {
        if let Some(v) = value {
            self.object.insert(key.to_string(), Value::from(v));
        }
        self
    }

    pub(crate) fn opt_bool(mut self, key: &'static str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            self.object.insert(key.to_string(), Value::Bool(v));
        }
        self
    }

    pub(crate) fn opt_str_list(mut self, key: &'static str, value: Option<&[String]>) -> Self {
        if let Some(items) = value {
            let items = items.iter().cloned().map(Value::String).collect();
            self.object.insert(key.to_string(), Value::Array(items));
        }
        self
    }

    pub(crate) fn enumeration<E: WireEnum>(self, key: &'static str, value: &E) -> Self {
        self.str(key, value.as_wire())
    }

    pub(crate) fn opt_enumeration<E: WireEnum>(self, key: &'static str, value: Option<&E>) -> Self {
        match value {
            Some(v) => self.enumeration(key, v),
            None => self,
        }
    }

    pub(crate) fn finish(self) -> Map<String, Value> {
        self.object
    }
}

/// Implements `serde::Serialize` and `serde::Deserialize` for resources by
/// delegating to their `Resource` impl. Deserialization uses the default
/// (rejecting) `DecodeOptions`.
macro_rules! serde_via_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ::serde::Serialize for $ty {
                fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    let object = <$ty as $crate::codec::Resource>::encode(self);
                    ::serde::Serialize::serialize(&object, serializer)
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                    $crate::codec::decode_value(&value, &$crate::codec::DecodeOptions::default())
                        .map_err(::serde::de::Error::custom)
                }
            }
        )*
    };
}

pub(crate) use serde_via_codec;
