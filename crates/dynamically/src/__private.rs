//! Helpers called by generated factories. Not a stable API.

use crate::{Error, Value};
use serde::de::DeserializeOwned;
use serde_json::Map;

/// The input as a field map.
pub fn object(value: &Value) -> Result<&Map<String, Value>, Error> {
    value.as_object().ok_or(Error::ExpectedObject {
        found: kind(value),
    })
}

/// A required member. Exact name first, then ASCII case-insensitive, then
/// ignoring underscores (`start_x` finds `StartX`).
pub fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, Error> {
    lookup(object, name).ok_or_else(|| Error::MissingField {
        field: name.to_string(),
    })
}

/// An optional member; `null` counts as absent.
#[must_use]
pub fn optional<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    lookup(object, name).filter(|v| !v.is_null())
}

fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(name) {
        return Some(value);
    }

    if let Some((_, value)) = object.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        return Some(value);
    }

    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    };
    let wanted = squash(name);

    object
        .iter()
        .find(|(k, _)| squash(k) == wanted)
        .map(|(_, v)| v)
}

/// Plain deserialization of a scalar or scalar container.
pub fn direct<T: DeserializeOwned>(value: &Value, name: &str) -> Result<T, Error> {
    T::deserialize(value).map_err(|e| Error::InvalidField {
        field: name.to_string(),
        message: e.to_string(),
    })
}

/// Run a nested factory, tagging failures with the member name.
pub fn nested<T>(
    value: &Value,
    name: &str,
    factory: impl FnOnce(&Value) -> Result<T, Error>,
) -> Result<T, Error> {
    factory(value).map_err(|error| Error::Field {
        field: name.to_string(),
        error: Box::new(error),
    })
}

/// Apply a single factory to every element of an array, in order.
pub fn many<T>(
    value: &Value,
    factory: impl Fn(&Value) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let items = value.as_array().ok_or(Error::ExpectedArray {
        found: kind(value),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            factory(item).map_err(|error| Error::Element {
                index,
                error: Box::new(error),
            })
        })
        .collect()
}

/// Freeze a collected sequence into a fixed array.
#[must_use]
pub fn materialize<T>(items: Vec<T>) -> Box<[T]> {
    items.into_boxed_slice()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
