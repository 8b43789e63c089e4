//! Builders for untyped wire shapes.
//!
//! Each builder assembles the `serde_json::Value` of one OpenMath object from
//! already-built sub-shapes and validates the result, so a shape returned from here
//! can be handed to [`OmArena::decode_value`](crate::arena::OmArena::decode_value)
//! as-is. Sub-shapes are embedded by value: nothing is shared with the caller.
use serde_json::{Map, Value, json};

use crate::error::{OmError, OmResult};
use crate::node::{IntegerValue, NodeType, Symbol};
use crate::validate::{validate, validate_shallow};

fn validated(value: Value) -> OmResult<Value> {
    validate(&value)?;
    Ok(value)
}

/// Application over sub-shapes that were validated when they were built. Only the
/// new node's own rules are checked.
pub(crate) fn combine_application(children: Vec<Value>) -> OmResult<Value> {
    let value = json!({ "t": "a", "c": children });
    validate_shallow(&value)?;
    Ok(value)
}

/// Binding counterpart of [`combine_application`].
pub(crate) fn combine_binding(head: Value, variables: Vec<Value>, body: Value) -> OmResult<Value> {
    let value = json!({ "t": "bi", "s": head, "v": variables, "b": body });
    validate_shallow(&value)?;
    Ok(value)
}

pub fn integer(value: impl Into<IntegerValue>) -> OmResult<Value> {
    let v = match value.into() {
        IntegerValue::Native(n) => Value::from(n),
        IntegerValue::Text(s) => Value::from(s),
    };
    validated(json!({ "t": "i", "v": v }))
}

pub fn float(value: f64) -> OmResult<Value> {
    if value.is_nan() {
        return Err(OmError::Validation("OpenMath floats cannot be NaN".into()));
    }
    let Some(number) = serde_json::Number::from_f64(value) else {
        return Err(OmError::Validation("OpenMath floats must be finite".into()));
    };
    validated(json!({ "t": "f", "v": number }))
}

pub fn string(value: impl Into<String>) -> OmResult<Value> {
    validated(json!({ "t": "st", "v": value.into() }))
}

pub fn bytearray(value: &[u8]) -> OmResult<Value> {
    validated(json!({ "t": "ba", "v": value }))
}

pub fn symbol(name: &str, cd: &str, uri: Option<&str>) -> OmResult<Value> {
    let mut object = Map::new();
    object.insert("t".into(), "sy".into());
    object.insert("n".into(), name.into());
    object.insert("cd".into(), cd.into());
    if let Some(uri) = uri {
        object.insert("uri".into(), uri.into());
    }
    validated(Value::Object(object))
}

pub fn variable(name: &str) -> OmResult<Value> {
    validated(json!({ "t": "v", "n": name }))
}

/// Application of `children[0]` to `children[1..]`.
pub fn application(children: Vec<Value>) -> OmResult<Value> {
    validated(json!({ "t": "a", "c": children }))
}

/// Binding of `variables` in `body` under the head symbol `head`.
pub fn binding(head: Value, variables: Vec<Value>, body: Value) -> OmResult<Value> {
    validated(json!({ "t": "bi", "s": head, "v": variables, "b": body }))
}

pub fn error(head: Value, children: Vec<Value>) -> OmResult<Value> {
    validated(json!({ "t": "e", "s": head, "c": children }))
}

/// Add attribute entries to `node`. Keys must be symbol shapes; a key matching an
/// existing entry by name and content dictionary replaces it.
pub fn attribution(mut node: Value, attributes: Vec<(Value, Value)>) -> OmResult<Value> {
    let Some(object) = node.as_object_mut() else {
        return Err(OmError::Validation(
            "Invalid first parameter to attribution".into(),
        ));
    };

    for (key, value) in attributes {
        let key_symbol = symbol_from_value(&key)?;
        let map = object
            .entry("a")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(map) = map.as_object_mut() else {
            return Err(OmError::Validation(
                "Attributes must be an object".into(),
            ));
        };
        map.retain(|existing, _| {
            serde_json::from_str::<Value>(existing)
                .ok()
                .and_then(|existing| symbol_from_value(&existing).ok())
                .is_none_or(|existing| !existing.matches(&key_symbol))
        });
        map.insert(key.to_string(), value);
    }

    validated(node)
}

/// Read a [`Symbol`] out of a symbol shape.
pub fn symbol_from_value(value: &Value) -> OmResult<Symbol> {
    let object = value
        .as_object()
        .filter(|object| object.get("t").and_then(Value::as_str) == Some(NodeType::Symbol.tag()))
        .ok_or_else(|| OmError::Validation(format!("Not a symbol: {value}")))?;

    let field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| OmError::Validation(format!("Symbol field `{key}` must be a string")))
    };

    let symbol = Symbol::new(field("n")?, field("cd")?)?;
    Ok(match object.get("uri").and_then(Value::as_str) {
        Some(uri) => symbol.with_uri(uri),
        None => symbol,
    })
}
