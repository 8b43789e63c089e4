//! Structural validation of untyped OpenMath shapes.
//!
//! [`validate`] walks a `serde_json::Value` and reports the first violation it
//! meets, or `Ok(())` if the shape describes a valid OpenMath object. Attribute
//! entries of a node are checked before the node's own fields, and lists are
//! checked left to right, so the reported violation is deterministic.
use serde_json::{Map, Value};

use crate::error::{OmError, OmResult};
use crate::ident::{is_identifier, is_integer_text};
use crate::node::{IntegerValue, NodeType};

#[inline]
fn fail<T>(reason: impl Into<String>) -> OmResult<T> {
    Err(OmError::Validation(reason.into()))
}

/// Short name of a JSON value's type for error messages.
pub(crate) fn json_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn node_type(object: &Map<String, Value>) -> Option<NodeType> {
    object.get("t")?.as_str()?.parse().ok()
}

/// Verify that an attribute key (given both as its text and as parsed JSON) encodes
/// a valid symbol.
pub(crate) fn validate_attribute_key(key: &str, symbol: &Value) -> OmResult<()> {
    let is_symbol = symbol
        .as_object()
        .is_some_and(|object| node_type(object) == Some(NodeType::Symbol));
    if !is_symbol {
        return fail(format!("Key {key} is not a symbol"));
    }
    validate(symbol)
}

fn check_keys(object: &Map<String, Value>, allowed: &[&str]) -> OmResult<()> {
    let t = display(object.get("t"));
    for key in object.keys() {
        if key != "t" && key != "a" && !allowed.contains(&key.as_str()) {
            return fail(format!("Key {key} not valid in object of type {t}"));
        }
    }
    Ok(())
}

fn check_attributes(object: &Map<String, Value>, depth: Depth) -> OmResult<()> {
    let Some(attributes) = object.get("a") else {
        return Ok(());
    };
    let Some(attributes) = attributes.as_object() else {
        return fail(format!(
            "Attributes must be an object, found {}",
            json_kind(Some(attributes))
        ));
    };

    for (key, value) in attributes {
        let Ok(symbol) = serde_json::from_str::<Value>(key) else {
            return fail(format!("Key {key} invalid JSON"));
        };
        validate_attribute_key(key, &symbol)?;
        depth.descend(value)?;
    }
    Ok(())
}

fn check_identifier(value: Option<&Value>, field: &str, owner: &str, role: &str) -> OmResult<()> {
    let Some(Value::String(name)) = value else {
        return fail(format!(
            "{field} for {owner} type was {}, not string",
            json_kind(value)
        ));
    };
    if !is_identifier(name) {
        return fail(format!("Invalid identifier as {role}: {name}"));
    }
    Ok(())
}

fn check_head_symbol(object: &Map<String, Value>, owner: &str, depth: Depth) -> OmResult<()> {
    let head = object.get("s");
    match head {
        Some(head) => depth.descend(head)?,
        None => return fail("Expected an object, found undefined"),
    }
    let is_symbol = head
        .and_then(Value::as_object)
        .is_some_and(|head| node_type(head) == Some(NodeType::Symbol));
    if !is_symbol {
        return fail(format!("Head of {owner} must be a symbol"));
    }
    Ok(())
}

/// Validate an untyped shape against the OpenMath data model.
///
/// ```
/// use hymath::validate::validate;
/// use serde_json::json;
///
/// assert!(validate(&json!({ "t": "a", "c": [{ "t": "v", "n": "f" }] })).is_ok());
/// let err = validate(&json!({ "t": "a", "c": [] })).unwrap_err();
/// assert_eq!(err.reason(), "Application object must have at least one child");
/// ```
pub fn validate(value: &Value) -> OmResult<()> {
    validate_at(value, Depth::Deep)
}

/// Check the rules of the top node of `value` only, taking its sub-shapes to be valid
/// already. Attribute keys are still checked.
pub(crate) fn validate_shallow(value: &Value) -> OmResult<()> {
    validate_at(value, Depth::Shallow)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Depth {
    Deep,
    Shallow,
}

impl Depth {
    #[inline]
    fn descend(self, value: &Value) -> OmResult<()> {
        match self {
            Depth::Deep => validate_at(value, Depth::Deep),
            Depth::Shallow => Ok(()),
        }
    }
}

fn validate_at(value: &Value, depth: Depth) -> OmResult<()> {
    let Some(object) = value.as_object() else {
        return fail(format!("Expected an object, found {}", json_kind(Some(value))));
    };

    check_attributes(object, depth)?;

    let Some(t) = node_type(object) else {
        return fail(format!("Invalid type: {}", display(object.get("t"))));
    };

    match t {
        NodeType::Integer => {
            check_keys(object, &["v"])?;
            let valid = match object.get("v") {
                Some(Value::Number(n)) => IntegerValue::from_number(n).is_some(),
                Some(Value::String(s)) => is_integer_text(s),
                _ => false,
            };
            if !valid {
                return fail(format!("Not an integer: {}", display(object.get("v"))));
            }
        }
        NodeType::Float => {
            check_keys(object, &["v"])?;
            let Some(v) = object.get("v").and_then(Value::as_f64) else {
                return fail(format!(
                    "Not a number: {} of type {}",
                    display(object.get("v")),
                    json_kind(object.get("v"))
                ));
            };
            if v.is_nan() {
                return fail("OpenMath floats cannot be NaN");
            }
            if !v.is_finite() {
                return fail("OpenMath floats must be finite");
            }
        }
        NodeType::String => {
            check_keys(object, &["v"])?;
            if !matches!(object.get("v"), Some(Value::String(_))) {
                return fail(format!(
                    "Value for st type was {}, not string",
                    json_kind(object.get("v"))
                ));
            }
        }
        NodeType::ByteArray => {
            check_keys(object, &["v"])?;
            let valid = object.get("v").and_then(Value::as_array).is_some_and(|bytes| {
                bytes
                    .iter()
                    .all(|b| b.as_u64().is_some_and(|b| b <= u8::MAX as u64))
            });
            if !valid {
                return fail("Value for ba type was not an array of bytes");
            }
        }
        NodeType::Symbol => {
            check_keys(object, &["n", "cd", "uri"])?;
            if !matches!(object.get("n"), Some(Value::String(_))) {
                return fail(format!(
                    "Name for sy type was {}, not string",
                    json_kind(object.get("n"))
                ));
            }
            if !matches!(object.get("cd"), Some(Value::String(_))) {
                return fail(format!(
                    "CD for sy type was {}, not string",
                    json_kind(object.get("cd"))
                ));
            }
            match object.get("uri") {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                uri => {
                    return fail(format!(
                        "URI for sy type was {}, not string",
                        json_kind(uri)
                    ));
                }
            }
            check_identifier(object.get("n"), "Name", "sy", "symbol name")?;
            check_identifier(object.get("cd"), "CD", "sy", "symbol CD")?;
        }
        NodeType::Variable => {
            check_keys(object, &["n"])?;
            check_identifier(object.get("n"), "Name", "v", "variable name")?;
        }
        NodeType::Application => {
            check_keys(object, &["c"])?;
            let Some(children) = object.get("c").and_then(Value::as_array) else {
                return fail("Children of application object was not an array");
            };
            if children.is_empty() {
                return fail("Application object must have at least one child");
            }
            children.iter().try_for_each(|child| depth.descend(child))?;
        }
        NodeType::Binding => {
            check_keys(object, &["s", "v", "b"])?;
            check_head_symbol(object, "a binding", depth)?;
            let Some(variables) = object.get("v").and_then(Value::as_array) else {
                return fail("In a binding, the v value must be an array");
            };
            for variable in variables {
                depth.descend(variable)?;
                let is_variable = variable
                    .as_object()
                    .is_some_and(|v| node_type(v) == Some(NodeType::Variable));
                if !is_variable {
                    return fail("In a binding, all values in the v array must have type v");
                }
            }
            match object.get("b") {
                Some(body) => depth.descend(body)?,
                None => return fail("Expected an object, found undefined"),
            }
        }
        NodeType::Error => {
            check_keys(object, &["s", "c"])?;
            check_head_symbol(object, "an error", depth)?;
            match object.get("c") {
                None => {}
                Some(Value::Array(children)) => {
                    children.iter().try_for_each(|child| depth.descend(child))?
                }
                Some(_) => return fail("In an error, the c key must be an array"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn shallow_checks_skip_sub_shapes() {
        let bad_child = json!({ "t": "a", "c": [{ "t": "v", "n": "1x" }] });
        assert!(validate(&bad_child).is_err());
        assert!(validate_shallow(&bad_child).is_ok());

        let bad_own = json!({ "t": "bi", "s": { "t": "v", "n": "f" }, "v": [], "b": { "t": "v", "n": "x" } });
        assert_eq!(
            validate_shallow(&bad_own).unwrap_err().reason(),
            "Head of a binding must be a symbol"
        );

        let bad_key = json!({ "t": "v", "n": "x", "a": { "nope": { "t": "i", "v": 1 } } });
        assert_eq!(
            validate_shallow(&bad_key).unwrap_err().reason(),
            "Key nope invalid JSON"
        );
    }
}
