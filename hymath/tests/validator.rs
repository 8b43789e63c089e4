use hymath::validate::validate;
use serde_json::{Value, json};

fn reason(value: Value) -> String {
    validate(&value).unwrap_err().reason().to_string()
}

fn plus() -> Value {
    json!({ "t": "sy", "n": "plus", "cd": "arith1" })
}

#[test]
fn accepts_every_kind() {
    let shapes = [
        json!({ "t": "i", "v": 42 }),
        json!({ "t": "i", "v": "-123456789012345678901234567890" }),
        json!({ "t": "f", "v": 1.5 }),
        json!({ "t": "st", "v": "hello" }),
        json!({ "t": "ba", "v": [0, 1, 255] }),
        json!({ "t": "sy", "n": "pi", "cd": "nums1", "uri": "http://www.openmath.org/cd" }),
        json!({ "t": "v", "n": "x" }),
        json!({ "t": "v", "n": "\u{03b1}" }),
        json!({ "t": "a", "c": [plus(), { "t": "i", "v": 1 }, { "t": "v", "n": "x" }] }),
        json!({ "t": "bi", "s": plus(), "v": [{ "t": "v", "n": "x" }], "b": { "t": "v", "n": "x" } }),
        json!({ "t": "e", "s": plus(), "c": [] }),
        json!({ "t": "e", "s": plus() }),
    ];
    for shape in shapes {
        assert!(validate(&shape).is_ok(), "{shape}");
    }
}

#[test]
fn rejects_non_objects_and_unknown_types() {
    assert_eq!(reason(json!(3)), "Expected an object, found number");
    assert_eq!(reason(json!([])), "Expected an object, found array");
    assert_eq!(reason(json!({ "t": "q" })), "Invalid type: q");
    assert_eq!(reason(json!({ "v": 3 })), "Invalid type: undefined");
}

#[test]
fn rejects_unrecognized_fields() {
    assert_eq!(
        reason(json!({ "t": "i", "v": 1, "x": 2 })),
        "Key x not valid in object of type i"
    );
    assert_eq!(
        reason(json!({ "t": "v", "n": "x", "p": {} })),
        "Key p not valid in object of type v"
    );
}

#[test]
fn rejects_bad_payloads() {
    assert_eq!(reason(json!({ "t": "i", "v": "12a" })), "Not an integer: 12a");
    assert_eq!(reason(json!({ "t": "i", "v": 1.5 })), "Not an integer: 1.5");
    assert!(validate(&json!({ "t": "i", "v": 1e3 })).is_ok());
    assert!(validate(&json!({ "t": "i", "v": 1.0 })).is_ok());
    assert_eq!(
        reason(json!({ "t": "f", "v": "1.5" })),
        "Not a number: 1.5 of type string"
    );
    assert_eq!(
        reason(json!({ "t": "st", "v": 3 })),
        "Value for st type was number, not string"
    );
    assert_eq!(
        reason(json!({ "t": "ba", "v": [1, 256] })),
        "Value for ba type was not an array of bytes"
    );
    assert_eq!(
        reason(json!({ "t": "sy", "n": 1, "cd": "a" })),
        "Name for sy type was number, not string"
    );
    assert_eq!(
        reason(json!({ "t": "sy", "n": "a" })),
        "CD for sy type was undefined, not string"
    );
    assert_eq!(
        reason(json!({ "t": "sy", "n": "a", "cd": "b", "uri": 3 })),
        "URI for sy type was number, not string"
    );
}

#[test]
fn rejects_bad_identifiers() {
    assert_eq!(
        reason(json!({ "t": "v", "n": "1x" })),
        "Invalid identifier as variable name: 1x"
    );
    assert_eq!(
        reason(json!({ "t": "sy", "n": "a b", "cd": "c" })),
        "Invalid identifier as symbol name: a b"
    );
    assert_eq!(
        reason(json!({ "t": "sy", "n": "a", "cd": "" })),
        "Invalid identifier as symbol CD: "
    );
}

#[test]
fn rejects_empty_application() {
    assert_eq!(
        reason(json!({ "t": "a", "c": [] })),
        "Application object must have at least one child"
    );
    assert_eq!(
        reason(json!({ "t": "a", "c": {} })),
        "Children of application object was not an array"
    );
}

#[test]
fn rejects_malformed_bindings() {
    let x = json!({ "t": "v", "n": "x" });
    assert_eq!(
        reason(json!({ "t": "bi", "s": x, "v": [x], "b": x })),
        "Head of a binding must be a symbol"
    );
    assert_eq!(
        reason(json!({ "t": "bi", "s": plus(), "v": x, "b": x })),
        "In a binding, the v value must be an array"
    );
    assert_eq!(
        reason(json!({ "t": "bi", "s": plus(), "v": [{ "t": "i", "v": 1 }], "b": x })),
        "In a binding, all values in the v array must have type v"
    );
    assert_eq!(
        reason(json!({ "t": "bi", "s": plus(), "v": [x] })),
        "Expected an object, found undefined"
    );
}

#[test]
fn rejects_malformed_errors() {
    assert_eq!(
        reason(json!({ "t": "e", "s": { "t": "i", "v": 1 }, "c": [] })),
        "Head of an error must be a symbol"
    );
    assert_eq!(
        reason(json!({ "t": "e", "s": plus(), "c": 3 })),
        "In an error, the c key must be an array"
    );
}

#[test]
fn rejects_nan_and_infinite_floats() {
    // serde_json cannot hold NaN, so the factory path is the one that sees it.
    let mut arena = hymath::arena::OmArena::new();
    assert_eq!(
        arena.float(f64::NAN).unwrap_err().reason(),
        "OpenMath floats cannot be NaN"
    );
    assert_eq!(
        arena.float(f64::INFINITY).unwrap_err().reason(),
        "OpenMath floats must be finite"
    );
}

#[test]
fn attributes_are_checked_first() {
    let key = json!({ "t": "sy", "n": "type", "cd": "sts" }).to_string();
    let mut attrs = serde_json::Map::new();
    attrs.insert(key, json!({ "t": "v", "n": "1bad" }));
    // The node itself is invalid too, but the attribute is reported.
    let shape = json!({ "t": "a", "c": [], "a": attrs });
    assert_eq!(reason(shape), "Invalid identifier as variable name: 1bad");
}

#[test]
fn rejects_bad_attribute_keys() {
    let mut attrs = serde_json::Map::new();
    attrs.insert("not json".into(), json!({ "t": "i", "v": 1 }));
    assert_eq!(
        reason(json!({ "t": "i", "v": 1, "a": attrs })),
        "Key not json invalid JSON"
    );

    let mut attrs = serde_json::Map::new();
    let key = json!({ "t": "v", "n": "x" }).to_string();
    attrs.insert(key.clone(), json!({ "t": "i", "v": 1 }));
    assert_eq!(
        reason(json!({ "t": "i", "v": 1, "a": attrs })),
        format!("Key {key} is not a symbol")
    );
}

#[test]
fn first_violation_is_leftmost() {
    let shape = json!({
        "t": "a",
        "c": [plus(), { "t": "v", "n": "9" }, { "t": "i", "v": "x" }]
    });
    assert_eq!(reason(shape), "Invalid identifier as variable name: 9");
}
