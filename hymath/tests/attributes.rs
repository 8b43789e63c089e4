use hymath::prelude::*;

fn sts_type() -> Symbol {
    Symbol::new("type", "sts").unwrap()
}

#[test]
fn set_get_remove() {
    let mut arena = OmArena::new();
    let x = arena.variable("x").unwrap();
    let real = arena.symbol("R", "setname1", None).unwrap();

    assert_eq!(arena.get_attribute(x, &sts_type()), None);
    assert_eq!(arena.set_attribute(x, sts_type(), real).unwrap(), None);
    assert_eq!(arena.get_attribute(x, &sts_type()), Some(real));
    assert_eq!(arena.parent(real), Some(x));
    assert!(arena.node(x).has_attributes());

    assert_eq!(arena.remove_attribute(x, &sts_type()), Some(real));
    assert_eq!(arena.get_attribute(x, &sts_type()), None);
    assert_eq!(arena.parent(real), None);
    assert!(arena.contains(real));
    assert!(!arena.node(x).has_attributes());

    assert_eq!(arena.remove_attribute(x, &sts_type()), None);
}

#[test]
fn keys_ignore_the_uri() {
    let mut arena = OmArena::new();
    let x = arena.variable("x").unwrap();
    let value = arena.integer(1).unwrap();
    let with_uri = sts_type().with_uri("http://www.openmath.org/cd");

    arena.set_attribute(x, with_uri, value).unwrap();
    assert_eq!(arena.get_attribute(x, &sts_type()), Some(value));

    let other_cd = Symbol::new("type", "sts2").unwrap();
    assert_eq!(arena.get_attribute(x, &other_cd), None);
}

#[test]
fn setting_again_replaces_the_previous_value() {
    let mut arena = OmArena::new();
    let x = arena.variable("x").unwrap();
    let first = arena.integer(1).unwrap();
    let second = arena.integer(2).unwrap();

    arena.set_attribute(x, sts_type(), first).unwrap();
    assert_eq!(arena.set_attribute(x, sts_type(), second).unwrap(), Some(first));
    assert_eq!(arena.parent(first), None);
    assert_eq!(arena.node(x).attributes().count(), 1);
    assert_eq!(arena.get_attribute(x, &sts_type()), Some(second));

    // Re-setting the current value keeps it in place.
    assert_eq!(arena.set_attribute(x, sts_type(), second).unwrap(), None);
    assert_eq!(arena.get_attribute(x, &sts_type()), Some(second));
    assert_eq!(arena.parent(second), Some(x));
}

#[test]
fn value_is_detached_from_its_tree() {
    let mut arena = OmArena::new();
    let x = arena.variable("x").unwrap();
    let other = arena.simple_decode("f(y,z)").unwrap();
    let y = arena.node(other).children()[1].id();

    arena.set_attribute(x, sts_type(), y).unwrap();
    assert_eq!(arena.simple_encode(other), "f(z)");
    assert_eq!(arena.parent(y), Some(x));
}

#[test]
fn cycles_are_refused() {
    let mut arena = OmArena::new();
    let root = arena.simple_decode("f(g(x))").unwrap();
    let g = arena.node(root).children()[1].id();
    let x = arena.node(g).children()[1].id();

    assert!(arena.set_attribute(x, sts_type(), root).unwrap_err().is_operation_refused());
    assert!(arena.set_attribute(x, sts_type(), g).unwrap_err().is_operation_refused());
    assert!(arena.set_attribute(x, sts_type(), x).unwrap_err().is_operation_refused());
    assert!(!arena.node(x).has_attributes());
    assert_eq!(arena.simple_encode(root), "f(g(x))");

    // Descendants are fine: they are moved under the owner.
    let h = arena.simple_decode("h(k)").unwrap();
    let k = arena.node(h).children()[1].id();
    arena.set_attribute(h, sts_type(), k).unwrap();
    assert_eq!(arena.simple_encode(h), "h()");
    assert_eq!(arena.get_attribute(h, &sts_type()), Some(k));
}

#[test]
fn stale_nodes_are_refused() {
    let mut arena = OmArena::new();
    let x = arena.variable("x").unwrap();
    let gone = arena.integer(1).unwrap();
    arena.discard(gone).unwrap();

    assert!(arena.set_attribute(x, sts_type(), gone).unwrap_err().is_operation_refused());
    assert!(arena.set_attribute(gone, sts_type(), x).unwrap_err().is_operation_refused());
    assert_eq!(arena.get_attribute(gone, &sts_type()), None);
}

#[test]
fn attributes_survive_the_wire() {
    let mut arena = OmArena::new();
    let x = arena.variable("x").unwrap();
    let real = arena.symbol("R", "setname1", None).unwrap();
    arena.set_attribute(x, sts_type(), real).unwrap();

    let text = arena.encode(x).unwrap();
    let back = arena.decode(&text).unwrap();
    let value = arena.get_attribute(back, &sts_type()).unwrap();
    assert_eq!(arena.node(value).name(), Some("R"));
    assert_eq!(arena.parent(value), Some(back));
    assert!(arena.equals(x, back, true));
}
