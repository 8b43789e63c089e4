use hymath::prelude::*;

fn compact(arena: &OmArena, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| arena.simple_encode(id)).collect()
}

#[test]
fn descendants_are_pre_order() {
    let mut arena = OmArena::new();
    let root = arena.simple_decode("f(g(1),logic1.forall[x,h(x)])").unwrap();
    let order: Vec<String> = arena
        .descendants(root)
        .map(|node| node.to_string())
        .collect();
    assert_eq!(
        order,
        [
            "f(g(1),logic1.forall[x,h(x)])",
            "f",
            "g(1)",
            "g",
            "1",
            "logic1.forall[x,h(x)]",
            "logic1.forall",
            "x",
            "h(x)",
            "h",
            "x",
        ]
    );
}

#[test]
fn attribute_values_are_not_walked() {
    let mut arena = OmArena::new();
    let root = arena.simple_decode("f(x)").unwrap();
    let hidden = arena.integer(99).unwrap();
    arena
        .set_attribute(root, Symbol::new("note", "misc").unwrap(), hidden)
        .unwrap();

    assert_eq!(arena.descendants(root).count(), 3);
    assert!(!arena.has_descendant_satisfying(root, |node| node.id() == hidden));
}

#[test]
fn filters() {
    let mut arena = OmArena::new();
    let root = arena
        .simple_decode("arith1.plus(1,arith1.times(2,x),'s',arith1.minus(3))")
        .unwrap();

    let applications = arena.children_satisfying(root, |node| node.node_type().is_application());
    assert_eq!(compact(&arena, &applications), ["arith1.times(2,x)", "arith1.minus(3)"]);

    let integers = arena.descendants_satisfying(root, |node| node.integer().is_some());
    assert_eq!(compact(&arena, &integers), ["1", "2", "3"]);

    assert!(arena.has_descendant_satisfying(root, |node| node.name() == Some("x")));
    assert!(!arena.has_descendant_satisfying(root, |node| node.name() == Some("y")));
    assert!(arena.has_descendant_satisfying(root, |node| node.id() == root));

    let leaf = applications[0];
    assert!(arena.children_satisfying(integers[0], |_| true).is_empty());
    assert_eq!(arena.children_satisfying(leaf, |_| true).len(), 3);
}

#[test]
fn deeply_nested_applications() {
    let mut arena = OmArena::new();
    let mut text = String::new();
    for _ in 0..500 {
        text.push_str("f(");
    }
    text.push('x');
    for _ in 0..500 {
        text.push(')');
    }
    let root = arena.simple_decode(&text).unwrap();
    assert_eq!(arena.descendants(root).count(), 1001);
    assert_eq!(
        arena
            .descendants_satisfying(root, |node| node.name() == Some("x"))
            .len(),
        1
    );
}
