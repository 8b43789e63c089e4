use hymath::prelude::*;

fn main() {
    let mut arena = OmArena::new();

    // forall x. x * x >= y
    let expr = arena
        .simple_decode("logic1.forall[x,relation1.geq(arith1.times(x,x),y)]")
        .unwrap();
    println!("compact: {}", arena.simple_encode(expr));
    println!("json:    {}", arena.encode(expr).unwrap());
    println!("free:    {:?}", arena.free_variables(expr));

    // Substituting x for y would be captured by the binder, so nothing changes.
    let y = arena.variable("y").unwrap();
    let x = arena.variable("x").unwrap();
    let zero = arena.integer(0).unwrap();
    arena.replace_free(expr, y, x).unwrap();
    arena.replace_free(expr, y, zero).unwrap();
    println!("after:   {}", arena.simple_encode(expr));

    // Annotate the bound variable with its type.
    let bound = arena.index(expr, &[Location::Variable(0)]).unwrap();
    let real = arena.symbol("R", "setname1", None).unwrap();
    arena
        .set_attribute(bound, Symbol::new("type", "sts").unwrap(), real)
        .unwrap();
    println!("json:    {}", arena.encode(expr).unwrap());

    arena.xml_print(expr).unwrap();
}
