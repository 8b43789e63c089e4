use hymath::prelude::*;
use termcolor::{Ansi, NoColor};

fn xml(text: &str) -> String {
    let mut arena = OmArena::new();
    let id = arena.simple_decode(text).unwrap();
    arena.xml_string(id).unwrap()
}

fn eval(text: &str) -> Evaluation {
    let mut arena = OmArena::new();
    let id = arena.simple_decode(text).unwrap();
    arena.evaluate(id)
}

fn number(text: &str) -> f64 {
    match eval(text).value {
        Some(EvalValue::Number(n)) => n,
        other => panic!("{text} gave {other:?}"),
    }
}

#[test]
fn xml_atoms() {
    assert_eq!(xml("42"), "<OMI>42</OMI>");
    assert_eq!(xml("2.5"), "<OMF dec=\"2.5\"/>");
    assert_eq!(xml("'a&b'"), "<OMSTR>a&amp;b</OMSTR>");
    assert_eq!(xml("x"), "<OMV name=\"x\"/>");
    assert_eq!(xml("nums1.pi"), "<OMS cd=\"nums1\" name=\"pi\"/>");
}

#[test]
fn xml_nesting() {
    assert_eq!(
        xml("logic1.forall[x,y,f(x)]"),
        "<OMBIND>\n  <OMS cd=\"logic1\" name=\"forall\"/>\n  \
         <OMBVAR><OMV name=\"x\"/><OMV name=\"y\"/></OMBVAR>\n  \
         <OMA>\n    <OMV name=\"f\"/>\n    <OMV name=\"x\"/>\n  </OMA>\n</OMBIND>"
    );
}

#[test]
fn xml_errors_and_refusals() {
    let mut arena = OmArena::new();
    let head = arena.symbol("oops", "error", None).unwrap();
    let one = arena.integer(1).unwrap();
    let e = arena.error(head, &[one]).unwrap();
    assert_eq!(
        arena.xml_string(e).unwrap(),
        "<OME>\n  <OMS cd=\"error\" name=\"oops\"/>\n  <OMI>1</OMI>\n</OME>"
    );

    let bytes = arena.bytearray(&[1]).unwrap();
    let app = arena.application(&[head, bytes]).unwrap();
    let err = arena.xml_string(app).unwrap_err();
    assert!(err.is_operation_refused());
    assert_eq!(err.reason(), "Cannot convert this to XML: 'byte array'");
}

#[test]
fn xml_render_targets() {
    let mut arena = OmArena::new();
    let id = arena.simple_decode("f(x)").unwrap();

    let mut plain = NoColor::new(Vec::new());
    arena.xml_render_to(id, 80, &mut plain).unwrap();
    assert_eq!(
        String::from_utf8(plain.into_inner()).unwrap(),
        arena.xml_string(id).unwrap()
    );

    let mut colored = Ansi::new(Vec::new());
    arena.xml_render_to(id, 80, &mut colored).unwrap();
    let colored = String::from_utf8(colored.into_inner()).unwrap();
    assert!(colored.contains("\x1b["));
    assert!(colored.contains("OMA"));
}

#[test]
fn arithmetic() {
    assert_eq!(number("arith1.plus(1,2)"), 3.0);
    assert_eq!(number("arith1.minus(1,2.5)"), -1.5);
    assert_eq!(number("arith1.times(arith1.plus(1,2),4)"), 12.0);
    assert_eq!(number("arith1.divide(1,4)"), 0.25);
    assert_eq!(number("arith1.power(2,10)"), 1024.0);
    assert!((number("arith1.root(2,9)") - 3.0).abs() < 1e-12);
    assert_eq!(number("arith1.abs(-3)"), 3.0);
    assert_eq!(number("arith1.unary_minus(3)"), -3.0);
    assert_eq!(number("integer1.factorial(5)"), 120.0);
    assert_eq!(number("arith1.divide(1,0)"), f64::INFINITY);
    assert!((number("transc1.log(10,1000)") - 3.0).abs() < 1e-12);
    assert!((number("transc1.sin(0)")).abs() < 1e-12);
    assert_eq!(number("arith1.times(50,units.percent)"), 0.5);
}

#[test]
fn relations_and_logic() {
    assert_eq!(eval("relation1.lt(1,2)").value, Some(EvalValue::Bool(true)));
    assert_eq!(eval("relation1.ge(1,2)").value, Some(EvalValue::Bool(false)));
    assert_eq!(eval("relation1.eq(2,2.0)").value, Some(EvalValue::Bool(true)));
    assert_eq!(eval("relation1.neq('a','b')").value, Some(EvalValue::Bool(true)));
    assert_eq!(
        eval("logic1.not(relation1.eq(1,2))").value,
        Some(EvalValue::Bool(true))
    );
}

#[test]
fn notes_accumulate() {
    let result = eval("relation1.approx(3.14159,3.14)");
    assert_eq!(result.value, Some(EvalValue::Bool(true)));
    assert_eq!(
        result.message.as_deref(),
        Some("Values were rounded to two decimal places for approximate comparison.")
    );

    let result = eval("arith1.times(units.degrees,arith1.times(units.dollars,180))");
    match result.value {
        Some(EvalValue::Number(n)) => assert!((n - std::f64::consts::PI).abs() < 1e-12),
        other => panic!("{other:?}"),
    }
    assert_eq!(
        result.message.as_deref(),
        Some("Converting to degrees used an approximation of \u{03c0}.\nDollar units were dropped")
    );

    let mut arena = OmArena::new();
    let pi = arena.variable("\u{03c0}").unwrap();
    let result = arena.evaluate(pi);
    assert_eq!(result.value, Some(EvalValue::Number(std::f64::consts::PI)));
    assert_eq!(
        result.message.as_deref(),
        Some("The actual value of \u{03c0} has been rounded.")
    );
}

#[test]
fn unknown_expressions() {
    for text in ["f(x)", "y", "arith1.plus(1,y)", "arith1.plus(1)", "logic1.forall[x,x]"] {
        let result = eval(text);
        assert_eq!(result.value, None, "{text}");
        assert_eq!(
            result.message.as_deref(),
            Some(format!("Could not evaluate {text}").as_str())
        );
    }
    assert_eq!(eval("'abc'").value, Some(EvalValue::Text("abc".into())));
}
