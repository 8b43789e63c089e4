use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hymath::{prelude::*, shape};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde_json::Value;

const SIMPLE: &str = "logic1.forall[x,logic1.implies(set1.in(x,setname1.R),\
                      relation1.geq(arith1.times(x,x),0))]";

fn build_complex_shape() -> Value {
    // Medium-sized random tree, seeded for determinism.
    let rng = ChaCha20Rng::seed_from_u64(0x42);

    fn name(rng: &mut impl Rng) -> &'static str {
        ["x", "y", "z", "f", "g"][rng.random_range(0..5)]
    }

    fn next_create(budget: usize, rng: &mut impl Rng) -> Value {
        if budget == 0 || rng.random_bool(0.2) {
            // Select a leaf uniformly
            let leaf = match rng.random_range(0..=4) {
                0 => shape::integer(rng.random_range(-100i64..100)),
                1 => shape::float(f64::from(rng.random_range(-100i32..100)) / 4.0),
                2 => shape::string("leaf"),
                3 => shape::symbol("plus", "arith1", None),
                _ => shape::variable(name(rng)),
            };
            return leaf.unwrap();
        }

        // Otherwise build a nested expression
        let node = match rng.random_range(0..=2) {
            0 => {
                let head = shape::variable(name(rng)).unwrap();
                let mut children = vec![head];
                for _ in 0..rng.random_range(1..=3) {
                    children.push(next_create(budget - 1, rng));
                }
                shape::application(children)
            }
            1 => {
                let head = shape::symbol("forall", "logic1", None).unwrap();
                let var = shape::variable(name(rng)).unwrap();
                shape::binding(head, vec![var], next_create(budget - 1, rng))
            }
            _ => {
                let key = shape::symbol("type", "sts", None).unwrap();
                let value = shape::symbol("R", "setname1", None).unwrap();
                shape::attribution(next_create(budget - 1, rng), vec![(key, value)])
            }
        };
        node.unwrap()
    }

    next_create(10, &mut rng.clone())
}

fn bench_codec(c: &mut Criterion) {
    let mut arena = OmArena::new();
    let simple = arena.simple_decode(SIMPLE).unwrap();
    let complex = arena.decode_value(&build_complex_shape()).unwrap();
    let simple_json = arena.encode(simple).unwrap();
    let complex_json = arena.encode(complex).unwrap();

    c.bench_function("encode_simple", |b| {
        b.iter(|| black_box(arena.encode(simple).unwrap()))
    });
    c.bench_function("encode_complex", |b| {
        b.iter(|| black_box(arena.encode(complex).unwrap()))
    });

    // Decoded trees are discarded right away to keep the arena from growing.
    let mut scratch = OmArena::new();
    c.bench_function("decode_simple", |b| {
        b.iter(|| {
            let id = scratch.decode(black_box(&simple_json)).unwrap();
            scratch.discard(id).unwrap();
        })
    });
    c.bench_function("decode_complex", |b| {
        b.iter(|| {
            let id = scratch.decode(black_box(&complex_json)).unwrap();
            scratch.discard(id).unwrap();
        })
    });
    c.bench_function("simple_decode", |b| {
        b.iter(|| {
            let id = scratch.simple_decode(black_box(SIMPLE)).unwrap();
            scratch.discard(id).unwrap();
        })
    });
}

fn bench_copy_and_compare(c: &mut Criterion) {
    let mut arena = OmArena::new();
    let complex = arena.decode_value(&build_complex_shape()).unwrap();
    let twin = arena.copy(complex).unwrap();

    c.bench_function("equals_complex", |b| {
        b.iter(|| black_box(arena.equals(complex, twin, true)))
    });
    c.bench_function("copy_complex", |b| {
        b.iter(|| {
            let id = arena.copy(complex).unwrap();
            arena.discard(id).unwrap();
        })
    });
}

fn bench_scope(c: &mut Criterion) {
    let mut arena = OmArena::new();
    let complex = arena.decode_value(&build_complex_shape()).unwrap();
    let x = arena.variable("x").unwrap();
    let replacement = arena.simple_decode("h(w)").unwrap();

    c.bench_function("free_variables_complex", |b| {
        b.iter(|| black_box(arena.free_variables(complex)))
    });
    c.bench_function("walk_count_complex", |b| {
        b.iter(|| black_box(arena.descendants(complex).count()))
    });
    c.bench_function("replace_free_complex", |b| {
        b.iter(|| {
            let tree = arena.copy(complex).unwrap();
            let tree = arena.replace_free(tree, x, replacement).unwrap();
            arena.discard(tree).unwrap();
        })
    });
}

criterion_group!(benches, bench_codec, bench_copy_and_compare, bench_scope);
criterion_main!(benches);
