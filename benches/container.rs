use beanwire::{BeanDefinition, Container, Scope, TypeRegistry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

#[derive(Default)]
struct Computer;

#[derive(Default)]
struct Developer {
    age: u32,
    name: String,
    computer: Option<Arc<Computer>>,
}

#[derive(Default)]
struct Node {
    deps: Vec<Arc<Node>>,
}

fn types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register::<Computer>("Computer").default_constructor(Computer::default);
    types
        .register::<Developer>("Developer")
        .default_constructor(Developer::default)
        .property("age", |d: &mut Developer, age: u32| d.age = age)
        .property("name", |d: &mut Developer, name: String| d.name = name)
        .property("computer", |d: &mut Developer, c: Arc<Computer>| d.computer = Some(c));
    types
        .register::<Node>("Node")
        .default_constructor(Node::default)
        .property("dep", |n: &mut Node, dep: Arc<Node>| n.deps.push(dep));
    types
}

fn developer_defs(scope: Scope) -> Vec<BeanDefinition> {
    vec![
        BeanDefinition::new("computer", "Computer"),
        BeanDefinition::new("developer", "Developer")
            .scope(scope)
            .property("age", 25)
            .property("name", "John Doe")
            .property_ref("computer", "computer"),
    ]
}

/// A chain `n0 <- n1 <- ... <- n{len-1}`, declared dependent-first.
fn chain(len: usize) -> Vec<BeanDefinition> {
    (0..len)
        .rev()
        .map(|i| {
            let def = BeanDefinition::new(format!("n{i}"), "Node");
            if i == 0 {
                def
            } else {
                def.property_ref("dep", format!("n{}", i - 1))
            }
        })
        .collect()
}

// ===== Lookups =====

fn bench_singleton_hit(c: &mut Criterion) {
    let container = Container::load(types(), developer_defs(Scope::Singleton)).unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| black_box(container.get_bean(black_box("developer")).unwrap()))
    });

    c.bench_function("singleton_hit_typed", |b| {
        b.iter(|| black_box(container.get::<Developer>(black_box("developer")).unwrap()))
    });
}

fn bench_prototype(c: &mut Criterion) {
    let container = Container::load(types(), developer_defs(Scope::Prototype)).unwrap();

    c.bench_function("prototype_with_properties", |b| {
        b.iter(|| black_box(container.get::<Developer>("developer").unwrap()))
    });
}

// ===== Load =====

fn bench_load_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_chain");

    for len in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter_batched(
                || (types(), chain(len)),
                |(types, defs)| black_box(Container::load(types, defs).unwrap()),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_singleton_hit, bench_prototype, bench_load_chain);
criterion_main!(benches);
