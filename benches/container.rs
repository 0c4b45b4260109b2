#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use sulfur::{Args, Catalog, Container, Parameter, Registry};

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA;

#[inline]
fn catalog() -> Catalog {
    Catalog::new()
        .class("CAAA", [], |_| Ok(CAAA))
        .class("CAA", [Parameter::new("caaa").typed("CAAA")], |call| Ok(CAA(call.get(0)?)))
        .class("CA", [Parameter::new("caa").typed("CAA")], |call| Ok(CA(call.get(0)?)))
        .class("C", [Parameter::new("ca").typed("CA")], |call| Ok(C(call.get(0)?)))
        .class("B", [Parameter::new("value").with_default(2)], |call| Ok(B(call.cloned(0)?)))
        .class("A", [Parameter::new("b").typed("B"), Parameter::new("c").typed("C")], |call| {
            Ok(A(call.get(0)?, call.get(1)?))
        })
}

#[inline]
fn container_new() -> Container {
    Container::new(Registry::new().share_many(["B", "C"]), catalog())
}

#[inline]
fn container_get(container: &Container) {
    let _ = container.get("A", Args::new()).unwrap();
}

#[inline]
fn container_make(container: &Container) {
    let _ = container.make("A", Args::new()).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let container = container_new();
    container_get(&container);

    c.bench_function("container_new", |b| b.iter(container_new))
        .bench_function("container_get_cold", |b| b.iter(|| container_get(&container_new())))
        .bench_function("container_get", |b| b.iter(|| container_get(&container)))
        .bench_function("container_make", |b| b.iter(|| container_make(&container)))
        .bench_function("container_get_with_literal", |b| {
            b.iter(|| {
                let _ = container.get("B", Args::new().literal("value", 3)).unwrap();
            })
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
