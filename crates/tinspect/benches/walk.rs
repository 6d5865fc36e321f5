use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tinspect::{
    ClassDecl, ClassId, ClassRegistry, DecoratorEntry, MethodDecl, ReflectConfig, Reflector,
    TypeRef,
};

/// A chain of `depth` classes, each re-parameterizing its parent's template
fn generic_chain(depth: usize) -> (ClassRegistry, ClassId) {
    let registry = ClassRegistry::new();
    let root = registry
        .declare(
            ClassDecl::new("Level0")
                .property("value", None)
                .method(MethodDecl::new("get")),
        )
        .unwrap();
    registry.decorate_class(root, DecoratorEntry::generic_template(["T0"]));
    registry.decorate_property(
        root,
        "value",
        DecoratorEntry::type_override(TypeRef::template("T0")),
    );
    registry.decorate_method(root, "get", DecoratorEntry::type_override(TypeRef::template("T0")));

    let mut current = root;
    for level in 1..depth {
        let name = format!("Level{}", level);
        let ty = registry
            .declare(
                ClassDecl::new(name.clone())
                    .extends(current)
                    .property(format!("field{}", level), TypeRef::STRING)
                    .method(MethodDecl::new(format!("run{}", level)).param("x", TypeRef::NUMBER)),
            )
            .unwrap();
        let template = format!("T{}", level);
        let argument = if level + 1 == depth {
            TypeRef::NUMBER
        } else {
            TypeRef::template(template.clone())
        };
        registry.decorate_class(ty, DecoratorEntry::generic_template([template]));
        registry.decorate_class(ty, DecoratorEntry::generic_type(vec![argument]));
        current = ty;
    }
    (registry, current)
}

fn bench_walk_uncached(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_generic_chain");

    for depth in [2usize, 8, 32] {
        let (registry, leaf) = generic_chain(depth);
        let reflector =
            Reflector::with_config(registry, ReflectConfig::default().with_cache(false));
        group.bench_with_input(BenchmarkId::new("depth", depth), &leaf, |b, leaf| {
            b.iter(|| reflector.reflect(black_box(*leaf)).unwrap());
        });
    }

    group.finish();
}

fn bench_walk_cached(c: &mut Criterion) {
    let (registry, leaf) = generic_chain(8);
    let reflector = Reflector::new(registry);
    reflector.reflect(leaf).unwrap();

    c.bench_function("walk_cached_hit", |b| {
        b.iter(|| reflector.reflect(black_box(leaf)).unwrap());
    });
}

criterion_group!(benches, bench_walk_uncached, bench_walk_cached);
criterion_main!(benches);
