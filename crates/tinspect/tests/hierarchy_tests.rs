//! Inheritance merge tests
//!
//! - a class without ancestors reflects exactly as its purified level
//! - descendant members shadow ancestor members exactly once
//! - inherited members and annotations pass through unchanged

mod common;

use common::{init_tracing, method_names, property_names, reflect};
use serde_json::json;
use tinspect::visitor::PURIFY;
use tinspect::walker::{self, ParentContext};
use tinspect::{
    visitor, ClassDecl, ClassReflection, ClassRegistry, DecoratorEntry, MethodDecl, Result,
    TypeClassification, TypeRef,
};

fn keep_level(current: ClassReflection, _ctx: &ParentContext<'_>) -> Result<ClassReflection> {
    Ok(current)
}

// ===== Single Level =====

#[test]
fn test_root_class_equals_purified_level() {
    init_tracing();
    let registry = ClassRegistry::new();
    let ty = registry
        .declare(
            ClassDecl::new("User")
                .constructor_param("id", TypeRef::NUMBER)
                .property("name", TypeRef::STRING)
                .method(
                    MethodDecl::new("save")
                        .returns(TypeRef::BOOLEAN)
                        .param("force", TypeRef::BOOLEAN),
                ),
        )
        .unwrap();
    registry.decorate_class(ty, DecoratorEntry::custom("entity", json!("users")));
    registry.decorate_property(ty, "name", DecoratorEntry::custom("length", json!(32)));

    let ctx = ParentContext {
        host: &registry,
        target: ty,
        class_path: &[],
        member_visitors: &PURIFY,
        parent_visitor: visitor::apply_to,
    };
    let level = walker::walk_class(ty, &ctx).unwrap();
    let merged = walker::walk_parents(ty, &ctx).unwrap();

    assert_eq!(format!("{:?}", level), format!("{:?}", merged));
}

#[test]
fn test_root_class_shape() {
    let registry = ClassRegistry::new();
    let ty = registry
        .declare(
            ClassDecl::new("User")
                .property("name", TypeRef::STRING)
                .method(MethodDecl::new("friends").returns(TypeRef::array(TypeRef::STRING))),
        )
        .unwrap();
    let class = reflect(registry, ty);

    assert_eq!(class.name, "User");
    assert_eq!(class.type_classification, Some(TypeClassification::Class));
    assert_eq!(class.properties[0].ty, Some(TypeRef::STRING));
    assert_eq!(
        class.properties[0].type_classification,
        Some(TypeClassification::Primitive)
    );
    assert_eq!(
        class.methods[0].type_classification,
        Some(TypeClassification::Array)
    );
}

// ===== Shadowing =====

#[test]
fn test_inherited_method_appears_once() {
    let registry = ClassRegistry::new();
    let base = registry
        .declare(ClassDecl::new("Base").method(MethodDecl::new("foo")))
        .unwrap();
    let child = registry.declare(ClassDecl::new("Child").extends(base)).unwrap();

    let class = reflect(registry, child);
    assert_eq!(method_names(&class), vec!["foo"]);
    assert_eq!(class.super_type, base);
}

#[test]
fn test_descendant_members_shadow_at_every_depth() {
    let registry = ClassRegistry::new();
    let a = registry
        .declare(
            ClassDecl::new("A")
                .property("id", TypeRef::NUMBER)
                .property("label", TypeRef::STRING)
                .method(MethodDecl::new("run"))
                .method(MethodDecl::new("stop")),
        )
        .unwrap();
    let b = registry
        .declare(
            ClassDecl::new("B")
                .extends(a)
                .property("label", TypeRef::DATE)
                .method(MethodDecl::new("run")),
        )
        .unwrap();
    let c = registry
        .declare(
            ClassDecl::new("C")
                .extends(b)
                .method(MethodDecl::new("run").returns(TypeRef::STRING))
                .method(MethodDecl::new("pause")),
        )
        .unwrap();

    let class = reflect(registry, c);
    assert_eq!(method_names(&class), vec!["run", "pause", "stop"]);
    assert_eq!(property_names(&class), vec!["label", "id"]);
    assert_eq!(class.method("run").unwrap().return_type, Some(TypeRef::STRING));
    assert_eq!(class.property("label").unwrap().ty, Some(TypeRef::DATE));
}

#[test]
fn test_overriding_member_inherits_annotations() {
    let registry = ClassRegistry::new();
    let base = registry
        .declare(ClassDecl::new("Base").method(MethodDecl::new("save")))
        .unwrap();
    registry.decorate_method(base, "save", DecoratorEntry::custom("route", json!("/base")));
    registry.decorate_method(
        base,
        "save",
        DecoratorEntry::custom("internal", json!(true)).inherit(false),
    );
    let child = registry
        .declare(ClassDecl::new("Child").extends(base).method(MethodDecl::new("save")))
        .unwrap();
    registry.decorate_method(child, "save", DecoratorEntry::custom("auth", json!("admin")));

    let class = reflect(registry, child);
    let keys: Vec<_> = class.methods[0]
        .decorators
        .iter()
        .map(|d| d.key.as_str())
        .collect();
    assert_eq!(keys, vec!["auth", "route"]);
}

#[test]
fn test_class_annotations_inherited_by_option() {
    let registry = ClassRegistry::new();
    let base = registry.declare(ClassDecl::new("Base")).unwrap();
    registry.decorate_class(
        base,
        DecoratorEntry::custom("table", json!("base")).allow_multiple(false),
    );
    registry.decorate_class(base, DecoratorEntry::custom("audit", json!(true)));
    let child = registry.declare(ClassDecl::new("Child").extends(base)).unwrap();
    registry.decorate_class(
        child,
        DecoratorEntry::custom("table", json!("child")).allow_multiple(false),
    );

    let class = reflect(registry, child);
    let values: Vec<_> = class
        .decorators
        .iter()
        .map(|d| (d.key.as_str(), d.custom_value().cloned()))
        .collect();
    assert_eq!(
        values,
        vec![("table", Some(json!("child"))), ("audit", Some(json!(true)))]
    );
}

#[test]
fn test_custom_parent_visitor_replaces_redistribution() {
    let registry = ClassRegistry::new();
    let ty = registry
        .declare(ClassDecl::new("A").property("bar", TypeRef::STRING))
        .unwrap();
    registry.decorate_class(ty, DecoratorEntry::custom("value", json!("x")).apply_to(["bar"]));

    let ctx = ParentContext {
        host: &registry,
        target: ty,
        class_path: &[],
        member_visitors: &PURIFY,
        parent_visitor: keep_level,
    };
    let class = walker::walk_parents(ty, &ctx).unwrap();
    assert_eq!(class.decorators.len(), 1);
    assert!(class.properties[0].decorators.is_empty());
}
