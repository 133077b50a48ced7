mod common;

use common::create_test_backend;
use valhalla_lsp::inheritance::{base_types, inherited_members};
use valhalla_lsp::resolution::{TypeRef, find_type, resolve_type};
use valhalla_lsp::{ResolvedType, ScopeKind};

fn usings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_out_of_scope_type_is_found_by_exhaustive_pass() {
    let backend = create_test_backend();
    backend.update_unit("baz.vala", "namespace Foo.Bar {\n    class Baz {}\n}\n");
    let snapshot = backend.registry_snapshot();

    let found = find_type(&snapshot, "Baz", &usings(&["GLib"])).expect("Baz");
    assert_eq!(found.name(), Some("Baz"));
    assert_eq!(
        found.parent().and_then(|p| p.qualified_name()).as_deref(),
        Some("Foo.Bar")
    );
}

#[test]
fn test_imported_namespace_wins_over_earlier_unit() {
    let backend = create_test_backend();
    backend.update_unit(
        "a.vala",
        "namespace Alpha {\n    class Widget { public int alpha; }\n}\n",
    );
    backend.update_unit(
        "b.vala",
        "namespace Beta {\n    class Widget { public int beta; }\n}\n",
    );
    let snapshot = backend.registry_snapshot();

    let with_beta = find_type(&snapshot, "Widget", &usings(&["Beta"])).expect("Widget");
    assert!(with_beta.children().any(|c| c.name() == Some("beta")));

    // Neither namespace imported: the first unit in registry order wins.
    let without = find_type(&snapshot, "Widget", &[]).expect("Widget");
    assert!(without.children().any(|c| c.name() == Some("alpha")));
}

#[test]
fn test_qualified_name_selects_namespace() {
    let backend = create_test_backend();
    backend.update_unit(
        "a.vala",
        concat!(
            "namespace Alpha {\n    class Widget { public int alpha; }\n}\n",
            "namespace Beta {\n    class Widget { public int beta; }\n}\n",
        ),
    );
    let snapshot = backend.registry_snapshot();
    let found = find_type(&snapshot, "unowned Beta.Widget?", &[]).expect("Widget");
    assert!(found.children().any(|c| c.name() == Some("beta")));
}

#[test]
fn test_member_path_resolution() {
    let backend = create_test_backend();
    backend.update_unit(
        "shapes.vala",
        concat!(
            "class Point {\n",
            "    public int x;\n",
            "    public Point copy () { return this; }\n",
            "}\n",
            "class Line {\n",
            "    public Point start;\n",
            "    public Point get_end (int index) { return start; }\n",
            "}\n",
        ),
    );
    let snapshot = backend.registry_snapshot();

    let resolved = resolve_type(&snapshot, TypeRef::Name("Line"), "start", &[]);
    assert_eq!(resolved.scope().and_then(|s| s.name()), Some("Point"));

    let resolved = resolve_type(&snapshot, TypeRef::Name("Line"), "get_end (1).copy ()", &[]);
    assert_eq!(resolved.scope().and_then(|s| s.name()), Some("Point"));

    let members: Vec<_> = resolved
        .scope()
        .into_iter()
        .flat_map(|scope| scope.children())
        .filter_map(|m| m.name())
        .collect();
    assert_eq!(members, vec!["x", "copy"]);
}

#[test]
fn test_unresolvable_paths_give_void() {
    let backend = create_test_backend();
    backend.update_unit("p.vala", "class Point {\n    public int x;\n}\n");
    let snapshot = backend.registry_snapshot();

    assert!(resolve_type(&snapshot, TypeRef::Name("Missing"), "", &[]).is_void());
    assert!(resolve_type(&snapshot, TypeRef::Name("Point"), "missing", &[]).is_void());
    // `int` has no declaration.
    assert!(resolve_type(&snapshot, TypeRef::Name("Point"), "x", &[]).is_void());
    assert!(ResolvedType::Void.scope().is_none());
}

#[test]
fn test_resolution_from_a_scope() {
    let backend = create_test_backend();
    backend.update_unit(
        "p.vala",
        "class Inner { public int v; }\nclass Outer {\n    public Inner inner;\n}\n",
    );
    let snapshot = backend.registry_snapshot();
    let outer = find_type(&snapshot, "Outer", &[]).expect("Outer");
    let resolved = resolve_type(&snapshot, TypeRef::Scope(outer), "inner", &[]);
    assert_eq!(resolved.scope().and_then(|s| s.name()), Some("Inner"));
}

#[test]
fn test_inherited_members_skip_private_and_overridden() {
    let backend = create_test_backend();
    backend.update_unit(
        "animals.vala",
        concat!(
            "class Animal {\n",
            "    public string name;\n",
            "    private int secret;\n",
            "    public virtual void speak () {}\n",
            "}\n",
            "class Dog : Animal {\n",
            "    public override void speak () {}\n",
            "    public void fetch () {}\n",
            "}\n",
        ),
    );
    let snapshot = backend.registry_snapshot();
    let dog = find_type(&snapshot, "Dog", &[]).expect("Dog");

    let bases: Vec<_> = base_types(&snapshot, dog, &[])
        .into_iter()
        .filter_map(|b| b.name())
        .collect();
    assert_eq!(bases, vec!["Animal"]);

    let inherited: Vec<_> = inherited_members(&snapshot, dog, &[])
        .into_iter()
        .filter_map(|m| m.name())
        .collect();
    assert_eq!(inherited, vec!["name"]);

    let resolved = resolve_type(&snapshot, TypeRef::Scope(dog), "name", &[]);
    assert!(resolved.is_void(), "string has no declaration");
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let backend = create_test_backend();
    backend.update_unit(
        "cycle.vala",
        "class A : B { public int a; }\nclass B : A { public int b; }\n",
    );
    let snapshot = backend.registry_snapshot();
    let a = find_type(&snapshot, "A", &[]).expect("A");
    let inherited: Vec<_> = inherited_members(&snapshot, a, &[])
        .into_iter()
        .filter_map(|m| m.name())
        .collect();
    assert_eq!(inherited, vec!["b"]);
    assert!(
        a.children()
            .all(|c| c.kind() == ScopeKind::Property)
    );
}
