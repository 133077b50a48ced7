mod common;

use common::{complete_source, create_test_backend, lsp_labels};
use valhalla_lsp::{CandidateKind, Insertion, SuggestionCandidate};

fn constructors(candidates: &[SuggestionCandidate]) -> Vec<&SuggestionCandidate> {
    candidates
        .iter()
        .filter(|c| c.kind == CandidateKind::Constructor)
        .collect()
}

#[tokio::test]
async fn test_constructor_snippet_after_new() {
    let backend = create_test_backend();
    let source = concat!(
        "class Foo {\n",
        "    public Foo (int a) {}\n",
        "}\n",
        "void main () {\n",
        "    Foo f = new <|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    let ctors = constructors(&candidates);
    assert_eq!(ctors.len(), 1);
    assert_eq!(ctors[0].display_text, "Foo");
    assert_eq!(
        ctors[0].insert,
        Insertion::Snippet("Foo (${1:a});$0".to_string())
    );
    assert_eq!(ctors[0].left_label.as_deref(), Some("Foo"));
    assert_eq!(
        ctors[0].description.as_deref(),
        Some("Creates a new instance of Foo.")
    );
}

#[tokio::test]
async fn test_named_constructors_and_subclasses() {
    let backend = create_test_backend();
    let source = concat!(
        "class Shape {\n",
        "    public Shape () {}\n",
        "}\n",
        "class Circle : Shape {\n",
        "    /** A circle of the given radius. */\n",
        "    public Circle.with_radius (double r) {}\n",
        "}\n",
        "class Unrelated {\n",
        "    public Unrelated () {}\n",
        "}\n",
        "void main () {\n",
        "    Shape s = new <|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    let names: Vec<_> = constructors(&candidates)
        .iter()
        .map(|c| c.display_text.as_str())
        .collect();
    assert_eq!(names, vec!["Shape", "Circle.with_radius"]);

    let named = constructors(&candidates)[1];
    assert_eq!(
        named.insert,
        Insertion::Snippet("Circle.with_radius (${1:r});$0".to_string())
    );
    assert_eq!(named.left_label.as_deref(), Some("Circle"));
    assert_eq!(
        named.description.as_deref(),
        Some("A circle of the given radius.")
    );
}

#[tokio::test]
async fn test_constructor_prefix_filter() {
    let backend = create_test_backend();
    let source = concat!(
        "class Foo {\n",
        "    public Foo () {}\n",
        "}\n",
        "class Bar : Foo {\n",
        "    public Bar () {}\n",
        "}\n",
        "void main () {\n",
        "    Foo f = new B<|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    let names: Vec<_> = constructors(&candidates)
        .iter()
        .map(|c| c.display_text.as_str())
        .collect();
    assert_eq!(names, vec!["Bar"]);
}

#[tokio::test]
async fn test_generic_declared_type() {
    let backend = create_test_backend();
    let source = concat!(
        "class Box<T> {\n",
        "    public Box (T item) {}\n",
        "}\n",
        "void main () {\n",
        "    Box<string> b = new B<|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    let ctors = constructors(&candidates);
    assert_eq!(ctors.len(), 1);
    assert_eq!(
        ctors[0].insert,
        Insertion::Snippet("Box (${1:item});$0".to_string())
    );
}

#[tokio::test]
async fn test_var_declaration_offers_no_constructors() {
    let backend = create_test_backend();
    let source = concat!(
        "class Foo {\n",
        "    public Foo () {}\n",
        "}\n",
        "void main () {\n",
        "    var f = new <|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    assert!(constructors(&candidates).is_empty());
}

#[tokio::test]
async fn test_struct_literal_on_assignment() {
    let backend = create_test_backend();
    let source = concat!(
        "struct Vec2 {\n",
        "    public double x;\n",
        "    public double y;\n",
        "}\n",
        "void main () {\n",
        "    Vec2 v = <|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    let literal = candidates
        .iter()
        .find(|c| c.kind == CandidateKind::Struct && c.insert.is_snippet())
        .expect("struct literal");
    assert_eq!(literal.insert, Insertion::Snippet("Vec2 ($1);".to_string()));
    assert_eq!(literal.display_text, "Vec2");
}

#[tokio::test]
async fn test_struct_literal_ignores_typed_value() {
    let backend = create_test_backend();
    let source = concat!(
        "struct Value {\n",
        "    public int raw;\n",
        "}\n",
        "void main () {\n",
        "    Value v = x<|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    let literal = candidates
        .iter()
        .find(|c| c.kind == CandidateKind::Struct && c.insert.is_snippet())
        .expect("struct literal");
    assert_eq!(literal.insert, Insertion::Snippet("Value ($1);".to_string()));
}

#[tokio::test]
async fn test_constructor_through_lsp() {
    let backend = create_test_backend();
    let source = concat!(
        "class Foo {\n",
        "    public Foo (int a) {}\n",
        "}\n",
        "void main () {\n",
        "    Foo f = new <|>\n",
        "}\n",
    );
    let labels = lsp_labels(&backend, "file:///ctor.vala", source).await;
    assert!(labels.contains(&"Foo".to_string()), "labels: {:?}", labels);
}
