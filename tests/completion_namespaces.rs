mod common;

use common::{complete_source, create_test_backend, display_texts};
use valhalla_lsp::{CandidateKind, Insertion};

fn load_namespaces(backend: &valhalla_lsp::Backend) {
    backend.update_external_unit(
        "gee-0.8.vapi",
        concat!(
            "namespace Gee {\n",
            "    public class ArrayList<G> {\n",
            "    }\n",
            "    namespace Functions {\n",
            "    }\n",
            "}\n",
        ),
    );
    backend.update_external_unit(
        "glib-2.0.vapi",
        "namespace GLib {\n    namespace Math {\n    }\n}\n",
    );
}

#[tokio::test]
async fn test_using_offers_matching_namespaces() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    let candidates = complete_source(&backend, "main.vala", "using G<|>\n").await;
    assert_eq!(
        display_texts(&candidates),
        vec!["Gee", "Gee.Functions", "GLib", "GLib.Math"]
    );
    let gee = &candidates[0];
    assert_eq!(gee.kind, CandidateKind::Import);
    assert_eq!(gee.insert, Insertion::Text("Gee;".to_string()));
    assert_eq!(gee.description.as_deref(), Some("The Gee namespace."));
}

#[tokio::test]
async fn test_using_matches_anywhere_in_name() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    let candidates = complete_source(&backend, "main.vala", "using Math<|>\n").await;
    assert_eq!(display_texts(&candidates), vec!["GLib.Math"]);
    assert_eq!(candidates[0].insert, Insertion::Text("GLib.Math;".to_string()));
}

#[tokio::test]
async fn test_dotted_using_inserts_only_the_tail() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    let candidates = complete_source(&backend, "main.vala", "using Gee.F<|>\n").await;
    assert_eq!(display_texts(&candidates), vec!["Gee.Functions"]);
    assert_eq!(candidates[0].insert, Insertion::Text("Functions;".to_string()));
}

#[tokio::test]
async fn test_second_name_in_using_list() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    let candidates = complete_source(&backend, "main.vala", "using GLib, Ge<|>\n").await;
    assert_eq!(display_texts(&candidates), vec!["Gee", "Gee.Functions"]);
}

#[tokio::test]
async fn test_namespace_declared_in_several_units_is_offered_once() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    backend.update_unit("extra.vala", "namespace Gee {\n    class Extra {}\n}\n");
    let candidates = complete_source(&backend, "main.vala", "using Gee<|>\n").await;
    let gee_count = display_texts(&candidates)
        .iter()
        .filter(|name| **name == "Gee")
        .count();
    assert_eq!(gee_count, 1);
}

#[tokio::test]
async fn test_no_namespaces_outside_using() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    let source = "void main () {\n    G<|>\n}\n";
    let candidates = complete_source(&backend, "main.vala", source).await;
    assert!(
        candidates
            .iter()
            .all(|c| c.kind != CandidateKind::Import)
    );
}

#[tokio::test]
async fn test_using_line_offers_nothing_else() {
    let backend = create_test_backend();
    load_namespaces(&backend);
    backend.update_unit("lib.vala", "void global_helper () {}\nenum Gender { A }\n");
    let candidates = complete_source(&backend, "main.vala", "using G<|>\n").await;
    assert!(
        candidates
            .iter()
            .all(|c| c.kind == CandidateKind::Import),
        "{:?}",
        display_texts(&candidates)
    );
}
