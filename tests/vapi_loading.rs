mod common;

use common::{complete_source, create_dir_with, display_texts};
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::{InitializeParams, InitializedParams};
use valhalla_lsp::vapi::{LoadError, load_declaration_dir};
use valhalla_lsp::{Backend, Config};

const GIO: &str = concat!(
    "[CCode (cprefix = \"G\", lower_case_cprefix = \"g_\")]\n",
    "namespace GLib {\n",
    "    /** A handle to a file. */\n",
    "    public interface File : Object {\n",
    "        public abstract string get_basename ();\n",
    "        public static File new_for_path (string path);\n",
    "    }\n",
    "}\n",
);

const GEE: &str = concat!(
    "namespace Gee {\n",
    "    public class ArrayList<G> : AbstractList<G> {\n",
    "        public ArrayList (owned EqualDataFunc<G>? equal_func = null);\n",
    "        public override bool add (G item);\n",
    "    }\n",
    "}\n",
);

#[test]
fn test_load_directory_sorted_by_file_name() {
    let dir = create_dir_with(&[
        ("gio-2.0.vapi", GIO),
        ("gee-0.8.vapi", GEE),
        ("README", "not a declaration file"),
        ("nested/hidden.vapi", "namespace Hidden {}\n"),
    ]);
    let units = load_declaration_dir(dir.path(), "vapi", usize::MAX).unwrap();
    let ids: Vec<_> = units.iter().map(|u| u.unit.as_str()).collect();
    assert_eq!(ids, vec!["gee-0.8.vapi", "gio-2.0.vapi"]);
    assert!(units.iter().all(|u| u.is_external));
}

#[test]
fn test_oversized_files_are_skipped() {
    let dir = create_dir_with(&[("gio-2.0.vapi", GIO), ("tiny.vapi", "class T {}\n")]);
    let units = load_declaration_dir(dir.path(), "vapi", 64).unwrap();
    let ids: Vec<_> = units.iter().map(|u| u.unit.as_str()).collect();
    assert_eq!(ids, vec!["tiny.vapi"]);
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = create_dir_with(&[("file.vapi", "")]);
    let missing = dir.path().join("nope");
    assert!(matches!(
        load_declaration_dir(&missing, "vapi", usize::MAX),
        Err(LoadError::Missing(_))
    ));
    assert!(matches!(
        load_declaration_dir(&dir.path().join("file.vapi"), "vapi", usize::MAX),
        Err(LoadError::NotADirectory(_))
    ));
}

#[tokio::test]
async fn test_spawned_load_fills_registry() {
    let dir = create_dir_with(&[("gio-2.0.vapi", GIO), ("gee-0.8.vapi", GEE)]);
    let config = Config {
        vapi_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let backend = Backend::new_test_with_config(config);

    let handle = backend.spawn_external_load().expect("load spawned");
    handle.await.unwrap();
    assert_eq!(backend.unit_count(), 2);

    let snapshot = backend.registry_snapshot();
    assert!(snapshot.units().iter().all(|u| u.is_external));
}

#[tokio::test]
async fn test_no_directory_means_no_load() {
    let backend = Backend::new_test();
    assert!(backend.spawn_external_load().is_none());
    // Readiness is signalled immediately.
    backend.wait_for_external_declarations().await;
}

#[tokio::test]
async fn test_completion_waits_for_external_declarations() {
    let dir = create_dir_with(&[("gio-2.0.vapi", GIO)]);
    let config = Config {
        vapi_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let backend = Backend::new_test_with_config(config);
    let _handle = backend.spawn_external_load();

    let source = concat!(
        "void main () {\n",
        "    File f = File.new_for_path (\"a\");\n",
        "    f.<|>\n",
        "}\n",
    );
    let candidates = complete_source(&backend, "main.vala", source).await;
    assert_eq!(display_texts(&candidates), vec!["get_basename", "new_for_path"]);
}

#[tokio::test]
async fn test_static_members_of_external_interface() {
    let dir = create_dir_with(&[("gio-2.0.vapi", GIO)]);
    let config = Config {
        vapi_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let backend = Backend::new_test_with_config(config);
    backend.initialize(InitializeParams::default()).await.unwrap();
    backend.initialized(InitializedParams {}).await;

    let source = "void main () {\n    File.n<|>\n}\n";
    let candidates = complete_source(&backend, "main.vala", source).await;
    assert_eq!(display_texts(&candidates), vec!["new_for_path"]);
    let doc = backend
        .registry_snapshot()
        .units()
        .iter()
        .flat_map(|u| u.iter().filter_map(|s| s.documentation().short.clone()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(doc, vec!["A handle to a file.".to_string()]);
}
