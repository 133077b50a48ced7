mod common;

use common::{complete_source, create_test_backend, display_texts, lsp_labels};

const POINT: &str = "class Point {\n    public int x;\n}\n";

fn with_point(body: &str) -> String {
    format!("{}void main () {{\n    Point p = new Point ();\n{}\n}}\n", POINT, body)
}

#[tokio::test]
async fn test_member_access_in_code_is_offered() {
    let backend = create_test_backend();
    let source = with_point("    p.<|>");
    let candidates = complete_source(&backend, "main.vala", &source).await;
    assert_eq!(display_texts(&candidates), vec!["x"]);
}

#[tokio::test]
async fn test_no_completion_in_line_comment() {
    let backend = create_test_backend();
    let source = with_point("    // see p.<|>");
    let candidates = complete_source(&backend, "main.vala", &source).await;
    assert!(candidates.is_empty(), "{:?}", display_texts(&candidates));
}

#[tokio::test]
async fn test_no_completion_in_string_literal() {
    let backend = create_test_backend();
    let source = with_point("    string s = \"p.<|>");
    let candidates = complete_source(&backend, "main.vala", &source).await;
    assert!(candidates.is_empty(), "{:?}", display_texts(&candidates));
}

#[tokio::test]
async fn test_completion_after_closed_string() {
    let backend = create_test_backend();
    let source = with_point("    string s = \"p.\"; p.<|>");
    let candidates = complete_source(&backend, "main.vala", &source).await;
    assert_eq!(display_texts(&candidates), vec!["x"]);
}

#[tokio::test]
async fn test_lsp_no_completion_in_line_comment() {
    let backend = create_test_backend();
    let source = with_point("    // see p.<|>");
    let labels = lsp_labels(&backend, "file:///comment.vala", &source).await;
    assert!(labels.is_empty(), "{:?}", labels);
}

#[tokio::test]
async fn test_lsp_no_completion_in_block_comment_from_earlier_line() {
    let backend = create_test_backend();
    let source = with_point("    /*\n     * Moves p.<|>");
    let labels = lsp_labels(&backend, "file:///block.vala", &source).await;
    assert!(labels.is_empty(), "{:?}", labels);
}

#[tokio::test]
async fn test_lsp_no_completion_in_doc_comment() {
    let backend = create_test_backend();
    let source = "/**\n * Returns a Po<|>\n */\nclass Point {}\n";
    let labels = lsp_labels(&backend, "file:///doc.vala", source).await;
    assert!(labels.is_empty(), "{:?}", labels);
}

#[tokio::test]
async fn test_lsp_completion_after_closed_block_comment() {
    let backend = create_test_backend();
    let source = with_point("    /* note */ p.<|>");
    let labels = lsp_labels(&backend, "file:///closed.vala", &source).await;
    assert_eq!(labels, vec!["x"]);
}
