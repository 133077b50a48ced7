/// Completion-related modules.
///
/// This sub-module groups all completion logic:
/// - **context**: Reading the line before the cursor into request flags
/// - **engine**: The scope traversal and candidate ordering
/// - **builder**: Building candidates from scopes and LSP items from
///   candidates
/// - **handler**: The async `complete` entry point and the LSP adapter
///
/// and one module per suggestion predicate (type names, namespaces,
/// locals, members, enums, keywords).
pub mod builder;
pub mod class_completion;
pub mod context;
pub mod engine;
pub mod enum_completion;
pub(crate) mod handler;
pub mod keyword_completion;
pub mod member_completion;
pub mod namespace_completion;
pub mod variable_completion;

pub use context::CompletionContext;
pub use engine::collect_candidates;
