//! Error types for the markdown pipeline.

/// Result type for rendering operations.
pub type MarkdownResult<T> = Result<T, MarkdownError>;

/// Errors that can occur while rendering markdown.
///
/// Only rendering can fail. Heading extraction, table of contents and plain
/// text derivation treat anything they cannot read as empty text instead.
#[derive(Debug, thiserror::Error)]
pub enum MarkdownError {
  /// The engine gave up on the input. Comrak accepts any UTF-8 text, so this
  /// only surfaces when the engine itself fails mid-document.
  #[error("Malformed markdown input: {0}")]
  MalformedInput(String),

  /// Writing the HTML output failed.
  #[error("Rendering failed: {0}")]
  Render(#[from] std::fmt::Error),
}
