//! Entry points with error recovery.
use std::{
  any::Any,
  panic::{AssertUnwindSafe, catch_unwind},
};

use log::error;

use super::types::{MarkdownProcessor, ParseOptions};
use crate::error::{MarkdownError, MarkdownResult};

/// Run one engine stage, turning a panic inside comrak into
/// [`MarkdownError::MalformedInput`].
///
/// # Arguments
///
/// * `stage` - What is being done, for the log line
/// * `run` - The stage itself
pub(crate) fn guard_engine<T, F>(stage: &str, run: F) -> MarkdownResult<T>
where
  F: FnOnce() -> MarkdownResult<T>,
{
  catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
    let message = panic_message(payload.as_ref());
    error!("Panic during markdown {stage}: {message}");
    Err(MarkdownError::MalformedInput(message))
  })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  payload
    .downcast_ref::<&str>()
    .map(ToString::to_string)
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "engine failed without a message".to_string())
}

/// Best-effort HTML shown in place of a document that failed to render.
#[must_use]
pub fn error_page(err: &MarkdownError) -> String {
  format!(
    "<p>An error occurred:</p>\n<pre>{}</pre>\n",
    html_escape::encode_text(&err.to_string())
  )
}

/// Render markdown to HTML with the given options.
///
/// Builds a processor for this call only; nothing about `options` outlives
/// it.
///
/// # Errors
///
/// See [`MarkdownProcessor::render`].
///
/// # Examples
///
/// ```
/// use plaza_commonmark::{ParseOptions, render_markdown};
///
/// let html = render_markdown("Hello *world*", &ParseOptions::default())?;
/// assert_eq!(html, "<p>Hello <em>world</em></p>\n");
/// # Ok::<(), plaza_commonmark::MarkdownError>(())
/// ```
pub fn render_markdown(
  content: &str,
  options: &ParseOptions,
) -> MarkdownResult<String> {
  MarkdownProcessor::new(options.clone()).render(content)
}

/// Render markdown with raw HTML escaping forced on.
///
/// This is the parser-level policy. For a render followed by tag removal see
/// [`crate::PreviewSanitizer`]; the two are not interchangeable.
///
/// # Errors
///
/// See [`MarkdownProcessor::render`].
pub fn sanitize_markdown(
  content: &str,
  options: &ParseOptions,
) -> MarkdownResult<String> {
  MarkdownProcessor::new(options.sanitized()).render(content)
}
