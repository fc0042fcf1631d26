//! Preview sanitization: render first, then clean the HTML.
//!
//! This is independent of the `sanitize` parse option. That option escapes
//! raw HTML while parsing; the preview path renders with raw HTML allowed
//! and then runs the result through an allow-list cleaner with some tags
//! denied outright.
use log::warn;

use crate::processor::types::{MarkdownProcessor, ParseOptions};

/// Tags removed from previews unless configured otherwise.
pub const DEFAULT_FORBIDDEN_TAGS: &[&str] = &["img"];

/// Renders markdown for previews and cleans the resulting HTML.
#[derive(Debug, Clone)]
pub struct PreviewSanitizer {
  processor:      MarkdownProcessor,
  forbidden_tags: Vec<String>,
}

impl Default for PreviewSanitizer {
  fn default() -> Self {
    Self::new(ParseOptions::default())
  }
}

impl PreviewSanitizer {
  /// Sanitizer rendering with `options` and denying [`DEFAULT_FORBIDDEN_TAGS`].
  #[must_use]
  pub fn new(options: ParseOptions) -> Self {
    Self {
      processor:      MarkdownProcessor::new(options),
      forbidden_tags: DEFAULT_FORBIDDEN_TAGS
        .iter()
        .map(ToString::to_string)
        .collect(),
    }
  }

  /// Replace the deny-list.
  #[must_use]
  pub fn with_forbidden_tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.forbidden_tags = tags.into_iter().map(Into::into).collect();
    self
  }

  #[must_use]
  pub fn forbidden_tags(&self) -> &[String] {
    &self.forbidden_tags
  }

  /// Render and clean `content`.
  ///
  /// Never fails. If rendering fails the escaped source is returned, so the
  /// caller still has something safe to show.
  #[must_use]
  pub fn render(&self, content: &str) -> String {
    match self.processor.render(content) {
      Ok(html) => self.clean(&html),
      Err(err) => {
        warn!("Preview rendering failed, falling back to escaped source: {err}");
        html_escape::encode_text(content).into_owned()
      },
    }
  }

  /// Clean already-rendered HTML.
  #[must_use]
  pub fn clean(&self, html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
      .rm_tags(self.forbidden_tags.iter().map(String::as_str))
      .add_tag_attributes("p", &["class"])
      .add_tag_attributes("code", &["class"])
      .add_tag_attributes("input", &["type", "checked", "disabled"])
      .add_tags(&["input"]);
    for heading in ["h1", "h2", "h3", "h4", "h5", "h6"] {
      builder.add_tag_attributes(heading, &["id"]);
    }
    builder.clean(html).to_string()
  }
}

/// Render `content` for a preview with default options, denying `<img>`.
///
/// # Examples
///
/// ```
/// use plaza_commonmark::render_preview;
///
/// let html = render_preview("![alt](url.png) caption");
/// assert!(!html.contains("<img"));
/// assert!(html.contains("caption"));
/// ```
#[must_use]
pub fn render_preview(content: &str) -> String {
  PreviewSanitizer::default().render(content)
}
