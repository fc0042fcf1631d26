//! Types for plaza-commonmark public API and internal use.
use serde::{Deserialize, Serialize};

/// Lowest heading level that is listed in a table of contents.
pub const TOC_MIN_LEVEL: u8 = 2;

/// Highest heading level that is listed in a table of contents.
pub const TOC_MAX_LEVEL: u8 = 4;

/// Represents a heading in a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading level (1-6).
  pub level: u8,
  /// Heading text with inline markup removed.
  pub text:  String,
  /// Anchor ID, unique within the document it was extracted from.
  pub id:    String,
}

impl Heading {
  /// Whether this heading belongs in a table of contents.
  #[must_use]
  pub const fn in_toc(&self) -> bool {
    self.level >= TOC_MIN_LEVEL && self.level <= TOC_MAX_LEVEL
  }
}

/// A table of contents entry. Same shape as a [`Heading`], restricted to
/// levels 2 through 4.
pub type TocEntry = Heading;

/// Result of rendering a whole document in one pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedDocument {
  /// Rendered HTML output.
  pub html: String,

  /// Top-level headings, in document order.
  pub headings: Vec<Heading>,

  /// Navigation subset of `headings`.
  pub toc: Vec<TocEntry>,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,
}

impl RenderedDocument {
  pub(crate) fn from_parts(html: String, headings: Vec<Heading>) -> Self {
    let toc = headings.iter().filter(|h| h.in_toc()).cloned().collect();
    let title = headings
      .iter()
      .find(|h| h.level == 1)
      .map(|h| h.text.clone());
    Self {
      html,
      headings,
      toc,
      title,
    }
  }
}
