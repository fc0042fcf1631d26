//! Type definitions for the Markdown processor.
//!
//! Contains the configuration record (`ParseOptions`), its builder and the
//! processor struct (`MarkdownProcessor`).
//!
//! # Examples
//!
//! ```
//! use plaza_commonmark::{MarkdownProcessor, ParseOptions};
//!
//! let options = ParseOptions {
//!   breaks: false,
//!   smartypants: true,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use serde::{Deserialize, Serialize};

/// Options for configuring the Markdown processor.
///
/// Every field has a default, so a partial record (from a config file or a
/// JSON payload) fills in the rest. Unknown keys are ignored, and the
/// camelCase spellings used by browser-side editors are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct ParseOptions {
  /// Treat single newlines as line breaks. Only honoured with `gfm`.
  pub breaks: bool,

  /// Enable GitHub Flavored Markdown: tables, strikethrough, task lists and
  /// bare autolinks.
  pub gfm: bool,

  /// Give headings `id` attributes.
  #[serde(alias = "headerIds")]
  pub header_ids: bool,

  /// Entity-encode email autolinks.
  pub mangle: bool,

  /// Stick to original markdown; overrides `gfm`.
  pub pedantic: bool,

  /// Escape raw HTML found in the source and drop dangerous link schemes.
  pub sanitize: bool,

  /// Degrade to best-effort HTML instead of returning an error.
  pub silent: bool,

  /// Accepted for compatibility. List splitting always follows CommonMark,
  /// which already starts a new list when the bullet character changes.
  #[serde(alias = "smartLists")]
  pub smart_lists: bool,

  /// Typographic quotes, dashes and ellipses.
  pub smartypants: bool,

  /// Self-close void elements (`<br />`).
  pub xhtml: bool,
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      breaks:      true,
      gfm:         true,
      header_ids:  true,
      mangle:      false,
      pedantic:    false,
      sanitize:    false,
      silent:      false,
      smart_lists: true,
      smartypants: false,
      xhtml:       false,
    }
  }
}

impl ParseOptions {
  /// Copy of these options with `sanitize` forced on.
  #[must_use]
  pub fn sanitized(&self) -> Self {
    Self {
      sanitize: true,
      ..self.clone()
    }
  }

  /// Whether GFM extensions are active once `pedantic` is taken into account.
  #[must_use]
  pub const fn gfm_enabled(&self) -> bool {
    self.gfm && !self.pedantic
  }

  /// Whether single newlines become `<br>`.
  #[must_use]
  pub const fn hard_breaks(&self) -> bool {
    self.breaks && self.gfm_enabled()
  }
}

/// Builder for constructing `ParseOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
  options: ParseOptions,
}

impl ParseOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable single-newline line breaks.
  #[must_use]
  pub const fn breaks(mut self, enabled: bool) -> Self {
    self.options.breaks = enabled;
    self
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Enable or disable heading `id` attributes.
  #[must_use]
  pub const fn header_ids(mut self, enabled: bool) -> Self {
    self.options.header_ids = enabled;
    self
  }

  /// Enable or disable email autolink mangling.
  #[must_use]
  pub const fn mangle(mut self, enabled: bool) -> Self {
    self.options.mangle = enabled;
    self
  }

  /// Enable or disable pedantic mode.
  #[must_use]
  pub const fn pedantic(mut self, enabled: bool) -> Self {
    self.options.pedantic = enabled;
    self
  }

  /// Enable or disable raw HTML escaping.
  #[must_use]
  pub const fn sanitize(mut self, enabled: bool) -> Self {
    self.options.sanitize = enabled;
    self
  }

  /// Enable or disable best-effort error recovery.
  #[must_use]
  pub const fn silent(mut self, enabled: bool) -> Self {
    self.options.silent = enabled;
    self
  }

  /// Set the smart lists flag.
  #[must_use]
  pub const fn smart_lists(mut self, enabled: bool) -> Self {
    self.options.smart_lists = enabled;
    self
  }

  /// Enable or disable typographic punctuation.
  #[must_use]
  pub const fn smartypants(mut self, enabled: bool) -> Self {
    self.options.smartypants = enabled;
    self
  }

  /// Enable or disable self-closing void elements.
  #[must_use]
  pub const fn xhtml(mut self, enabled: bool) -> Self {
    self.options.xhtml = enabled;
    self
  }

  /// Build the final `ParseOptions`.
  #[must_use]
  pub fn build(self) -> ParseOptions {
    self.options
  }
}

/// Main Markdown processor.
///
/// Holds nothing but its options, which never change after construction, so
/// one processor can be shared freely across threads and concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct MarkdownProcessor {
  pub(crate) options: ParseOptions,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let options = ParseOptions::default();
    assert!(options.breaks);
    assert!(options.gfm);
    assert!(options.header_ids);
    assert!(!options.mangle);
    assert!(!options.pedantic);
    assert!(!options.sanitize);
    assert!(!options.silent);
    assert!(options.smart_lists);
    assert!(!options.smartypants);
    assert!(!options.xhtml);
  }

  #[test]
  fn test_builder_chain() {
    let options = ParseOptionsBuilder::new()
      .breaks(false)
      .mangle(true)
      .xhtml(true)
      .build();
    assert!(!options.breaks);
    assert!(options.mangle);
    assert!(options.xhtml);
    assert!(options.gfm);
  }

  #[test]
  fn test_pedantic_overrides_gfm() {
    let options = ParseOptionsBuilder::new().pedantic(true).build();
    assert!(options.gfm);
    assert!(!options.gfm_enabled());
    assert!(!options.hard_breaks());
  }

  #[test]
  fn test_sanitized_keeps_other_flags() {
    let options = ParseOptionsBuilder::new().breaks(false).build().sanitized();
    assert!(options.sanitize);
    assert!(!options.breaks);
  }
}
