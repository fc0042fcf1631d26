//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor` and its
//! methods: parsing with comrak, the AST rewrites for heading anchors and
//! email mangling, and block-by-block HTML generation with blank-line markers.
use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use log::{debug, trace, warn};

use super::{
  extensions::{gap_markers, mangle_email_autolinks, top_level_gaps},
  process::{error_page, guard_engine},
  types::{MarkdownProcessor, ParseOptions},
};
use crate::{
  error::MarkdownResult,
  headings::{HeadingSite, heading_sites, top_level_headings},
  lexer::{Token, lex_document},
  plain::{flatten_tokens, truncate_text},
  types::{Heading, RenderedDocument, TocEntry},
  utils::{normalize_newlines, source::SourceMap, unclose_void_elements},
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub const fn new(options: ParseOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &ParseOptions {
    &self.options
  }

  /// Render Markdown to HTML.
  ///
  /// # Errors
  ///
  /// Returns an error if the engine fails on the input and `silent` is off.
  /// With `silent` on, the error is rendered as HTML instead.
  pub fn render(&self, markdown: &str) -> MarkdownResult<String> {
    self.render_document(markdown).map(|document| document.html)
  }

  /// Render Markdown to HTML, extracting headings, table of contents and
  /// title from the same parse.
  ///
  /// # Errors
  ///
  /// Same as [`Self::render`].
  pub fn render_document(
    &self,
    markdown: &str,
  ) -> MarkdownResult<RenderedDocument> {
    let rendered = guard_engine("rendering", || {
      self.with_document(markdown, |root, map, options| {
        self.render_html(root, map, options)
      })
    });

    match rendered {
      Ok((html, headings)) => Ok(RenderedDocument::from_parts(html, headings)),
      Err(err) if self.options.silent => {
        warn!("Rendering failed, emitting error page: {err}");
        Ok(RenderedDocument::from_parts(error_page(&err), Vec::new()))
      },
      Err(err) => Err(err),
    }
  }

  /// Lex a document into its top-level tokens.
  #[must_use]
  pub fn lex(&self, markdown: &str) -> Vec<Token> {
    guard_engine("lexing", || {
      Ok(self.with_document(markdown, |root, map, _| lex_document(root, map)))
    })
    .unwrap_or_else(|err| {
      warn!("Lexing failed, treating document as empty: {err}");
      Vec::new()
    })
  }

  /// Top-level headings with their anchors, in document order.
  #[must_use]
  pub fn headings(&self, markdown: &str) -> Vec<Heading> {
    guard_engine("heading extraction", || {
      Ok(self.with_document(markdown, |root, map, _| {
        top_level_headings(heading_sites(root, map))
      }))
    })
    .unwrap_or_else(|err| {
      warn!("Heading extraction failed, returning no headings: {err}");
      Vec::new()
    })
  }

  /// Headings of levels 2 through 4, in document order.
  #[must_use]
  pub fn table_of_contents(&self, markdown: &str) -> Vec<TocEntry> {
    self
      .headings(markdown)
      .into_iter()
      .filter(Heading::in_toc)
      .collect()
  }

  /// Lossy plain-text rendition of the document.
  #[must_use]
  pub fn plain_text(&self, markdown: &str) -> String {
    flatten_tokens(&self.lex(markdown))
  }

  /// Plain text with whitespace collapsed, cut to at most `max_chars`
  /// characters plus a trailing ellipsis when anything was cut.
  #[must_use]
  pub fn excerpt(&self, markdown: &str, max_chars: usize) -> String {
    truncate_text(&self.plain_text(markdown), max_chars)
  }

  /// Parse `markdown` and hand the tree to `f`.
  fn with_document<T>(
    &self,
    markdown: &str,
    f: impl for<'a> FnOnce(&'a AstNode<'a>, &SourceMap<'_>, &Options<'_>) -> T,
  ) -> T {
    let source = normalize_newlines(markdown);
    let map = SourceMap::new(&source);
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, &source, &options);
    f(root, &map, &options)
  }

  fn render_html<'a>(
    &self,
    root: &'a AstNode<'a>,
    map: &SourceMap<'_>,
    options: &Options<'_>,
  ) -> MarkdownResult<(String, Vec<Heading>)> {
    // Anchoring renders heading contents, so mangled links must be in place
    // first.
    if self.options.mangle {
      mangle_email_autolinks(root);
    }

    let sites = heading_sites(root, map);
    if self.options.header_ids {
      for site in &sites {
        anchor_heading(site, options)?;
      }
    }

    let (blocks, trailing) = top_level_gaps(root, map);
    trace!("Rendering {} top-level blocks", blocks.len());

    let mut html = String::with_capacity(map.source().len() * 2);
    for (gap, node) in blocks {
      html.push_str(&gap_markers(gap));
      comrak::format_html(node, options, &mut html)?;
    }
    html.push_str(&gap_markers(trailing));

    if !self.options.xhtml {
      html = unclose_void_elements(&html);
    }

    Ok((html, top_level_headings(sites)))
  }

  /// Build comrak options from `ParseOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm_enabled() {
      options.extension.table = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    options.render.hardbreaks = self.options.hard_breaks();
    options.parse.smart = self.options.smartypants;
    if self.options.sanitize {
      options.render.escape = true;
    } else {
      options.render.r#unsafe = true;
    }
    // Anchors come from our own slugger.
    options.extension.header_ids = None;

    debug!(
      "Resolved comrak options: gfm={}, hardbreaks={}, smart={}, sanitize={}",
      self.options.gfm_enabled(),
      options.render.hardbreaks,
      options.parse.smart,
      self.options.sanitize
    );
    options
  }
}

/// Turn a heading node into pre-rendered HTML carrying its anchor.
fn anchor_heading(
  site: &HeadingSite<'_>,
  options: &Options<'_>,
) -> MarkdownResult<()> {
  let mut inner = String::new();
  for child in site.node.children() {
    comrak::format_html(child, options, &mut inner)?;
  }

  let level = site.heading.level;
  let id = &site.heading.id;
  site.node.data.borrow_mut().value =
    NodeValue::Raw(format!("<h{level} id=\"{id}\">{inner}</h{level}>\n"));

  let children: Vec<_> = site.node.children().collect();
  for child in children {
    child.detach();
  }
  Ok(())
}
