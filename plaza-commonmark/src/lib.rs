//! # plaza-commonmark
//!
//! The markdown pipeline behind DevPlaza posts, blogs and tutorials. Turns
//! raw markdown into HTML, a heading list with collision-free anchors, a
//! table of contents and plain text for previews and search.
//!
//! ## Quick Start
//!
//! ```rust
//! use plaza_commonmark::{MarkdownProcessor, ParseOptions};
//!
//! let processor = MarkdownProcessor::new(ParseOptions::default());
//! let document = processor.render_document("# Hello World\n\n## Usage\n\nThis is **bold** text.")?;
//!
//! assert_eq!(document.title.as_deref(), Some("Hello World"));
//! assert_eq!(document.toc[0].id, "usage");
//! assert!(document.html.contains("<h2 id=\"usage\">Usage</h2>"));
//! # Ok::<(), plaza_commonmark::MarkdownError>(())
//! ```
//!
//! ## Free functions
//!
//! ```rust
//! use plaza_commonmark::{
//!   ParseOptions,
//!   extract_headings,
//!   extract_plain_text,
//!   render_markdown,
//!   sanitize_markdown,
//!   table_of_contents,
//! };
//!
//! let source = "# Title\n\n## Section One\n\nSome *text*.";
//! let html = render_markdown(source, &ParseOptions::default())?;
//! let safe = sanitize_markdown("<script>x</script>", &ParseOptions::default())?;
//! assert!(!safe.contains("<script>"));
//! assert_eq!(extract_headings(source).len(), 2);
//! assert_eq!(table_of_contents(source).len(), 1);
//! assert_eq!(extract_plain_text(source), "Title Section One Some *text*.");
//! # let _ = html;
//! # Ok::<(), plaza_commonmark::MarkdownError>(())
//! ```
//!
//! ## Features
//!
//! - **AST-based processing** using `comrak`, with GFM tables, strikethrough,
//!   task lists and autolinks
//! - **Heading anchors** from one shared slugger, so rendered `id`s and
//!   extracted headings always agree
//! - **Blank-line runs** rendered as `extra-break` paragraphs
//! - **Two sanitization policies**: parse-time HTML escaping and
//!   render-then-clean previews
//! - **No global state**: options live in the processor value
mod error;
pub mod headings;
pub mod lexer;
pub mod plain;
pub mod processor;
pub mod sanitize;
mod types;
pub mod utils;

pub use crate::{
  error::{MarkdownError, MarkdownResult},
  headings::{document_title, extract_headings, table_of_contents},
  lexer::{Token, lex},
  plain::{extract_plain_text, preview_excerpt},
  processor::{
    MarkdownProcessor,
    ParseOptions,
    ParseOptionsBuilder,
    render_markdown,
    sanitize_markdown,
  },
  sanitize::{PreviewSanitizer, render_preview},
  types::{Heading, RenderedDocument, TOC_MAX_LEVEL, TOC_MIN_LEVEL, TocEntry},
  utils::{Slugger, clean_heading_text, slugify},
};
