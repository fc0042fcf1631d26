//! Heading extraction and anchor assignment.
//!
//! Both the renderer and [`extract_headings`] go through [`heading_sites`],
//! so the `id` written into the HTML and the `id` handed to a table of
//! contents are always the same string.
use comrak::nodes::{AstNode, NodeHeading, NodeValue};

use crate::{
  lexer::heading_source,
  processor::types::MarkdownProcessor,
  types::{Heading, TocEntry},
  utils::{Slugger, clean_heading_text, source::SourceMap},
};

/// A heading node together with its resolved anchor.
pub(crate) struct HeadingSite<'a> {
  pub(crate) node:      &'a AstNode<'a>,
  pub(crate) heading:   Heading,
  pub(crate) top_level: bool,
}

/// Collect every heading in document order and give each a unique anchor.
///
/// Headings nested in blockquotes or list items take part in
/// de-duplication, since the renderer anchors them too, but are marked as
/// not top-level.
pub(crate) fn heading_sites<'a>(
  root: &'a AstNode<'a>,
  map: &SourceMap<'_>,
) -> Vec<HeadingSite<'a>> {
  let mut slugger = Slugger::new();
  let mut sites = Vec::new();

  for node in root.descendants() {
    let ast = node.data.borrow();
    let NodeValue::Heading(NodeHeading { level, setext, .. }) = ast.value
    else {
      continue;
    };

    let text = clean_heading_text(&heading_source(map, ast.sourcepos, setext));
    let id = slugger.slug(&text);
    let top_level = node.parent().is_some_and(|parent| std::ptr::eq(parent, root));
    sites.push(HeadingSite {
      node,
      heading: Heading { level, text, id },
      top_level,
    });
  }

  sites
}

/// Top-level headings of a site list.
pub(crate) fn top_level_headings(sites: Vec<HeadingSite<'_>>) -> Vec<Heading> {
  sites
    .into_iter()
    .filter(|site| site.top_level)
    .map(|site| site.heading)
    .collect()
}

/// Extract the top-level headings of a document.
///
/// Headings inside lists or blockquotes are not returned, though they still
/// consume anchors. Never fails: input the engine cannot handle yields an
/// empty list.
///
/// # Examples
///
/// ```
/// use plaza_commonmark::extract_headings;
///
/// let headings = extract_headings("# Intro\n\n## Intro");
/// assert_eq!(headings[0].id, "intro");
/// assert_eq!(headings[1].id, "intro-1");
/// ```
#[must_use]
pub fn extract_headings(content: &str) -> Vec<Heading> {
  MarkdownProcessor::default().headings(content)
}

/// Headings of levels 2 through 4, in document order.
#[must_use]
pub fn table_of_contents(content: &str) -> Vec<TocEntry> {
  MarkdownProcessor::default().table_of_contents(content)
}

/// Text of the first level-1 heading, if there is one.
#[must_use]
pub fn document_title(content: &str) -> Option<String> {
  extract_headings(content)
    .into_iter()
    .find(|heading| heading.level == 1)
    .map(|heading| heading.text)
}
