//! Extensions layered on top of comrak's CommonMark and GFM support.
//!
//! # Blank-line runs
//!
//! CommonMark folds any number of blank lines between two blocks into a
//! single paragraph break. Authors writing posts often hit Enter a few extra
//! times to get visible spacing, so runs of three or more newlines between
//! top-level blocks are rendered as empty paragraphs carrying the
//! `extra-break` class:
//!
//! ```
//! use plaza_commonmark::processor::extensions::render_blank_run;
//!
//! assert_eq!(render_blank_run("\n\n"), "");
//! assert_eq!(
//!   render_blank_run("\n\n\n"),
//!   "<p class=\"extra-break\"></p>\n<p class=\"extra-break\"></p>\n"
//! );
//! ```
//!
//! # Email mangling
//!
//! With `mangle` on, email autolinks are written out as character entities.
use comrak::nodes::{AstNode, NodeValue};
use log::trace;

use crate::utils::source::SourceMap;

/// Class carried by the empty paragraphs emitted for blank-line runs.
pub const EXTRA_BREAK_CLASS: &str = "extra-break";

/// Claim a run of two or more newlines at the very start of `src`.
///
/// Only the newlines themselves are consumed; whatever follows the run is
/// left for the next block.
#[must_use]
pub fn match_blank_run(src: &str) -> Option<&str> {
  let len = src.bytes().take_while(|&b| b == b'\n').count();
  (len >= 2).then(|| &src[..len])
}

/// Number of empty paragraphs a claimed run stands for.
///
/// Two newlines are an ordinary paragraph break and produce nothing. A run of
/// `n > 2` newlines produces `n - 1`.
#[must_use]
pub fn extra_break_count(raw: &str) -> usize {
  match raw.matches('\n').count() {
    n if n <= 2 => 0,
    n => n - 1,
  }
}

/// Render a claimed run as empty `extra-break` paragraphs.
#[must_use]
pub fn render_blank_run(raw: &str) -> String {
  format!("<p class=\"{EXTRA_BREAK_CLASS}\"></p>\n").repeat(extra_break_count(raw))
}

/// Markers for the source between two top-level blocks.
pub(crate) fn gap_markers(gap: &str) -> String {
  blank_runs(gap).0.into_iter().map(render_blank_run).collect()
}

/// Claim every newline run in a gap, plus whatever follows the last one.
///
/// A gap is not always blank: link reference definitions leave no block
/// behind, so their lines end up between two blocks. Runs on either side of
/// such a line are claimed separately. A whitespace-only line breaks a run
/// without starting a new one.
pub(crate) fn blank_runs(gap: &str) -> (Vec<&str>, &str) {
  let mut runs = Vec::new();
  let mut tail = gap;
  let mut rest = gap;

  while !rest.is_empty() {
    if let Some(run) = match_blank_run(rest) {
      runs.push(run);
      rest = &rest[run.len()..];
      tail = rest;
    } else {
      let skip = usize::from(rest.starts_with('\n'));
      let line_end = rest[skip..].find('\n').map_or(rest.len(), |nl| skip + nl);
      rest = if rest[skip..line_end].trim().is_empty() {
        // Whitespace-only lines are ordinary spacing and end the run.
        rest.trim_start()
      } else {
        &rest[line_end..]
      };
    }
  }

  (runs, tail)
}

/// Top-level blocks paired with the source that precedes each of them, plus
/// the source after the last block.
pub(crate) type BlockGaps<'a, 's> = (Vec<(&'s str, &'a AstNode<'a>)>, &'s str);

/// Walk the document's top-level blocks together with the text between them.
///
/// A gap runs from the newline ending the previous block's last non-blank
/// line (or the start of the document) up to the first line of the next
/// block (or the end of the document).
pub(crate) fn top_level_gaps<'a, 's>(
  root: &'a AstNode<'a>,
  map: &SourceMap<'s>,
) -> BlockGaps<'a, 's> {
  let mut previous_end = None;
  let mut blocks = Vec::new();

  for node in root.children() {
    let pos = node.data.borrow().sourcepos;
    blocks.push((map.gap(previous_end, Some(pos.start.line)), node));
    previous_end = Some(map.last_content_line(pos.start.line, pos.end.line));
  }

  (blocks, map.gap(previous_end, None))
}

/// Entity-encode every character of an email address.
///
/// Characters at even positions become hexadecimal references, odd ones
/// decimal, so the output is stable for a given address.
#[must_use]
pub fn mangle_email(address: &str) -> String {
  let mut out = String::with_capacity(address.len() * 6);
  for (i, c) in address.chars().enumerate() {
    let code = u32::from(c);
    if i % 2 == 0 {
      out.push_str(&format!("&#x{code:x};"));
    } else {
      out.push_str(&format!("&#{code};"));
    }
  }
  out
}

/// Replace email autolinks with entity-encoded anchors.
///
/// An autolink is a `mailto:` link whose only child is the bare address,
/// which is what both `<user@example.com>` and GFM bare addresses parse to.
/// Explicit `[text](mailto:...)` links are left alone.
pub(crate) fn mangle_email_autolinks<'a>(root: &'a AstNode<'a>) {
  for node in root.descendants() {
    let address = {
      let data = node.data.borrow();
      let NodeValue::Link(ref link) = data.value else {
        continue;
      };
      let Some(address) = link.url.strip_prefix("mailto:") else {
        continue;
      };
      if !is_bare_child(node, address) {
        continue;
      }
      address.to_string()
    };

    trace!("Mangling email autolink");
    let mangled = mangle_email(&address);
    node.data.borrow_mut().value = NodeValue::Raw(format!(
      "<a href=\"mailto:{mangled}\">{mangled}</a>"
    ));
    let children: Vec<_> = node.children().collect();
    for child in children {
      child.detach();
    }
  }
}

fn is_bare_child<'a>(node: &'a AstNode<'a>, address: &str) -> bool {
  let mut children = node.children();
  let (Some(only), None) = (children.next(), children.next()) else {
    return false;
  };
  matches!(&only.data.borrow().value, NodeValue::Text(text) if text == address)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_match_blank_run() {
    assert_eq!(match_blank_run("\n\n\nfoo"), Some("\n\n\n"));
    assert_eq!(match_blank_run("\n\n"), Some("\n\n"));
    assert_eq!(match_blank_run("\nfoo"), None);
    assert_eq!(match_blank_run("foo\n\n"), None);
    assert_eq!(match_blank_run(""), None);
  }

  #[test]
  fn test_extra_break_count() {
    assert_eq!(extra_break_count("\n"), 0);
    assert_eq!(extra_break_count("\n\n"), 0);
    assert_eq!(extra_break_count("\n\n\n"), 2);
    assert_eq!(extra_break_count("\n\n\n\n"), 3);
  }

  #[test]
  fn test_gap_markers_only_for_claimed_runs() {
    assert_eq!(gap_markers("\n  \n\n\n"), "");
    assert_eq!(gap_markers("\n\n\n\n").matches(EXTRA_BREAK_CLASS).count(), 3);
  }

  #[test]
  fn test_blank_runs_around_content_lines() {
    let (runs, tail) = blank_runs("\n\n[a]: https://x.io\n\n\n\n");
    assert_eq!(runs, ["\n\n", "\n\n\n\n"]);
    assert_eq!(tail, "");

    let (runs, tail) = blank_runs("\n[a]: /x\n");
    assert!(runs.is_empty());
    assert_eq!(tail, "\n[a]: /x\n");

    let (runs, tail) = blank_runs("\n\n\n  ");
    assert_eq!(runs, ["\n\n\n"]);
    assert_eq!(tail, "  ");

    let (runs, tail) = blank_runs("\n  \n\n\n");
    assert!(runs.is_empty());
    assert_eq!(tail, "\n  \n\n\n");
  }

  #[test]
  fn test_mangle_email_is_deterministic() {
    assert_eq!(mangle_email("ab"), "&#x61;&#98;");
    assert_eq!(mangle_email("a@b.c"), mangle_email("a@b.c"));
    assert!(!mangle_email("user@example.com").contains('@'));
  }
}
