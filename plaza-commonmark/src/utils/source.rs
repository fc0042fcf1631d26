//! Maps comrak source positions back onto the markdown text.
//!
//! Comrak positions are 1-based lines and 1-based byte columns. Every lookup
//! here clamps instead of failing, an out-of-range position reads as empty
//! text.
use comrak::nodes::{LineColumn, Sourcepos};

pub(crate) struct SourceMap<'s> {
  source:      &'s str,
  line_starts: Vec<usize>,
}

impl<'s> SourceMap<'s> {
  pub(crate) fn new(source: &'s str) -> Self {
    let line_starts = std::iter::once(0)
      .chain(source.match_indices('\n').map(|(i, _)| i + 1))
      .collect();
    Self {
      source,
      line_starts,
    }
  }

  pub(crate) const fn source(&self) -> &'s str {
    self.source
  }

  /// Offset at which `line` starts.
  pub(crate) fn line_start(&self, line: usize) -> usize {
    line
      .checked_sub(1)
      .and_then(|i| self.line_starts.get(i))
      .copied()
      .unwrap_or(self.source.len())
  }

  /// Offset of the newline that terminates `line`, or the end of input.
  pub(crate) fn line_end(&self, line: usize) -> usize {
    self
      .line_starts
      .get(line)
      .map_or(self.source.len(), |next| next - 1)
  }

  /// Text of `line` without its newline.
  pub(crate) fn line(&self, line: usize) -> &'s str {
    let start = self.line_start(line);
    self.slice(start, self.line_end(line))
  }

  /// Exact source of a block, from its first column to the end of its last
  /// line.
  pub(crate) fn raw(&self, pos: Sourcepos) -> &'s str {
    self.slice(self.offset(pos.start), self.line_end(pos.end.line))
  }

  /// Block content with container prefixes (`>` markers, list indentation)
  /// stripped from continuation lines.
  pub(crate) fn block_text(&self, pos: Sourcepos) -> String {
    self.text_between(pos.start, pos.end.line)
  }

  /// Same as [`Self::block_text`] for a block that ends on `last_line`.
  pub(crate) fn text_between(&self, start: LineColumn, last_line: usize) -> String {
    let indent = start.column.saturating_sub(1);
    let lines = (start.line..=last_line)
      .map(|line_no| {
        let line = self.line(line_no);
        if line_no == start.line {
          line.get(indent..).unwrap_or(line)
        } else {
          strip_container_prefix(line, indent)
        }
      })
      .collect::<Vec<_>>();
    lines.join("\n").trim_end().to_string()
  }

  /// Last non-blank line of `first..=last`, or `first` if all are blank.
  pub(crate) fn last_content_line(&self, first: usize, last: usize) -> usize {
    (first..=last)
      .rev()
      .find(|&line| !self.line(line).trim().is_empty())
      .unwrap_or(first)
  }

  /// Source between the end of line `after` and the start of line `before`.
  /// `None` stands for the start and the end of the document respectively.
  pub(crate) fn gap(&self, after: Option<usize>, before: Option<usize>) -> &'s str {
    let start = after.map_or(0, |line| self.line_end(line));
    let end = before.map_or(self.source.len(), |line| self.line_start(line));
    self.slice(start, end)
  }

  fn offset(&self, at: LineColumn) -> usize {
    let start = self.line_start(at.line);
    let end = self.line_end(at.line).max(start);
    (start + at.column.saturating_sub(1)).min(end)
  }

  fn slice(&self, start: usize, end: usize) -> &'s str {
    if start >= end {
      return "";
    }
    self.source.get(start..end).unwrap_or("")
  }
}

/// Drop up to `width` bytes of blockquote markers and indentation.
fn strip_container_prefix(line: &str, width: usize) -> &str {
  let prefix = line
    .char_indices()
    .take_while(|&(i, c)| i < width && matches!(c, ' ' | '\t' | '>'))
    .last()
    .map_or(0, |(i, c)| i + c.len_utf8());
  line.get(prefix..).unwrap_or(line)
}
