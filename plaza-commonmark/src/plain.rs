//! Plain-text extraction for previews and search indexing.
use crate::{lexer::Token, processor::types::MarkdownProcessor};

/// Flatten a document to plain text.
///
/// Each top-level token contributes its `text` verbatim, so markup inside
/// paragraphs survives. Lists contribute their items. Tokens without text
/// (rules, tables, spacing) contribute nothing. Contributions are joined
/// with single spaces and the result is trimmed.
///
/// # Examples
///
/// ```
/// use plaza_commonmark::extract_plain_text;
///
/// let text = extract_plain_text("# Title\n\nSome *text*.\n\n- one\n- two");
/// assert_eq!(text, "Title Some *text*. one two");
/// ```
#[must_use]
pub fn extract_plain_text(content: &str) -> String {
  MarkdownProcessor::default().plain_text(content)
}

/// Plain text with whitespace collapsed, cut to at most `max_chars`
/// characters plus a trailing ellipsis when anything was cut.
///
/// Lexes with default options; see [`MarkdownProcessor::excerpt`] for other
/// options.
#[must_use]
pub fn preview_excerpt(content: &str, max_chars: usize) -> String {
  MarkdownProcessor::default().excerpt(content, max_chars)
}

pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
  let text = text
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ");

  match text.char_indices().nth(max_chars) {
    Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
    None => text,
  }
}

pub(crate) fn flatten_tokens(tokens: &[Token]) -> String {
  tokens
    .iter()
    .map(token_text)
    .filter(|text| !text.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .trim()
    .to_string()
}

fn token_text(token: &Token) -> String {
  match token {
    Token::List { items, .. } => flatten_tokens(items),
    other => other.text().unwrap_or_default().to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_preview_excerpt_cuts_on_char_boundary() {
    assert_eq!(preview_excerpt("安装指南很长", 4), "安装指南…");
    assert_eq!(preview_excerpt("short", 10), "short");
    assert_eq!(preview_excerpt("one two three", 4), "one…");
  }

  #[test]
  fn test_flatten_skips_textless_tokens() {
    let tokens = vec![
      Token::Hr {
        raw: "---".into(),
      },
      Token::Paragraph {
        raw:    "a".into(),
        text:   "a".into(),
        tokens: Vec::new(),
      },
    ];
    assert_eq!(flatten_tokens(&tokens), "a");
  }
}
