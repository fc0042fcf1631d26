//! Token view of a parsed document.
//!
//! Tokens are a flat, serialisable description of the document's blocks in
//! source order, with inline tokens nested under the blocks that hold them.
//! They are derived from comrak's AST plus the original source text, so
//! `raw` and block `text` fields are exact slices of what the author wrote.
use std::sync::LazyLock;

use comrak::nodes::{AstNode, ListType, NodeHeading, NodeList, NodeValue, Sourcepos};
use regex::Regex;
use serde::Serialize;

use crate::{
  processor::{
    extensions::{blank_runs, top_level_gaps},
    types::{MarkdownProcessor, ParseOptions},
  },
  utils::{compile_or_never, source::SourceMap},
};

/// One lexed token.
///
/// Serialises with a `type` discriminator, for example
/// `{"type":"heading","raw":"# Hi","depth":1,"text":"Hi",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
  /// Whitespace between blocks that is not a blank-line run.
  Space { raw: String },

  /// Fenced or indented code block.
  Code {
    raw:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    text: String,
  },

  Heading {
    raw:    String,
    depth:  u8,
    /// Inline markdown of the heading, markup intact.
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  /// GFM table, cells flattened to text.
  Table {
    raw:    String,
    header: Vec<String>,
    rows:   Vec<Vec<String>>,
  },

  Hr { raw: String },

  Blockquote {
    raw:    String,
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  List {
    raw:     String,
    ordered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start:   Option<usize>,
    loose:   bool,
    items:   Vec<Self>,
  },

  ListItem {
    raw:     String,
    task:    bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    loose:   bool,
    text:    String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens:  Vec<Self>,
  },

  Paragraph {
    raw:    String,
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  /// Raw HTML, either a whole block or inline.
  Html {
    raw:   String,
    text:  String,
    block: bool,
  },

  /// Plain text. At block level this is a paragraph inside a tight list.
  Text {
    raw:    String,
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  /// A run of two or more newlines between top-level blocks.
  #[serde(rename = "customLineBreak")]
  CustomLineBreak { raw: String },

  Codespan { text: String },

  Strong {
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  Em {
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  Del {
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  Link {
    href:   String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title:  Option<String>,
    text:   String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tokens: Vec<Self>,
  },

  Image {
    href:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    text:  String,
  },

  Br,
}

impl Token {
  /// The token's `text` field, for the variants that carry one.
  #[must_use]
  pub fn text(&self) -> Option<&str> {
    match self {
      Self::Code { text, .. }
      | Self::Heading { text, .. }
      | Self::Blockquote { text, .. }
      | Self::ListItem { text, .. }
      | Self::Paragraph { text, .. }
      | Self::Html { text, .. }
      | Self::Text { text, .. }
      | Self::Codespan { text }
      | Self::Strong { text, .. }
      | Self::Em { text, .. }
      | Self::Del { text, .. }
      | Self::Link { text, .. }
      | Self::Image { text, .. } => Some(text),
      Self::Space { .. }
      | Self::Table { .. }
      | Self::Hr { .. }
      | Self::List { .. }
      | Self::CustomLineBreak { .. }
      | Self::Br => None,
    }
  }

  /// Type discriminator as it appears in serialised output.
  #[must_use]
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Space { .. } => "space",
      Self::Code { .. } => "code",
      Self::Heading { .. } => "heading",
      Self::Table { .. } => "table",
      Self::Hr { .. } => "hr",
      Self::Blockquote { .. } => "blockquote",
      Self::List { .. } => "list",
      Self::ListItem { .. } => "list_item",
      Self::Paragraph { .. } => "paragraph",
      Self::Html { .. } => "html",
      Self::Text { .. } => "text",
      Self::CustomLineBreak { .. } => "customLineBreak",
      Self::Codespan { .. } => "codespan",
      Self::Strong { .. } => "strong",
      Self::Em { .. } => "em",
      Self::Del { .. } => "del",
      Self::Link { .. } => "link",
      Self::Image { .. } => "image",
      Self::Br => "br",
    }
  }

  /// Paragraphs inside tight list items read as bare text.
  fn into_tight(self) -> Self {
    match self {
      Self::Paragraph { raw, text, tokens } => Self::Text { raw, text, tokens },
      other => other,
    }
  }
}

/// Lex markdown into top-level tokens.
///
/// Never fails; a document the engine cannot handle lexes to nothing.
///
/// # Examples
///
/// ```
/// use plaza_commonmark::{ParseOptions, Token, lex};
///
/// let tokens = lex("# Hi\n\n\n\ntext", &ParseOptions::default());
/// let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
/// assert_eq!(kinds, ["heading", "customLineBreak", "paragraph"]);
/// ```
#[must_use]
pub fn lex(content: &str, options: &ParseOptions) -> Vec<Token> {
  MarkdownProcessor::new(options.clone()).lex(content)
}

/// Lex a parsed document into top-level tokens, gaps included.
pub(crate) fn lex_document<'a>(
  root: &'a AstNode<'a>,
  map: &SourceMap<'_>,
) -> Vec<Token> {
  let (blocks, trailing) = top_level_gaps(root, map);
  let mut tokens = Vec::with_capacity(blocks.len() * 2);

  for (gap, node) in blocks {
    push_gap_tokens(&mut tokens, gap);
    tokens.push(block_token(node, map));
  }
  push_gap_tokens(&mut tokens, trailing);

  tokens
}

fn push_gap_tokens(tokens: &mut Vec<Token>, gap: &str) {
  let (runs, rest) = blank_runs(gap);
  tokens.extend(runs.into_iter().map(|run| {
    Token::CustomLineBreak {
      raw: run.to_string(),
    }
  }));

  // A lone newline is the end of the previous block, not spacing.
  if rest.len() > 1 && rest.trim().is_empty() {
    tokens.push(Token::Space {
      raw: rest.to_string(),
    });
  }
}

fn block_token<'a>(node: &'a AstNode<'a>, map: &SourceMap<'_>) -> Token {
  let ast = node.data.borrow();
  let pos = ast.sourcepos;
  let raw = map.raw(pos).to_string();

  match ast.value {
    NodeValue::Heading(NodeHeading { level, setext, .. }) => {
      Token::Heading {
        raw,
        depth: level,
        text: heading_source(map, pos, setext),
        tokens: inline_tokens(node),
      }
    },
    NodeValue::Paragraph => {
      Token::Paragraph {
        raw,
        text: map.block_text(pos),
        tokens: inline_tokens(node),
      }
    },
    NodeValue::CodeBlock(ref block) => {
      Token::Code {
        raw,
        lang: block
          .info
          .split_whitespace()
          .next()
          .map(ToString::to_string),
        text: block.literal.trim_end_matches('\n').to_string(),
      }
    },
    NodeValue::HtmlBlock(ref block) => {
      Token::Html {
        raw,
        text: block.literal.trim_end().to_string(),
        block: true,
      }
    },
    NodeValue::ThematicBreak => Token::Hr { raw },
    NodeValue::BlockQuote => {
      Token::Blockquote {
        text: strip_quote_markers(&raw),
        raw,
        tokens: node.children().map(|child| block_token(child, map)).collect(),
      }
    },
    NodeValue::List(NodeList {
      list_type,
      start,
      tight,
      ..
    }) => {
      let ordered = list_type == ListType::Ordered;
      Token::List {
        raw,
        ordered,
        start: ordered.then_some(start),
        loose: !tight,
        items: node
          .children()
          .map(|item| item_token(item, map, tight))
          .collect(),
      }
    },
    NodeValue::Table(..) => table_token(node, raw),
    NodeValue::Item(..) | NodeValue::TaskItem(..) => item_token(node, map, false),
    _ => {
      Token::Text {
        text: raw.clone(),
        raw,
        tokens: Vec::new(),
      }
    },
  }
}

/// Raw inline markdown of a heading, with the ATX markers or setext
/// underline removed.
pub(crate) fn heading_source(
  map: &SourceMap<'_>,
  pos: Sourcepos,
  setext: bool,
) -> String {
  if setext {
    let last_content_line = pos.end.line.saturating_sub(1).max(pos.start.line);
    return map
      .text_between(pos.start, last_content_line)
      .trim()
      .to_string();
  }

  let line = map.line(pos.start.line);
  let line = line
    .get(pos.start.column.saturating_sub(1)..)
    .unwrap_or(line);
  atx_heading_text(line)
}

/// Strip the opening `#`s and an optional closing sequence, which only counts
/// when it is separated from the text by a space.
fn atx_heading_text(line: &str) -> String {
  let text = line.trim_start().trim_start_matches('#').trim();
  if text.ends_with('#') {
    let trimmed = text.trim_end_matches('#');
    if trimmed.is_empty() || trimmed.ends_with([' ', '\t']) {
      return trimmed.trim().to_string();
    }
  }
  text.to_string()
}

fn strip_quote_markers(raw: &str) -> String {
  static QUOTE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_or_never(r"(?m)^ *>[ \t]?"));

  QUOTE_MARKER_RE.replace_all(raw, "").into_owned()
}

fn item_token<'a>(
  node: &'a AstNode<'a>,
  map: &SourceMap<'_>,
  tight: bool,
) -> Token {
  static TASK_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_or_never(r"^\[([ xX])\][ \t]*"));
  static CHECKED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_or_never(r"^\s*(?:[-+*]|\d{1,9}[.)])\s+\[[xX]\]")
  });

  let pos = node.data.borrow().sourcepos;
  let task = matches!(node.data.borrow().value, NodeValue::TaskItem(..));
  let raw = map.raw(pos).to_string();

  let mut text = node
    .first_child()
    .map(|first| map.text_between(first.data.borrow().sourcepos.start, pos.end.line))
    .unwrap_or_default();
  if task {
    text = TASK_MARKER_RE.replace(&text, "").into_owned();
  }

  let checked =
    task.then(|| CHECKED_ITEM_RE.is_match(map.line(pos.start.line)));

  let tokens = node
    .children()
    .map(|child| {
      let token = block_token(child, map);
      if tight { token.into_tight() } else { token }
    })
    .collect();

  Token::ListItem {
    raw,
    task,
    checked,
    loose: !tight,
    text,
    tokens,
  }
}

fn table_token<'a>(node: &'a AstNode<'a>, raw: String) -> Token {
  let mut rows = node.children().map(|row| {
    row
      .children()
      .map(|cell| inline_text(cell).trim().to_string())
      .collect::<Vec<_>>()
  });
  let header = rows.next().unwrap_or_default();
  Token::Table {
    raw,
    header,
    rows: rows.collect(),
  }
}

/// Inline tokens for the children of a block, with adjacent text merged.
pub(crate) fn inline_tokens<'a>(node: &'a AstNode<'a>) -> Vec<Token> {
  let mut tokens: Vec<Token> = Vec::new();

  for child in node.children() {
    let token = match child.data.borrow().value {
      NodeValue::Text(ref text) => plain_text_token(text),
      NodeValue::SoftBreak => plain_text_token("\n"),
      NodeValue::LineBreak => Token::Br,
      NodeValue::Code(ref code) => {
        Token::Codespan {
          text: code.literal.clone(),
        }
      },
      NodeValue::Strong => {
        Token::Strong {
          text:   inline_text(child),
          tokens: inline_tokens(child),
        }
      },
      NodeValue::Emph => {
        Token::Em {
          text:   inline_text(child),
          tokens: inline_tokens(child),
        }
      },
      NodeValue::Strikethrough => {
        Token::Del {
          text:   inline_text(child),
          tokens: inline_tokens(child),
        }
      },
      NodeValue::Link(ref link) => {
        Token::Link {
          href:   link.url.clone(),
          title:  non_empty(&link.title),
          text:   inline_text(child),
          tokens: inline_tokens(child),
        }
      },
      NodeValue::Image(ref link) => {
        Token::Image {
          href:  link.url.clone(),
          title: non_empty(&link.title),
          text:  inline_text(child),
        }
      },
      NodeValue::HtmlInline(ref html) => {
        Token::Html {
          raw:   html.clone(),
          text:  html.clone(),
          block: false,
        }
      },
      _ => plain_text_token(&inline_text(child)),
    };

    let merged = match (tokens.last_mut(), &token) {
      (
        Some(Token::Text {
          raw,
          text,
          tokens: nested,
        }),
        Token::Text {
          text: more,
          tokens: more_nested,
          ..
        },
      ) if nested.is_empty() && more_nested.is_empty() => {
        raw.push_str(more);
        text.push_str(more);
        true
      },
      _ => false,
    };
    if !merged {
      tokens.push(token);
    }
  }

  tokens
}

fn plain_text_token(text: &str) -> Token {
  Token::Text {
    raw:    text.to_string(),
    text:   text.to_string(),
    tokens: Vec::new(),
  }
}

fn non_empty(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

/// Concatenated literal text below `node`.
pub(crate) fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for descendant in node.descendants() {
    match descendant.data.borrow().value {
      NodeValue::Text(ref t) => text.push_str(t),
      NodeValue::Code(ref code) => text.push_str(&code.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
      _ => {},
    }
  }
  text
}
