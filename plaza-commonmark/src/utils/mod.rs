use std::{
  borrow::Cow,
  collections::HashMap,
  path::{Path, PathBuf},
  sync::LazyLock,
};

pub(crate) mod source;

use log::trace;
use regex::Regex;
use walkdir::WalkDir;

/// Anchor used when a heading slugifies to nothing (punctuation-only text).
pub const FALLBACK_SLUG: &str = "heading";

/// Slugify a string for use as an anchor ID.
///
/// Lowercases, joins whitespace-separated words with single dashes, then
/// drops every character that is not an ASCII letter or digit, `_`, `-`, or a
/// CJK Unified Ideograph (U+4E00..=U+9FA5). May return an empty string; see
/// [`Slugger`] for the fallback.
#[must_use]
pub fn slugify(text: &str) -> String {
  text
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
    .chars()
    .filter(|&c| is_slug_char(c))
    .collect()
}

const fn is_slug_char(c: char) -> bool {
  c.is_ascii_alphanumeric()
    || c == '_'
    || c == '-'
    || matches!(c, '\u{4e00}'..='\u{9fa5}')
}

/// Hands out heading anchors for one document.
///
/// The first heading with a given base slug keeps it, later ones get `-1`,
/// `-2`, ... appended. A suffixed candidate that collides with an anchor
/// already handed out is skipped, so every anchor is unique.
#[derive(Debug, Clone, Default)]
pub struct Slugger {
  seen: HashMap<String, usize>,
}

impl Slugger {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Anchor for the next heading with the given (cleaned) text.
  pub fn slug(&mut self, text: &str) -> String {
    let base = match slugify(text) {
      slug if slug.is_empty() => FALLBACK_SLUG.to_string(),
      slug => slug,
    };

    let Some(mut occurrence) = self.seen.get(&base).copied() else {
      self.seen.insert(base.clone(), 0);
      return base;
    };

    let slug = loop {
      occurrence += 1;
      let candidate = format!("{base}-{occurrence}");
      if !self.seen.contains_key(&candidate) {
        break candidate;
      }
    };

    self.seen.insert(base, occurrence);
    self.seen.insert(slug.clone(), 0);
    slug
  }
}

/// Clean raw inline heading markdown down to display text.
///
/// Strips HTML tags, then unwraps bold (`**x**`, `__x__`), italic (`*x*`,
/// `_x_`) and code spans, in that order, and decodes the `&#x20;` space
/// entity. Bold must go before italic as the delimiters overlap.
#[must_use]
pub fn clean_heading_text(raw: &str) -> String {
  static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_or_never(r"<[^>]*>"));
  static INLINE_MARKUP_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
      r"\*\*(.*?)\*\*",
      r"__(.*?)__",
      r"\*(.*?)\*",
      r"_(.*?)_",
      r"`(.*?)`",
    ]
    .into_iter()
    .map(compile_or_never)
    .collect()
  });

  let mut text = HTML_TAG_RE.replace_all(raw, "").trim().to_string();
  for re in INLINE_MARKUP_RES.iter() {
    text = re.replace_all(&text, "$1").into_owned();
  }
  text.replace("&#x20;", " ").trim().to_string()
}

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
#[must_use]
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
  if source.contains('\r') {
    Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
  } else {
    Cow::Borrowed(source)
  }
}

/// Rewrite self-closed void elements (`<br />`) in HTML form (`<br>`).
#[must_use]
pub fn unclose_void_elements(html: &str) -> String {
  static VOID_ELEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_or_never(r"<(br|hr|img|input)\b([^>]*?)\s*/>"));

  VOID_ELEMENT_RE.replace_all(html, "<$1$2>").into_owned()
}

/// Collect all markdown files from the input directory
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::with_capacity(100);

  for entry in WalkDir::new(input_dir)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
      files.push(path.to_owned());
    }
  }

  trace!("Found {} markdown files to process", files.len());
  files
}

/// Compile a pattern, falling back to [`never_matching_regex`] with an error
/// log if it does not compile.
pub(crate) fn compile_or_never(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile regex {pattern:?}: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify_collapses_whitespace() {
    assert_eq!(slugify("  Getting   Started  "), "getting-started");
    assert_eq!(slugify("Tabs\tand\nnewlines"), "tabs-and-newlines");
  }

  #[test]
  fn test_slugify_drops_punctuation_and_keeps_cjk() {
    assert_eq!(slugify("What's new? (v2.0)"), "whats-new-v20");
    assert_eq!(slugify("安装指南"), "安装指南");
    assert_eq!(slugify("Rust 安装 guide"), "rust-安装-guide");
    assert_eq!(slugify("!!!"), "");
  }

  #[test]
  fn test_slugger_suffixes_repeats() {
    let mut slugger = Slugger::new();
    assert_eq!(slugger.slug("Intro"), "intro");
    assert_eq!(slugger.slug("Intro"), "intro-1");
    assert_eq!(slugger.slug("intro"), "intro-2");
    assert_eq!(slugger.slug("!!!"), "heading");
    assert_eq!(slugger.slug("???"), "heading-1");
  }

  #[test]
  fn test_slugger_skips_taken_suffix() {
    let mut slugger = Slugger::new();
    assert_eq!(slugger.slug("foo"), "foo");
    assert_eq!(slugger.slug("foo-1"), "foo-1");
    assert_eq!(slugger.slug("foo"), "foo-2");
    assert_eq!(slugger.slug("foo-1"), "foo-1-1");
  }

  #[test]
  fn test_clean_heading_text_unwraps_markup() {
    assert_eq!(
      clean_heading_text("**Bold** and *Italic* and `code`"),
      "Bold and Italic and code"
    );
    assert_eq!(clean_heading_text("__strong__ _em_"), "strong em");
    assert_eq!(
      clean_heading_text("<span class=\"x\">Tagged</span>&#x20;title "),
      "Tagged title"
    );
  }

  #[test]
  fn test_normalize_newlines() {
    assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
    assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
  }

  #[test]
  fn test_unclose_void_elements() {
    assert_eq!(
      unclose_void_elements("a<br />\n<hr /><img src=\"x.png\" alt=\"\" />"),
      "a<br>\n<hr><img src=\"x.png\" alt=\"\">"
    );
    assert_eq!(unclose_void_elements("<p>keep</p>"), "<p>keep</p>");
  }

  #[test]
  fn test_collect_markdown_files_is_sorted_and_recursive() {
    #![allow(clippy::expect_used, reason = "Fine in tests")]
    let dir = tempfile::TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join("b")).expect("create subdir");
    for name in ["b/two.md", "a.md", "notes.txt", "b/readme.markdown"] {
      std::fs::write(dir.path().join(name), "# x").expect("write file");
    }

    let files = collect_markdown_files(dir.path());
    assert_eq!(files, [dir.path().join("a.md"), dir.path().join("b/two.md")]);
  }
}
