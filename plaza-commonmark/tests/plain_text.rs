use plaza_commonmark::{
  MarkdownProcessor,
  ParseOptionsBuilder,
  extract_plain_text,
  preview_excerpt,
};

#[test]
fn test_end_to_end_scenario() {
  let md = "# Title\n\n## Section One\n\nSome *text*.\n\n## Section One\n\nMore.";
  assert_eq!(
    extract_plain_text(md),
    "Title Section One Some *text*. Section One More."
  );
}

#[test]
fn test_markup_is_kept_verbatim() {
  assert_eq!(
    extract_plain_text("A **bold** and `code` line"),
    "A **bold** and `code` line"
  );
  assert_eq!(extract_plain_text("## *Styled* heading"), "*Styled* heading");
}

#[test]
fn test_lists_flatten_to_their_items() {
  let md = "Intro\n\n- first\n- second\n\n1. one\n2. two";
  assert_eq!(extract_plain_text(md), "Intro first second one two");
}

#[test]
fn test_code_and_quotes_contribute_text() {
  let md = "```sh\nplaza build\n```\n\n> quoted\n> words";
  assert_eq!(extract_plain_text(md), "plaza build quoted\nwords");
}

#[test]
fn test_textless_blocks_contribute_nothing() {
  let md = "before\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n\n\nafter";
  assert_eq!(extract_plain_text(md), "before after");
}

#[test]
fn test_empty_and_blank_input() {
  assert_eq!(extract_plain_text(""), "");
  assert_eq!(extract_plain_text("\n\n\n"), "");
}

#[test]
fn test_extraction_is_idempotent() {
  let md = "# A\n\ntext *here*\n\n- x\n- y\n\n\n\n> q";
  assert_eq!(extract_plain_text(md), extract_plain_text(md));
}

#[test]
fn test_preview_excerpt() {
  let md = "# Welcome\n\nThis post explains the build command.";
  assert_eq!(preview_excerpt(md, 100), "Welcome This post explains the build command.");
  assert_eq!(preview_excerpt(md, 12), "Welcome This…");
}

#[test]
fn test_html_blocks_drop_their_trailing_newline() {
  assert_eq!(
    extract_plain_text("<div>\nhi\n</div>\n\nafter"),
    "<div>\nhi\n</div> after"
  );
}

#[test]
fn test_excerpt_follows_processor_options() {
  let table = "| a | b |\n|---|---|\n| 1 | 2 |";
  assert_eq!(preview_excerpt(table, 50), "");

  let no_gfm = MarkdownProcessor::new(ParseOptionsBuilder::new().gfm(false).build());
  assert_eq!(no_gfm.excerpt(table, 50), "| a | b | |---|---| | 1 | 2 |");
  assert_eq!(no_gfm.excerpt(table, 9), "| a | b |…");
}
