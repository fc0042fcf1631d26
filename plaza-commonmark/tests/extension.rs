use plaza_commonmark::{
  ParseOptions,
  Token,
  lex,
  processor::{EXTRA_BREAK_CLASS, extra_break_count, match_blank_run, render_blank_run},
  render_markdown,
};

const MARKER: &str = "<p class=\"extra-break\"></p>\n";

fn markers(html: &str) -> usize {
  html.matches(EXTRA_BREAK_CLASS).count()
}

fn render(md: &str) -> String {
  render_markdown(md, &ParseOptions::default()).unwrap_or_default()
}

#[test]
fn test_two_newlines_are_an_ordinary_break() {
  let html = render("First\n\nSecond");
  assert_eq!(html, "<p>First</p>\n<p>Second</p>\n");
  assert_eq!(markers(&html), 0);
}

#[test]
fn test_four_newlines_emit_three_markers() {
  let html = render("First\n\n\n\nSecond");
  assert_eq!(
    html,
    format!("<p>First</p>\n{}<p>Second</p>\n", MARKER.repeat(3))
  );
}

#[test]
fn test_three_newlines_emit_two_markers() {
  assert_eq!(markers(&render("First\n\n\nSecond")), 2);
}

#[test]
fn test_runs_at_document_edges_still_count() {
  let leading = render("\n\n\nText");
  assert!(leading.starts_with(&MARKER.repeat(2)));

  let trailing = render("Text\n\n\n\n");
  assert!(trailing.ends_with(&MARKER.repeat(3)));
  assert_eq!(markers(&trailing), 3);
}

#[test]
fn test_runs_inside_blocks_are_left_alone() {
  let code = render("```\na\n\n\n\nb\n```");
  assert_eq!(markers(&code), 0);

  let list = render("- a\n\n\n\n  continued");
  assert_eq!(markers(&list), 0);
}

#[test]
fn test_runs_between_other_block_kinds() {
  let html = render("# Title\n\n\n\n- item\n\n\n---");
  assert_eq!(markers(&html), 5);
}

#[test]
fn test_lexer_emits_custom_line_break_tokens() {
  let tokens = lex("a\n\n\n\nb", &ParseOptions::default());
  assert_eq!(tokens.len(), 3);
  assert_eq!(tokens[1], Token::CustomLineBreak {
    raw: "\n\n\n\n".to_string(),
  });
}

#[test]
fn test_tokenizer_and_renderer_contract() {
  assert_eq!(match_blank_run("\n\n\n# next"), Some("\n\n\n"));
  assert_eq!(match_blank_run("\n# next"), None);
  assert_eq!(extra_break_count("\n\n\n\n"), 3);
  assert_eq!(render_blank_run("\n\n"), "");
  assert_eq!(render_blank_run("\n\n\n\n"), MARKER.repeat(3));
}

#[test]
fn test_runs_after_link_definitions_still_count() {
  let html = render("Intro\n\n[a]: https://x.io\n\n\n\nBody [a]");
  assert_eq!(markers(&html), 3);
  assert!(html.starts_with("<p>Intro</p>\n"));
  assert!(html.ends_with("<p>Body <a href=\"https://x.io\">a</a></p>\n"));

  let tokens = lex("Intro\n\n[a]: https://x.io\n\n\n\nBody [a]", &ParseOptions::default());
  assert!(tokens.contains(&Token::CustomLineBreak {
    raw: "\n\n\n\n".to_string(),
  }));
  assert!(matches!(tokens.last(), Some(Token::Paragraph { .. })));
}
