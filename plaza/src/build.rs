use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, eyre};
use log::{debug, info};
use plaza_commonmark::{MarkdownProcessor, utils::collect_markdown_files};
use rayon::prelude::*;

/// Render every markdown file under `input_dir` into `output_dir`.
///
/// Each `path/to/post.md` produces `path/to/post.html` and
/// `path/to/post.toc.json`, mirroring the input layout. Files are rendered
/// in parallel on the global rayon pool, all sharing `processor`.
///
/// # Returns
///
/// The markdown files that were rendered.
pub fn build_directory(
  processor: &MarkdownProcessor,
  input_dir: &Path,
  output_dir: &Path,
) -> Result<Vec<PathBuf>> {
  if !input_dir.is_dir() {
    return Err(eyre!(
      "Input directory does not exist: {}",
      input_dir.display()
    ));
  }

  let files = collect_markdown_files(input_dir);
  info!("Rendering {} markdown files", files.len());

  files.par_iter().try_for_each(|file_path| {
    render_file(processor, input_dir, output_dir, file_path)
  })?;

  Ok(files)
}

fn render_file(
  processor: &MarkdownProcessor,
  input_dir: &Path,
  output_dir: &Path,
  file_path: &Path,
) -> Result<()> {
  let content = fs::read_to_string(file_path)
    .wrap_err_with(|| format!("Failed to read {}", file_path.display()))?;
  let document = processor
    .render_document(&content)
    .wrap_err_with(|| format!("Failed to render {}", file_path.display()))?;

  let rel_path = file_path.strip_prefix(input_dir).wrap_err_with(|| {
    format!("{} is outside {}", file_path.display(), input_dir.display())
  })?;
  let html_path = output_dir.join(rel_path).with_extension("html");
  let toc_path = output_dir.join(rel_path).with_extension("toc.json");

  if let Some(parent) = html_path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&html_path, &document.html)?;
  fs::write(&toc_path, serde_json::to_string_pretty(&document.toc)?)?;

  debug!(
    "Wrote {} ({})",
    html_path.display(),
    document.title.as_deref().unwrap_or("untitled")
  );
  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use plaza_commonmark::{ParseOptions, TocEntry};
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_build_mirrors_input_layout() {
    let input = TempDir::new().expect("input dir");
    let output = TempDir::new().expect("output dir");
    fs::create_dir_all(input.path().join("guides")).expect("create subdir");
    fs::write(
      input.path().join("guides/setup.md"),
      "# Setup\n\n## Install\n\n## Install\n",
    )
    .expect("write post");
    fs::write(input.path().join("notes.txt"), "not markdown").expect("write");

    let processor = MarkdownProcessor::new(ParseOptions::default());
    let files = build_directory(&processor, input.path(), output.path())
      .expect("build succeeds");
    assert_eq!(files.len(), 1);

    let html = fs::read_to_string(output.path().join("guides/setup.html"))
      .expect("html written");
    assert!(html.contains("<h2 id=\"install-1\">Install</h2>"));

    let toc: Vec<TocEntry> = serde_json::from_str(
      &fs::read_to_string(output.path().join("guides/setup.toc.json"))
        .expect("toc written"),
    )
    .expect("toc parses");
    let ids: Vec<_> = toc.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, ["install", "install-1"]);
    assert!(!output.path().join("notes.html").exists());
  }

  #[test]
  fn test_missing_input_dir_is_an_error() {
    let output = TempDir::new().expect("output dir");
    let processor = MarkdownProcessor::default();
    assert!(
      build_directory(&processor, Path::new("/nonexistent/posts"), output.path())
        .is_err()
    );
  }
}
