use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for plaza
#[derive(Parser, Debug)]
#[command(author, version, about = "Plaza: markdown for DevPlaza posts")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, e.g.
  /// `markdown.breaks=false`, can be used multiple times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the plaza CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render markdown to HTML.
  Render {
    /// Markdown file to read. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// Escape raw HTML while parsing.
    #[arg(long, conflicts_with = "preview")]
    sanitize: bool,

    /// Render for a preview, removing the configured forbidden tags.
    #[arg(long)]
    preview: bool,

    /// Write the HTML here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Print the top-level headings as JSON.
  Headings {
    /// Markdown file to read. Reads stdin when omitted.
    file: Option<PathBuf>,
  },

  /// Print the table of contents (levels 2 to 4) as JSON.
  Toc {
    /// Markdown file to read. Reads stdin when omitted.
    file: Option<PathBuf>,
  },

  /// Print the token stream as JSON.
  Tokens {
    /// Markdown file to read. Reads stdin when omitted.
    file: Option<PathBuf>,
  },

  /// Print the plain text of a document.
  Text {
    /// Markdown file to read. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// Collapse whitespace and cut the text to this many characters.
    #[arg(short, long)]
    max_chars: Option<usize>,
  },

  /// Render every markdown file in a directory.
  Build {
    /// Path to the directory containing markdown files.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Output directory for the rendered files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,
  },

  /// Initialize a new plaza configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "plaza.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
      "plaza",
      "render",
      "post.md",
      "--preview",
      "-c",
      "a.toml",
      "--config",
      "markdown.breaks=false",
    ])
    .expect("valid arguments");

    assert_eq!(cli.config_files, [PathBuf::from("a.toml")]);
    assert_eq!(cli.config_overrides, ["markdown.breaks=false"]);
    assert!(matches!(
      cli.command,
      Commands::Render { preview: true, sanitize: false, file: Some(_), .. }
    ));
  }

  #[test]
  fn test_sanitize_conflicts_with_preview() {
    assert!(
      Cli::try_parse_from(["plaza", "render", "--sanitize", "--preview"])
        .is_err()
    );
  }

  #[test]
  fn test_build_jobs() {
    let cli = Cli::try_parse_from(["plaza", "build", "-i", "posts", "-p", "4"])
      .expect("valid arguments");
    assert!(matches!(cli.command, Commands::Build { jobs: Some(4), .. }));
  }
}
