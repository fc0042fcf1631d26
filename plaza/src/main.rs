use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use plaza_commonmark::MarkdownProcessor;
use serde::Serialize;

mod build;
mod cli;
mod config;
mod error;

use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return init_config(output, format, *force);
  }

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  match cli.command {
    Commands::Render {
      file,
      sanitize,
      preview,
      output,
    } => {
      let content = read_input(file.as_deref())?;
      let html = if preview {
        config.preview_sanitizer().render(&content)
      } else {
        if sanitize {
          config.markdown = config.markdown.sanitized();
        }
        MarkdownProcessor::new(config.markdown).render(&content)?
      };
      write_output(output.as_deref(), &html)?;
    },

    Commands::Headings { file } => {
      let content = read_input(file.as_deref())?;
      let processor = MarkdownProcessor::new(config.markdown);
      print_json(&processor.headings(&content))?;
    },

    Commands::Toc { file } => {
      let content = read_input(file.as_deref())?;
      let processor = MarkdownProcessor::new(config.markdown);
      print_json(&processor.table_of_contents(&content))?;
    },

    Commands::Tokens { file } => {
      let content = read_input(file.as_deref())?;
      let processor = MarkdownProcessor::new(config.markdown);
      print_json(&processor.lex(&content))?;
    },

    Commands::Text { file, max_chars } => {
      let content = read_input(file.as_deref())?;
      let processor = MarkdownProcessor::new(config.markdown);
      let text = match max_chars {
        Some(max_chars) => processor.excerpt(&content, max_chars),
        None => processor.plain_text(&content),
      };
      write_output(None, &format!("{text}\n"))?;
    },

    Commands::Build {
      input_dir,
      output_dir,
      jobs,
    } => {
      let input_dir = input_dir.unwrap_or(config.build.input_dir);
      let output_dir = output_dir.unwrap_or(config.build.output_dir);

      rayon::ThreadPoolBuilder::new()
        .num_threads(
          jobs.or(config.build.jobs).unwrap_or_else(num_cpus::get),
        )
        .build_global()?;

      let processor = MarkdownProcessor::new(config.markdown);
      let files = build::build_directory(&processor, &input_dir, &output_dir)?;
      info!(
        "Rendered {} files into {}",
        files.len(),
        output_dir.display()
      );
    },

    Commands::Init { .. } => {},
  }

  Ok(())
}

fn init_config(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize how your \
     posts are rendered."
  );
  Ok(())
}

/// Read markdown from `file`, or from stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String> {
  match file {
    Some(path) => {
      fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
    },
    None => io::read_to_string(io::stdin()).wrap_err("Failed to read stdin"),
  }
}

/// Write `content` to `output`, or to stdout when no path is given.
fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
  match output {
    Some(path) => {
      fs::write(path, content)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      info!("Wrote {}", path.display());
    },
    None => io::stdout().lock().write_all(content.as_bytes())?,
  }
  Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value)?;
  write_output(None, &format!("{json}\n"))
}
