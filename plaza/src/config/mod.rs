pub mod templates;

use std::{
  fs,
  path::{Path, PathBuf},
};

use plaza_commonmark::{ParseOptions, PreviewSanitizer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

/// Configuration for the `plaza` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Options handed to every markdown processor.
  pub markdown: ParseOptions,

  /// Settings for `plaza render --preview`.
  pub preview: PreviewConfig,

  /// Settings for `plaza build`.
  pub build: BuildConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
  /// Tags stripped from preview HTML.
  pub forbid_tags: Vec<String>,
}

impl Default for PreviewConfig {
  fn default() -> Self {
    Self {
      forbid_tags: vec!["img".to_string()],
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// Directory searched recursively for `*.md` files.
  pub input_dir: PathBuf,

  /// Directory the rendered files are written to.
  pub output_dir: PathBuf,

  /// Worker threads, defaulting to the number of CPU cores.
  pub jobs: Option<usize>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      input_dir:  PathBuf::from("posts"),
      output_dir: PathBuf::from("build"),
      jobs:       None,
    }
  }
}

impl Config {
  /// Load configuration from a TOML or JSON file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, has an unknown extension
  /// or does not parse.
  pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
    Ok(serde_json::from_value(read_value(path.as_ref())?)?)
  }

  /// Load configuration from files and `KEY=VALUE` overrides.
  ///
  /// Files are merged in order, later files replacing earlier values key by
  /// key. With no files given, [`Self::find_config_file`] is consulted, and
  /// the defaults are used if nothing is found. Overrides apply last.
  ///
  /// # Errors
  ///
  /// Returns an error if any file fails to load or any override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> ConfigResult<Self> {
    let discovered;
    let files = if config_files.is_empty() {
      discovered = Self::find_config_file();
      discovered.as_slice()
    } else {
      config_files
    };

    let mut merged = Value::Object(serde_json::Map::new());
    for path in files {
      log::debug!("Loading configuration from {}", path.display());
      merge_values(&mut merged, read_value(path)?);
    }

    let mut config: Self = serde_json::from_value(merged)?;
    config.apply_overrides(config_overrides)?;
    Ok(config)
  }

  /// Apply `KEY=VALUE` overrides in order.
  ///
  /// # Errors
  ///
  /// Returns an error for a malformed override, an unknown key or a value
  /// that does not parse.
  pub fn apply_overrides(&mut self, overrides: &[String]) -> ConfigResult<()> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(&mut self, key: &str, value: &str) -> ConfigResult<()> {
    if let Some(flag) = key.strip_prefix("markdown.") {
      let options = &mut self.markdown;
      let slot = match flag {
        "breaks" => &mut options.breaks,
        "gfm" => &mut options.gfm,
        "header_ids" | "headerIds" => &mut options.header_ids,
        "mangle" => &mut options.mangle,
        "pedantic" => &mut options.pedantic,
        "sanitize" => &mut options.sanitize,
        "silent" => &mut options.silent,
        "smart_lists" | "smartLists" => &mut options.smart_lists,
        "smartypants" => &mut options.smartypants,
        "xhtml" => &mut options.xhtml,
        _ => return Err(unknown_key(key)),
      };
      *slot = parse_bool(key, value)?;
      return Ok(());
    }

    match key {
      "preview.forbid_tags" => {
        self.preview.forbid_tags = value
          .split(',')
          .map(str::trim)
          .filter(|tag| !tag.is_empty())
          .map(ToString::to_string)
          .collect();
      },
      "build.input_dir" => self.build.input_dir = PathBuf::from(value),
      "build.output_dir" => self.build.output_dir = PathBuf::from(value),
      "build.jobs" => {
        let jobs = value.parse::<usize>().map_err(|e| {
          ConfigError::Config(format!("Invalid value for '{key}': {e}"))
        })?;
        self.build.jobs = Some(jobs);
      },
      _ => return Err(unknown_key(key)),
    }

    Ok(())
  }

  /// Preview sanitizer configured from `markdown` and `preview`.
  #[must_use]
  pub fn preview_sanitizer(&self) -> PreviewSanitizer {
    PreviewSanitizer::new(self.markdown.clone())
      .with_forbidden_tags(self.preview.forbid_tags.iter().cloned())
  }

  /// Search the usual places for a configuration file.
  ///
  /// The current directory is checked first, then `$XDG_CONFIG_HOME`, then
  /// `$HOME/.config/plaza/`.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok();
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);

    config_candidates(current_dir.as_deref(), xdg_config_home, home)
      .into_iter()
      .find(|path| path.is_file())
  }

  /// Write the default configuration in `format` to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error for an unsupported format or a failed write.
  pub fn generate_default_config(format: &str, path: &Path) -> ConfigResult<()> {
    let config_content = templates::get_template(format)?;
    fs::write(path, config_content)?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// Config file names tried in a project directory, in order.
const PROJECT_CONFIG_NAMES: &[&str] = &[
  "plaza.toml",
  "plaza.json",
  ".plaza.toml",
  ".plaza.json",
  ".config/plaza.toml",
  ".config/plaza.json",
];

/// Candidate config paths, most specific first.
fn config_candidates(
  current_dir: Option<&Path>,
  xdg_config_home: Option<PathBuf>,
  home: Option<PathBuf>,
) -> Vec<PathBuf> {
  let project = current_dir
    .into_iter()
    .flat_map(|dir| PROJECT_CONFIG_NAMES.iter().map(move |name| dir.join(name)));
  let xdg = xdg_config_home
    .into_iter()
    .flat_map(|dir| ["plaza.toml", "plaza.json"].map(|name| dir.join(name)));
  let user = home.into_iter().flat_map(|home| {
    let dir = home.join(".config").join("plaza");
    ["config.toml", "config.json"].map(|name| dir.join(name))
  });

  project.chain(xdg).chain(user).collect()
}

/// Read a config file into an untyped tree, dispatching on its extension.
fn read_value(path: &Path) -> ConfigResult<Value> {
  let content = fs::read_to_string(path).map_err(|e| {
    ConfigError::Config(format!(
      "Failed to read config file {}: {e}",
      path.display()
    ))
  })?;

  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase);
  match extension.as_deref() {
    Some("json") => Ok(serde_json::from_str(&content)?),
    Some("toml") => Ok(toml::from_str(&content)?),
    Some(other) => Err(ConfigError::UnsupportedFormat(other.to_string())),
    None => {
      Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )))
    },
  }
}

/// Merge `other` into `base`. Tables merge recursively, anything else is
/// replaced.
fn merge_values(base: &mut Value, other: Value) {
  match (base, other) {
    (Value::Object(base), Value::Object(other)) => {
      for (key, value) in other {
        match base.get_mut(&key) {
          Some(existing) => merge_values(existing, value),
          None => {
            base.insert(key, value);
          },
        }
      }
    },
    (base, other) => *base = other,
  }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Ok(true),
    "false" | "no" | "off" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'"
      )))
    },
  }
}

fn unknown_key(key: &str) -> ConfigError {
  ConfigError::Config(format!("Unknown configuration key: '{key}'"))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config file");
    path
  }

  #[test]
  fn test_partial_toml_keeps_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "plaza.toml", "[markdown]\nbreaks = false\n");

    let config = Config::from_file(&path).expect("load config");
    assert!(!config.markdown.breaks);
    assert!(config.markdown.gfm);
    assert_eq!(config.preview.forbid_tags, ["img"]);
    assert_eq!(config.build.output_dir, PathBuf::from("build"));
  }

  #[test]
  fn test_json_accepts_camel_case_flags() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
      &dir,
      "plaza.json",
      r#"{ "markdown": { "headerIds": false, "smartLists": false } }"#,
    );

    let config = Config::from_file(&path).expect("load config");
    assert!(!config.markdown.header_ids);
    assert!(!config.markdown.smart_lists);
  }

  #[test]
  fn test_later_files_override_earlier_ones() {
    let dir = TempDir::new().expect("temp dir");
    let base = write(
      &dir,
      "base.toml",
      "[markdown]\nsmartypants = true\nmangle = true\n\n[build]\njobs = 2\n",
    );
    let local = write(
      &dir,
      "local.json",
      r#"{ "markdown": { "mangle": false }, "build": { "output_dir": "out" } }"#,
    );

    let config = Config::load(&[base, local], &[]).expect("load config");
    assert!(config.markdown.smartypants);
    assert!(!config.markdown.mangle);
    assert_eq!(config.build.jobs, Some(2));
    assert_eq!(config.build.output_dir, PathBuf::from("out"));
  }

  #[test]
  fn test_overrides_apply_after_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "plaza.toml", "[markdown]\nsilent = false\n");

    let overrides = vec![
      "markdown.silent = yes".to_string(),
      "markdown.headerIds=0".to_string(),
      "preview.forbid_tags=img, iframe".to_string(),
      "build.jobs=3".to_string(),
    ];
    let config = Config::load(&[path], &overrides).expect("load config");
    assert!(config.markdown.silent);
    assert!(!config.markdown.header_ids);
    assert_eq!(config.preview.forbid_tags, ["img", "iframe"]);
    assert_eq!(config.build.jobs, Some(3));
  }

  #[test]
  fn test_bad_overrides_are_rejected() {
    let mut config = Config::default();
    for bad in ["markdown.breaks", "markdown.tables=true", "markdown.gfm=maybe"]
    {
      assert!(
        config.apply_overrides(&[bad.to_string()]).is_err(),
        "{bad} should be rejected"
      );
    }
    assert!(matches!(
      config.apply_overrides(&["build.jobs=many".to_string()]),
      Err(ConfigError::Config(_))
    ));
  }

  #[test]
  fn test_config_candidates_order() {
    let dir = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("xdg dir");
    write(&xdg, "plaza.json", "{}");
    fs::create_dir_all(dir.path().join(".config")).expect("create .config");
    write(&dir, ".config/plaza.toml", "");

    let candidates = config_candidates(
      Some(dir.path()),
      Some(xdg.path().to_path_buf()),
      Some(PathBuf::from("/home/someone")),
    );
    assert_eq!(candidates.len(), 10);
    assert_eq!(candidates[0], dir.path().join("plaza.toml"));
    assert_eq!(
      candidates[9],
      PathBuf::from("/home/someone/.config/plaza/config.json")
    );

    let found = candidates.into_iter().find(|path| path.is_file());
    assert_eq!(found, Some(dir.path().join(".config/plaza.toml")));
  }

  #[test]
  fn test_unsupported_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "plaza.yaml", "markdown: {}");

    assert!(matches!(
      Config::from_file(&path),
      Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
    ));
  }

  #[test]
  fn test_generate_default_config_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    for format in ["toml", "json"] {
      let path = dir.path().join(format!("plaza.{format}"));
      Config::generate_default_config(format, &path).expect("write config");
      let config = Config::from_file(&path).expect("load config");
      assert_eq!(config, Config::default());
    }
  }

  #[test]
  fn test_preview_sanitizer_uses_forbidden_tags() {
    let mut config = Config::default();
    config
      .apply_overrides(&["preview.forbid_tags=a".to_string()])
      .expect("valid override");

    let sanitizer = config.preview_sanitizer();
    assert_eq!(sanitizer.forbidden_tags(), ["a"]);
  }
}
