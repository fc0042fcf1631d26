use crate::error::{ConfigError, ConfigResult};

/// Default configuration in TOML, commented so that a fresh `plaza init`
/// explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# Plaza Configuration File

[markdown]
# Treat single newlines as line breaks (only with gfm)
breaks = true

# GitHub Flavored Markdown: tables, strikethrough, task lists, autolinks
gfm = true

# Give headings id attributes for anchors and tables of contents
header_ids = true

# Entity-encode email autolinks
mangle = false

# Original markdown only; turns gfm off
pedantic = false

# Escape raw HTML in the source
sanitize = false

# Render an error page instead of failing
silent = false

# Accepted for compatibility, lists always follow CommonMark
smart_lists = true

# Typographic quotes, dashes and ellipses
smartypants = false

# Self-close void elements (<br />)
xhtml = false

[preview]
# Tags removed from previews
forbid_tags = ["img"]

[build]
# Directory searched for *.md files
input_dir = "posts"

# Directory the rendered HTML is written to
output_dir = "build"

# Number of threads (defaults to the number of CPU cores)
# jobs = 4
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "markdown": {
    "breaks": true,
    "gfm": true,
    "header_ids": true,
    "mangle": false,
    "pedantic": false,
    "sanitize": false,
    "silent": false,
    "smart_lists": true,
    "smartypants": false,
    "xhtml": false
  },
  "preview": {
    "forbid_tags": ["img"]
  },
  "build": {
    "input_dir": "posts",
    "output_dir": "build"
  }
}
"#;

/// Template for the given format name, case-insensitively.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for anything but `toml` and
/// `json`.
pub fn get_template(format: &str) -> ConfigResult<&'static str> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
  }
}
