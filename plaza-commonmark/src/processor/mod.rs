//! Markdown processing module.
//!
//! # Architecture
//!
//! The processor module is organized into focused submodules:
//!
//! - [`core`]: Main processor implementation and rendering pipeline
//! - [`process`]: Free-standing entry points with error recovery
//! - [`extensions`]: Blank-line runs and email mangling on top of comrak
//! - [`types`]: Options, their builder and the processor struct
pub mod core;
pub mod extensions;
pub mod process;
pub mod types;

pub use extensions::{
  EXTRA_BREAK_CLASS,
  extra_break_count,
  mangle_email,
  match_blank_run,
  render_blank_run,
};
pub use process::{error_page, render_markdown, sanitize_markdown};
pub use types::{MarkdownProcessor, ParseOptions, ParseOptionsBuilder};
