//! Single-pass parser and template-splice engine for the xw HTML-superset
//! format: shorthand attributes, `{{ }}` reactive interpolation, and
//! `scope::tag` template directives, backed by an mtime-keyed file cache.

mod bytes;
mod cache;
mod elements;
mod error;
mod fs_util;
mod js_compiler;
mod macros;
mod options;
mod parser;
mod template;

pub use cache::{Cache, CacheEntry};
pub use error::{ParseError, ParseResult};
pub use options::{Callbacks, ParserOptions};
pub use parser::Parser;
pub use template::export_copy;

use std::path::Path;
use std::sync::Arc;

/// A convenience façade bundling a [`Cache`] with the knowledge of how to
/// turn a cached entry into final, template-spliced HTML.
pub struct TemplateEngine {
    cache: Arc<Cache>,
    header: String,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self {
            cache: Cache::new(),
            header: String::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Whether `path`'s cached rendering (if any) is out of date.
    pub fn needs_update(&self, path: &Path) -> bool {
        self.cache.needs_update(path)
    }

    /// Parses (or reuses the cached parse of) `path`, resolving any linked
    /// template, and returns the final spliced HTML.
    pub fn export_copy(&self, path: &Path) -> ParseResult<String> {
        let entry = self.cache.from_file(path)?;
        let entry = entry.read();
        Ok(template::export_copy(&entry, &self.header))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
