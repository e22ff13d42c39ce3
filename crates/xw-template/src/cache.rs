//! The process-wide, mtime-keyed file cache that backs [`crate::parser`]'s
//! template-splice engine.
//!
//! Entries are reference-counted so a template can be shared by every
//! document that links to it. The top-level map is guarded by a
//! [`parking_lot::RwLock`]; an individual entry's own lock is only ever held
//! across in-memory field updates, never across file I/O — reads happen
//! before the lock is taken, per the concurrency model this cache follows.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::ParseResult;
use crate::fs_util::{self, normalize_path};
use crate::options::ParserOptions;
use crate::parser::Parser;

/// A single cached document. Holds the rendered content, the source file's
/// modification time at the moment it was parsed, and — when the document
/// declared a `#template` header — a shared link to the template's own
/// cache entry plus the template's modification time as last observed.
pub struct CacheEntry {
    pub path: PathBuf,
    pub content: String,
    pub mtime: SystemTime,
    pub template: Option<Arc<RwLock<CacheEntry>>>,
    pub template_mtime: Option<SystemTime>,
    /// Byte offset into this entry's own `content`, recorded when *this*
    /// entry was parsed as a template (it contained a `template::template`
    /// element). A document that links to this entry is spliced in at that
    /// offset by [`crate::template::export_copy`].
    pub template_chunk_split: Option<usize>,
}

impl CacheEntry {
    fn fresh(path: PathBuf, content: String, mtime: SystemTime) -> Self {
        Self {
            path,
            content,
            mtime,
            template: None,
            template_mtime: None,
            template_chunk_split: None,
        }
    }
}

#[derive(Default)]
pub struct Cache {
    map: RwLock<FxHashMap<PathBuf, Arc<RwLock<CacheEntry>>>>,
}

impl Cache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns whether re-parsing `path` is necessary: the entry is absent,
    /// the file has changed since it was cached, or a linked template has
    /// changed since it was last resolved.
    pub fn needs_update(&self, path: &Path) -> bool {
        let key = normalize_path(path);
        let Some(entry) = self.map.read().get(&key).cloned() else {
            log::trace!(target: "xw_template::cache", "cache miss for {}", key.display());
            return true;
        };

        let entry = entry.read();
        let Ok(on_disk) = fs_util::modified(&entry.path) else {
            return true;
        };
        if on_disk != entry.mtime {
            log::trace!(target: "xw_template::cache", "{} is stale", key.display());
            return true;
        }

        if let (Some(template), Some(recorded)) = (&entry.template, entry.template_mtime) {
            if let Ok(template_on_disk) = fs_util::modified(&template.read().path) {
                if template_on_disk != recorded {
                    log::trace!(target: "xw_template::cache", "template for {} is stale", key.display());
                    return true;
                }
            }
        }

        false
    }

    /// Returns a document's cached entry, parsing the file (and resolving
    /// any `#template` header it declares) on a cache miss or staleness.
    /// Equivalent to `from_file_checked(path, true)`.
    pub fn from_file(self: &Arc<Self>, path: &Path) -> ParseResult<Arc<RwLock<CacheEntry>>> {
        self.from_file_checked(path, true)
    }

    /// As [`Cache::from_file`], but when `check_cache` is false the document
    /// (and, if it links one, its template) is always re-parsed from disk,
    /// ignoring any cached entry.
    pub fn from_file_checked(
        self: &Arc<Self>,
        path: &Path,
        check_cache: bool,
    ) -> ParseResult<Arc<RwLock<CacheEntry>>> {
        let key = normalize_path(path);

        if check_cache {
            if let Some(existing) = self.map.read().get(&key).cloned() {
                let document_stale = {
                    let entry = existing.read();
                    fs_util::modified(&entry.path)
                        .map(|on_disk| on_disk != entry.mtime)
                        .unwrap_or(true)
                };

                if !document_stale {
                    let template_stale = {
                        let entry = existing.read();
                        match (&entry.template, entry.template_mtime) {
                            (Some(template), Some(recorded)) => fs_util::modified(&template.read().path)
                                .map(|on_disk| on_disk != recorded)
                                .unwrap_or(true),
                            _ => false,
                        }
                    };

                    if !template_stale {
                        return Ok(existing);
                    }

                    log::trace!(
                        target: "xw_template::cache",
                        "{} is current but its template is stale, re-resolving template only",
                        key.display()
                    );
                    self.reresolve_template(&existing)?;
                    return Ok(existing);
                }
            }
        }

        let bytes = fs_util::read_file_checked(&key)?;
        let mtime = fs_util::modified(&key)?;

        let entry = Arc::new(RwLock::new(CacheEntry::fresh(
            key.clone(),
            String::new(),
            mtime,
        )));
        self.map.write().insert(key.clone(), entry.clone());

        let root_path = key
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let options = ParserOptions::<()>::new(true);
        let mut parser = Parser::new(options);
        parser.enable_template_resolution(self.clone(), entry.clone(), root_path);

        let mut content = String::new();
        let mut user = ();
        parser.write(&bytes, Some(&mut content), &mut user)?;
        parser.end(&mut content, &mut user);

        entry.write().content = content;

        Ok(entry)
    }

    /// Re-parses only the template linked from `entry`, leaving the
    /// document's own cached content untouched.
    fn reresolve_template(
        self: &Arc<Self>,
        entry: &Arc<RwLock<CacheEntry>>,
    ) -> ParseResult<()> {
        let template_path = {
            let guard = entry.read();
            let Some(template) = &guard.template else {
                return Ok(());
            };
            let path = template.read().path.clone();
            path
        };

        let fresh_template = self.from_file_checked(&template_path, false)?;
        let template_mtime = fresh_template.read().mtime;

        let mut entry = entry.write();
        entry.template = Some(fresh_template);
        entry.template_mtime = Some(template_mtime);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn reparses_after_modification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xw");
        fs::write(&path, "<p>one</p>").unwrap();

        let cache = Cache::new();
        let entry = cache.from_file(&path).unwrap();
        assert!(entry.read().content.contains("one"));
        assert!(!cache.needs_update(&path));

        thread::sleep(Duration::from_millis(10));
        fs::write(&path, "<p>two</p>").unwrap();
        let _ = filetime_touch(&path);

        assert!(cache.needs_update(&path));
        let entry = cache.from_file(&path).unwrap();
        assert!(entry.read().content.contains("two"));
    }

    /// Forces a modification-time bump on filesystems with coarse mtime
    /// resolution, where two writes within the same tick can be
    /// indistinguishable.
    fn filetime_touch(path: &std::path::Path) -> std::io::Result<()> {
        let now = SystemTime::now();
        let file = fs::File::options().write(true).open(path)?;
        file.set_modified(now)
    }

    #[test]
    fn missing_file_reports_stale() {
        let cache = Cache::new();
        assert!(cache.needs_update(std::path::Path::new("/nonexistent/path/doc.xw")));
    }

    #[test]
    fn template_header_links_the_resolved_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.xw"),
            "<template::template></template::template><header>H</header>",
        )
        .unwrap();
        fs::write(
            dir.path().join("page.xw"),
            "#template base.xw\n<body>hello</body>",
        )
        .unwrap();

        let cache = Cache::new();
        let entry = cache.from_file(&dir.path().join("page.xw")).unwrap();
        let entry = entry.read();
        assert!(entry.content.contains("<body>hello</body>"));
        let template = entry.template.as_ref().expect("template should resolve");
        assert!(template.read().content.contains("<header>H</header>"));
    }

    #[test]
    fn stale_template_only_reresolves_template_not_document() {
        let dir = tempfile::tempdir().unwrap();
        let base_path = dir.path().join("base.xw");
        let page_path = dir.path().join("page.xw");
        fs::write(
            &base_path,
            "<template::template></template::template><header>old</header>",
        )
        .unwrap();
        fs::write(&page_path, "#template base.xw\n<body>hello</body>").unwrap();

        let cache = Cache::new();
        let page_entry = cache.from_file(&page_path).unwrap();
        let original_template = page_entry.read().template.clone().unwrap();
        assert!(original_template.read().content.contains("old"));

        thread::sleep(Duration::from_millis(10));
        fs::write(
            &base_path,
            "<template::template></template::template><header>new</header>",
        )
        .unwrap();
        let _ = filetime_touch(&base_path);

        assert!(cache.needs_update(&page_path));
        let refreshed = cache.from_file(&page_path).unwrap();

        assert!(Arc::ptr_eq(&page_entry, &refreshed));
        assert!(refreshed.read().content.contains("<body>hello</body>"));
        let new_template = refreshed.read().template.clone().unwrap();
        assert!(new_template.read().content.contains("new"));
        assert!(!Arc::ptr_eq(&original_template, &new_template));
    }

    #[test]
    fn check_cache_false_forces_reparse_even_when_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xw");
        fs::write(&path, "<p #x>stable</p>").unwrap();

        let cache = Cache::new();
        let first = cache.from_file(&path).unwrap();
        let second = cache.from_file_checked(&path, false).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.read().content, second.read().content);
    }

    #[test]
    fn repeated_from_file_is_idempotent_when_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xw");
        fs::write(&path, "<p #x>stable</p>").unwrap();

        let cache = Cache::new();
        let first = cache.from_file(&path).unwrap().read().content.clone();
        let second = cache.from_file(&path).unwrap().read().content.clone();
        assert_eq!(first, second);
    }
}
