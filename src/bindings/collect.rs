//! Header include closure.
//!
//! Starting from an entry header, follows `#include <prefix...>` directives
//! that point back into the library and returns every header reached.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::util::fs::read_lossy;

/// Headers already visited during a traversal.
///
/// Owned by the caller so separate runs never share state.
#[derive(Debug, Default)]
pub struct TraversalContext {
    visited: HashSet<PathBuf>,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` has been visited.
    pub fn is_visited(&self, path: &Path) -> bool {
        self.visited.contains(path)
    }

    /// Number of headers visited so far.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Mark `path` visited. Returns false if it already was.
    fn visit(&mut self, path: &Path) -> bool {
        self.visited.insert(path.to_path_buf())
    }
}

/// Discovers the library's headers by following its own include directives.
#[derive(Debug, Clone)]
pub struct HeaderCollector {
    /// `vips/` in `#include <vips/foo.h>`
    include_prefix: String,
    /// Search directories, tried in order
    search_dirs: Vec<PathBuf>,
}

impl HeaderCollector {
    /// Create a collector for headers included as `<{prefix}name.h>`.
    pub fn new(include_prefix: impl Into<String>, search_dirs: Vec<PathBuf>) -> Self {
        HeaderCollector {
            include_prefix: include_prefix.into(),
            search_dirs,
        }
    }

    /// Collect `entry` and every header it transitively includes.
    ///
    /// Nonexistent and unreadable files are skipped without error. A path
    /// already present in `ctx` is not revisited, so include cycles end.
    pub fn collect(&self, entry: &Path, ctx: &mut TraversalContext) -> Vec<PathBuf> {
        let mut headers = Vec::new();
        let mut queue = vec![entry.to_path_buf()];

        while let Some(path) = queue.pop() {
            if !path.is_file() || !ctx.visit(&path) {
                continue;
            }

            let content = match read_lossy(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!("skipping unreadable header {}: {}", path.display(), e);
                    continue;
                }
            };

            for include in content.lines().filter_map(|line| self.included_header(line)) {
                if let Some(found) = self.resolve(include) {
                    queue.push(found);
                } else {
                    tracing::debug!("unresolved include <{}{}>", self.include_prefix, include);
                }
            }

            headers.push(path);
        }

        headers
    }

    /// The header name of a library include directive, prefix stripped.
    fn included_header<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.trim().strip_prefix("#include")?.trim_start();
        let rest = rest.strip_prefix('<')?.strip_prefix(self.include_prefix.as_str())?;
        let end = rest.find('>')?;
        Some(&rest[..end])
    }

    /// First search directory containing `header`.
    fn resolve(&self, header: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(header))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_collects_transitive_includes() {
        let tmp = TempDir::new().unwrap();
        let inc = tmp.path();
        let entry = write(inc, "vips.h", "#include <vips/basic.h>\n#include <vips/image.h>\n");
        write(inc, "basic.h", "int x;\n");
        write(inc, "image.h", "#include <vips/object.h>\n");
        write(inc, "object.h", "");

        let collector = HeaderCollector::new("vips/", vec![inc.to_path_buf()]);
        let mut ctx = TraversalContext::new();
        let headers = collector.collect(&entry, &mut ctx);

        let names: Vec<_> = headers
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // LIFO queue, each header appended after its own scan
        assert_eq!(names, vec!["vips.h", "image.h", "object.h", "basic.h"]);
        assert_eq!(ctx.len(), 4);
    }

    #[test]
    fn test_ignores_foreign_includes() {
        let tmp = TempDir::new().unwrap();
        let inc = tmp.path();
        let entry = write(
            inc,
            "vips.h",
            "#include <glib.h>\n#include \"local.h\"\n#include <gobject/gobject.h>\n",
        );
        write(inc, "glib.h", "");
        write(inc, "local.h", "");

        let collector = HeaderCollector::new("vips/", vec![inc.to_path_buf()]);
        let headers = collector.collect(&entry, &mut TraversalContext::new());
        assert_eq!(headers, vec![entry]);
    }

    #[test]
    fn test_include_cycle_terminates() {
        let tmp = TempDir::new().unwrap();
        let inc = tmp.path();
        let entry = write(inc, "a.h", "#include <vips/b.h>\n");
        write(inc, "b.h", "#include <vips/a.h>\n#include <vips/b.h>\n");

        let collector = HeaderCollector::new("vips/", vec![inc.to_path_buf()]);
        let mut ctx = TraversalContext::new();
        let headers = collector.collect(&entry, &mut ctx);

        assert_eq!(headers.len(), 2);
        assert!(ctx.is_visited(&entry));
        let unique: HashSet<_> = headers.iter().collect();
        assert_eq!(unique.len(), headers.len());
    }

    #[test]
    fn test_missing_entry_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let collector = HeaderCollector::new("vips/", vec![tmp.path().to_path_buf()]);
        let mut ctx = TraversalContext::new();

        let headers = collector.collect(&tmp.path().join("nope.h"), &mut ctx);
        assert!(headers.is_empty());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_first_search_dir_wins() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();

        let entry = write(tmp.path(), "vips.h", "#include <vips/dup.h>\n");
        write(&first, "dup.h", "");
        write(&second, "dup.h", "");

        let collector = HeaderCollector::new("vips/", vec![first.clone(), second]);
        let headers = collector.collect(&entry, &mut TraversalContext::new());
        assert_eq!(headers, vec![entry, first.join("dup.h")]);
    }

    #[test]
    fn test_shared_context_skips_seen_headers() {
        let tmp = TempDir::new().unwrap();
        let inc = tmp.path();
        let entry = write(inc, "vips.h", "#include <vips/basic.h>\n");
        write(inc, "basic.h", "");

        let collector = HeaderCollector::new("vips/", vec![inc.to_path_buf()]);
        let mut ctx = TraversalContext::new();
        assert_eq!(collector.collect(&entry, &mut ctx).len(), 2);
        assert!(collector.collect(&entry, &mut ctx).is_empty());
    }

    #[test]
    fn test_included_header_parsing() {
        let collector = HeaderCollector::new("vips/", Vec::new());
        assert_eq!(collector.included_header("#include <vips/image.h>"), Some("image.h"));
        assert_eq!(collector.included_header("  #include  <vips/a/b.h> // x"), Some("a/b.h"));
        assert_eq!(collector.included_header("#include <glib.h>"), None);
        assert_eq!(collector.included_header("/* #include <vips/x.h> */"), None);
    }
}
