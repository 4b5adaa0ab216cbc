//! Recursive `<% name %>` include expansion.
//!
//! A directive is replaced by the fully resolved content of the referenced
//! file, wrapped in `<!-- BEGIN name -->` / `<!-- END name -->` comments.
//! References resolve against the directory of the file that contains the
//! directive, and get `.html` appended when they carry no extension. A
//! leading `/` does not escape that directory.
//!
//! Every file read, at any depth, lands in the dependency set. The active
//! include stack doubles as a cycle guard: a file that (transitively)
//! includes itself fails with [`TemplateError::CircularInclude`] instead of
//! recursing until the stack blows.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::error::TemplateError;
use super::loader::Vfs;
use super::script::Rewrite;
use crate::utils::path::{clean_path, join_relative};

/// `<% reference %>` with surrounding whitespace trimmed.
static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<%\s*(.*?)\s*%>").expect("include directive pattern"));

/// Result of resolving one root file.
#[derive(Debug)]
pub struct Resolved {
    pub content: String,
    pub dependencies: FxHashSet<PathBuf>,
}

/// One-shot resolver; create a fresh one per compilation.
pub struct IncludeResolver<'a> {
    vfs: &'a dyn Vfs,
    rewriter: &'a dyn Rewrite,
    default_ext: &'a str,
    max_depth: usize,
    dependencies: FxHashSet<PathBuf>,
    stack: Vec<PathBuf>,
}

impl<'a> IncludeResolver<'a> {
    /// `default_ext` is appended (with a leading dot) to extension-less
    /// references.
    pub fn new(
        vfs: &'a dyn Vfs,
        rewriter: &'a dyn Rewrite,
        default_ext: &'a str,
        max_depth: usize,
    ) -> Self {
        Self {
            vfs,
            rewriter,
            default_ext,
            max_depth,
            dependencies: FxHashSet::default(),
            stack: Vec::new(),
        }
    }

    /// Resolve `root` and every file it includes.
    pub fn resolve(mut self, root: &Path) -> Result<Resolved, TemplateError> {
        let content = self.load(root)?;
        Ok(Resolved {
            content,
            dependencies: self.dependencies,
        })
    }

    /// Load one file, expand its directives, then rewrite its scripts.
    fn load(&mut self, path: &Path) -> Result<String, TemplateError> {
        let path = clean_path(path);

        if let Some(start) = self.stack.iter().position(|p| p == &path) {
            return Err(TemplateError::CircularInclude {
                chain: self.cycle_chain(start, &path),
            });
        }
        if self.stack.len() >= self.max_depth {
            return Err(TemplateError::TooDeep {
                limit: self.max_depth,
                path,
            });
        }

        self.dependencies.insert(path.clone());
        let raw = self
            .vfs
            .read(&path)
            .map_err(|e| TemplateError::Load(path.clone(), e))?;

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.stack.push(path.clone());
        let expanded = self.expand(&raw, &dir);
        self.stack.pop();

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.rewriter.rewrite(&expanded?, &source))
    }

    /// Replace directives left to right, copying the text between them.
    fn expand(&mut self, content: &str, dir: &Path) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(content.len());
        let mut prev_end = 0;

        for caps in DIRECTIVE.captures_iter(content) {
            let (Some(whole), Some(reference)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = self.with_default_ext(reference.as_str());

            out.push_str(&content[prev_end..whole.start()]);
            let included = self
                .load(&join_relative(dir, Path::new(&name)))
                .map_err(|e| match e {
                    // A cycle is reported once, from where it was detected.
                    e @ TemplateError::CircularInclude { .. } => e,
                    e => e.included_from(name.clone()),
                })?;
            out.push_str(&format!(
                "\n<!-- BEGIN {name} -->\n{included}\n<!-- END {name} -->"
            ));
            prev_end = whole.end();
        }

        out.push_str(&content[prev_end..]);
        Ok(out)
    }

    fn with_default_ext(&self, reference: &str) -> String {
        if Path::new(reference).extension().is_some() {
            reference.to_string()
        } else {
            format!("{reference}.{}", self.default_ext.trim_start_matches('.'))
        }
    }

    /// `a.html -> b.html -> a.html` for the cycle starting at `stack[start]`.
    fn cycle_chain(&self, start: usize, repeated: &Path) -> String {
        self.stack[start..]
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(repeated))
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::loader::MemoryFs;

    /// Leaves content untouched so expansion can be asserted exactly.
    struct Identity;

    impl Rewrite for Identity {
        fn rewrite(&self, content: &str, _source: &str) -> String {
            content.to_string()
        }
    }

    fn resolve(fs: &MemoryFs, root: &str) -> Result<Resolved, TemplateError> {
        IncludeResolver::new(fs, &Identity, "html", 32).resolve(Path::new(root))
    }

    fn set(paths: &[&str]) -> FxHashSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_no_directives_is_identity() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<html><body>plain</body></html>", 1);

        let resolved = resolve(&fs, "/site/index.html").unwrap();
        assert_eq!(resolved.content, "<html><body>plain</body></html>");
        assert_eq!(resolved.dependencies, set(&["/site/index.html"]));
    }

    #[test]
    fn test_splice_with_boundary_markers() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "before<%  header  %>after", 1);
        fs.write("/site/header.html", "<h1>Hi</h1>", 1);

        let resolved = resolve(&fs, "/site/index.html").unwrap();
        assert_eq!(
            resolved.content,
            "before\n<!-- BEGIN header.html -->\n<h1>Hi</h1>\n<!-- END header.html -->after"
        );
    }

    #[test]
    fn test_missing_extension_matches_explicit() {
        let fs = MemoryFs::new();
        fs.write("/site/a.html", "<% foo %>", 1);
        fs.write("/site/b.html", "<% foo.html %>", 1);
        fs.write("/site/foo.html", "FOO", 1);

        let a = resolve(&fs, "/site/a.html").unwrap();
        let b = resolve(&fs, "/site/b.html").unwrap();
        assert_eq!(a.content, b.content);
    }

    #[test]
    fn test_explicit_extension_kept() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% style.css %>", 1);
        fs.write("/site/style.css", "body{}", 1);

        let resolved = resolve(&fs, "/site/index.html").unwrap();
        assert!(resolved.content.contains("body{}"));
        assert!(resolved.dependencies.contains(Path::new("/site/style.css")));
    }

    #[test]
    fn test_nested_includes_resolve_relative_to_includer() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% parts/layout %>", 1);
        fs.write("/site/parts/layout.html", "[<% nav %>|<% ../footer %>]", 1);
        fs.write("/site/parts/nav.html", "NAV", 1);
        fs.write("/site/footer.html", "FOOT", 1);

        let resolved = resolve(&fs, "/site/index.html").unwrap();
        assert!(resolved.content.contains("NAV"));
        assert!(resolved.content.contains("FOOT"));
        assert_eq!(
            resolved.dependencies,
            set(&[
                "/site/index.html",
                "/site/parts/layout.html",
                "/site/parts/nav.html",
                "/site/footer.html",
            ])
        );
    }

    #[test]
    fn test_leading_slash_resolves_under_includer_dir() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% /parts/nav %>", 1);
        fs.write("/site/parts/nav.html", "NAV", 1);

        let resolved = resolve(&fs, "/site/index.html").unwrap();
        assert!(resolved.content.contains("<!-- BEGIN /parts/nav.html -->\nNAV\n"));
        assert_eq!(
            resolved.dependencies,
            set(&["/site/index.html", "/site/parts/nav.html"])
        );
    }

    #[test]
    fn test_multiple_directives_left_to_right() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "1<% a %>2<% b %>3", 1);
        fs.write("/site/a.html", "A", 1);
        fs.write("/site/b.html", "B", 1);

        let content = resolve(&fs, "/site/index.html").unwrap().content;
        let a = content.find("\nA\n").unwrap();
        let b = content.find("\nB\n").unwrap();
        assert!(a < b);
        assert!(content.starts_with("1\n<!-- BEGIN a.html -->"));
        assert!(content.ends_with("<!-- END b.html -->3"));
    }

    #[test]
    fn test_same_file_twice_is_not_a_cycle() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% sep %><% sep %>", 1);
        fs.write("/site/sep.html", "<hr>", 1);

        let resolved = resolve(&fs, "/site/index.html").unwrap();
        assert_eq!(resolved.content.matches("<hr>").count(), 2);
        assert_eq!(resolved.dependencies.len(), 2);
    }

    #[test]
    fn test_missing_include_names_chain() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% layout %>", 1);
        fs.write("/site/layout.html", "<% footer %>", 1);

        let err = resolve(&fs, "/site/index.html").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("error including layout.html: error including footer.html:"));
        assert!(msg.contains("/site/footer.html"));
    }

    #[test]
    fn test_missing_root() {
        let fs = MemoryFs::new();
        let err = resolve(&fs, "/site/index.html").unwrap_err();
        assert!(matches!(err, TemplateError::Load(..)));
    }

    #[test]
    fn test_circular_include_detected() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% a %>", 1);
        fs.write("/site/a.html", "<% b %>", 1);
        fs.write("/site/b.html", "<% a %>", 1);

        let err = resolve(&fs, "/site/index.html").unwrap_err();
        match err {
            TemplateError::CircularInclude { chain } => {
                assert_eq!(chain, "a.html -> b.html -> a.html");
            }
            other => panic!("expected circular include, got {other}"),
        }
    }

    #[test]
    fn test_self_include_detected() {
        let fs = MemoryFs::new();
        fs.write("/site/index.html", "<% index %>", 1);

        let err = resolve(&fs, "/site/index.html").unwrap_err();
        assert!(matches!(err, TemplateError::CircularInclude { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let fs = MemoryFs::new();
        fs.write("/site/l0.html", "<% l1 %>", 1);
        fs.write("/site/l1.html", "<% l2 %>", 1);
        fs.write("/site/l2.html", "<% l3 %>", 1);
        fs.write("/site/l3.html", "end", 1);

        let ok = IncludeResolver::new(&fs, &Identity, "html", 4).resolve(Path::new("/site/l0.html"));
        assert!(ok.is_ok());

        let err = IncludeResolver::new(&fs, &Identity, "html", 3)
            .resolve(Path::new("/site/l0.html"))
            .unwrap_err();
        assert!(matches!(err.root_cause(), TemplateError::TooDeep { limit: 3, .. }));
    }
}
