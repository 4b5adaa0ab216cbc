//! Compilation of the root template into one document.

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::TemplateError;
use super::include::IncludeResolver;
use super::libs::{LibraryMap, inject_libs};
use super::loader::Vfs;
use super::script::Rewrite;
use crate::utils::date::DateTimeUtc;

/// Version reported when no dependency could be stat'ed.
pub const UNKNOWN_VERSION: &str = "0001-01-01 00:00:00";

/// Immutable result of one successful compilation.
///
/// Published as a whole, so `body`, `version` and `dependencies` always
/// describe the same compilation.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub body: String,
    /// Client-facing stamp of `modified`, second precision.
    pub version: String,
    /// Newest dependency mtime at full precision; staleness compares this.
    pub modified: Option<SystemTime>,
    pub dependencies: FxHashSet<PathBuf>,
}

/// Compilation knobs, usually taken from the `[template]` and `[libs]`
/// config sections.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub default_ext: String,
    pub max_depth: usize,
    pub blocking_libs: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_ext: "html".to_string(),
            max_depth: 32,
            blocking_libs: vec!["tailwindcss".to_string()],
        }
    }
}

/// Resolves includes, rewrites scripts and injects library tags.
pub struct Compiler {
    root: PathBuf,
    libs: LibraryMap,
    options: CompileOptions,
    vfs: Arc<dyn Vfs>,
    rewriter: Box<dyn Rewrite>,
}

impl Compiler {
    pub fn new(
        root: impl Into<PathBuf>,
        libs: LibraryMap,
        options: CompileOptions,
        vfs: Arc<dyn Vfs>,
        rewriter: Box<dyn Rewrite>,
    ) -> Self {
        Self {
            root: root.into(),
            libs,
            options,
            vfs,
            rewriter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn vfs(&self) -> &dyn Vfs {
        self.vfs.as_ref()
    }

    /// Full compilation from the root file; version derived from the fresh
    /// dependency set.
    pub fn compile(&self) -> Result<CompiledTemplate, TemplateError> {
        let resolved = IncludeResolver::new(
            self.vfs.as_ref(),
            self.rewriter.as_ref(),
            &self.options.default_ext,
            self.options.max_depth,
        )
        .resolve(&self.root)?;

        let body = inject_libs(&resolved.content, &self.libs, &self.options.blocking_libs);
        let modified = newest_mtime(self.vfs.as_ref(), &resolved.dependencies);

        Ok(CompiledTemplate {
            body,
            version: format_version(modified),
            modified,
            dependencies: resolved.dependencies,
        })
    }
}

/// Newest modification time across `deps`.
///
/// Files that cannot be stat'ed (deleted, permissions) are skipped.
pub fn newest_mtime<'a>(
    vfs: &dyn Vfs,
    deps: impl IntoIterator<Item = &'a PathBuf>,
) -> Option<SystemTime> {
    deps.into_iter()
        .filter_map(|path| vfs.mtime(path).ok())
        .max()
}

/// Version stamp for a newest mtime.
pub fn format_version(modified: Option<SystemTime>) -> String {
    match modified {
        Some(time) => DateTimeUtc::from_system_time(time).to_datetime(),
        None => UNKNOWN_VERSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::loader::MemoryFs;
    use crate::template::script::ScriptRewriter;

    fn compiler(fs: Arc<MemoryFs>, libs: LibraryMap) -> Compiler {
        Compiler::new(
            "/site/index.html",
            libs,
            CompileOptions::default(),
            fs,
            Box::new(ScriptRewriter),
        )
    }

    #[test]
    fn test_compile_resolves_rewrites_and_injects() {
        let fs = Arc::new(MemoryFs::new());
        fs.write(
            "/site/index.html",
            "<html><head></head><body><% app %></body></html>",
            100,
        );
        fs.write(
            "/site/app.html",
            r#"<div x-data="todoApp"></div><script x-data="todoApp">({ todos: [] })</script>"#,
            200,
        );
        let mut libs = LibraryMap::new();
        libs.insert("alpinejs".into(), "alpinejs@3.14.8.js".into());

        let compiled = compiler(fs, libs).compile().unwrap();

        assert!(compiled.body.contains("<!-- BEGIN app.html -->"));
        assert!(compiled.body.contains("Alpine.data('todoApp'"));
        assert!(compiled.body.contains("//# sourceURL=app.html"));
        assert!(
            compiled
                .body
                .contains("<script src=\"/static/alpinejs@3.14.8.js\" defer></script>\n</head>")
        );
        assert_eq!(compiled.version, "1970-01-01 00:03:20");
        assert_eq!(compiled.dependencies.len(), 2);
    }

    #[test]
    fn test_included_scripts_annotated_once_with_their_own_file() {
        let fs = Arc::new(MemoryFs::new());
        fs.write("/site/index.html", "<script>a()</script><% part %>", 1);
        fs.write("/site/part.html", "<script>b()</script>", 1);

        let body = compiler(fs, LibraryMap::new()).compile().unwrap().body;
        assert!(body.contains("<script>\n//# sourceURL=index.html\na()</script>"));
        assert!(body.contains("<script>\n//# sourceURL=part.html\nb()</script>"));
        assert_eq!(body.matches("sourceURL").count(), 2);
    }

    #[test]
    fn test_version_skips_unreadable() {
        let fs = MemoryFs::new();
        fs.write("/a.html", "", 60);
        let deps = vec![PathBuf::from("/a.html"), PathBuf::from("/gone.html")];
        assert_eq!(
            format_version(newest_mtime(&fs, &deps)),
            "1970-01-01 00:01:00"
        );
    }

    #[test]
    fn test_version_empty() {
        let fs = MemoryFs::new();
        let deps: Vec<PathBuf> = Vec::new();
        assert_eq!(newest_mtime(&fs, &deps), None);
        assert_eq!(format_version(None), UNKNOWN_VERSION);
    }
}
