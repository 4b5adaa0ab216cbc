//! Library reference tags.
//!
//! Maps logical library names (`alpinejs`, `tailwindcss`, ...) to versioned
//! files in the static directory (`alpinejs@3.14.8.js`) and splices the
//! matching `<link>` / `<script>` tags into the compiled document.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::utils::html::{escape_attr, find_tag, insert_at};

/// Logical library name -> local asset file name.
pub type LibraryMap = BTreeMap<String, String>;

/// URL prefix the server mounts the static directory under.
pub const STATIC_PREFIX: &str = "/static/";

/// Library names in injection order: longest first, ties alphabetical.
///
/// Plugins (`alpinejs-autoanimate`) therefore load before the core library
/// they register with (`alpinejs`).
pub fn ordered_names(libs: &LibraryMap) -> Vec<&str> {
    let mut names: Vec<&str> = libs.keys().map(String::as_str).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names
}

/// One tag per `.css` / `.js` asset; other extensions are skipped.
///
/// Scripts get `defer` unless their library is listed in `blocking`.
pub fn library_tags(libs: &LibraryMap, blocking: &[String]) -> Vec<String> {
    ordered_names(libs)
        .into_iter()
        .filter_map(|name| {
            let file = &libs[name];
            let href = escape_attr(file);
            let ext = Path::new(file)
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase());
            match ext.as_deref() {
                Some("css") => Some(format!(
                    r#"<link rel="stylesheet" href="{STATIC_PREFIX}{href}">"#
                )),
                Some("js") => {
                    let is_blocking = blocking.iter().any(|b| b.eq_ignore_ascii_case(name));
                    let defer = if is_blocking { "" } else { " defer" };
                    Some(format!(
                        r#"<script src="{STATIC_PREFIX}{href}"{defer}></script>"#
                    ))
                }
                _ => None,
            }
        })
        .collect()
}

/// Insert library tags before `</head>`, else `</body>`, else at the end.
pub fn inject_libs(html: &str, libs: &LibraryMap, blocking: &[String]) -> String {
    let tags = library_tags(libs, blocking);
    if tags.is_empty() {
        return html.to_string();
    }
    let injection = tags.join("\n");

    for marker in ["</head>", "</body>"] {
        if let Some(pos) = find_tag(html, marker) {
            return insert_at(html, pos, &format!("{injection}\n"));
        }
    }
    format!("{html}{injection}")
}

/// Find `name@<version>.js` (or `.css`) in `static_dir` for every name.
///
/// The directory is created when missing. When several versions are present
/// the lexicographically first one wins. Names without a local file are
/// returned separately so the caller can report them.
pub fn discover_libs(static_dir: &Path, names: &[String]) -> io::Result<(LibraryMap, Vec<String>)> {
    fs::create_dir_all(static_dir)?;

    let mut files: Vec<String> = fs::read_dir(static_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    files.sort();

    let mut libs = LibraryMap::new();
    let mut missing = Vec::new();
    for name in names {
        let prefix = format!("{name}@");
        let found = files.iter().find(|file| {
            file.starts_with(&prefix) && (file.ends_with(".js") || file.ends_with(".css"))
        });
        match found {
            Some(file) => {
                libs.insert(name.clone(), file.clone());
            }
            None => missing.push(name.clone()),
        }
    }
    Ok((libs, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn libs(entries: &[(&str, &str)]) -> LibraryMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn blocking() -> Vec<String> {
        vec!["tailwindcss".to_string()]
    }

    #[test]
    fn test_order_longest_first_then_alphabetical() {
        let map = libs(&[
            ("alpinejs", "alpinejs@3.14.8.js"),
            ("tailwindcss", "tailwindcss@4.1.3.js"),
            ("alpinejs-autoanimate", "alpinejs-autoanimate@1.0.0.js"),
            ("zzzjs-plugin", "z.js"),
            ("aaajs-plugin", "a.js"),
        ]);
        assert_eq!(
            ordered_names(&map),
            vec![
                "alpinejs-autoanimate",
                "aaajs-plugin",
                "zzzjs-plugin",
                "tailwindcss",
                "alpinejs"
            ]
        );
    }

    #[test]
    fn test_tags_defer_and_css() {
        let map = libs(&[
            ("alpinejs", "alpinejs@3.14.8.js"),
            ("tailwindcss", "tailwindcss@4.1.3.js"),
            ("theme", "theme@1.0.0.css"),
            ("readme", "readme@1.txt"),
        ]);
        let tags = library_tags(&map, &blocking());
        assert_eq!(
            tags,
            vec![
                r#"<script src="/static/tailwindcss@4.1.3.js"></script>"#,
                r#"<script src="/static/alpinejs@3.14.8.js" defer></script>"#,
                r#"<link rel="stylesheet" href="/static/theme@1.0.0.css">"#,
            ]
        );
    }

    #[test]
    fn test_inject_before_head() {
        let map = libs(&[("alpinejs", "alpinejs@3.js")]);
        let html = "<html><head><title>x</title></head><body></body></html>";
        let out = inject_libs(html, &map, &blocking());
        assert_eq!(
            out,
            "<html><head><title>x</title><script src=\"/static/alpinejs@3.js\" defer></script>\n</head><body></body></html>"
        );
    }

    #[test]
    fn test_inject_falls_back_to_body_then_end() {
        let map = libs(&[("alpinejs", "alpinejs@3.js")]);
        let tag = r#"<script src="/static/alpinejs@3.js" defer></script>"#;

        let out = inject_libs("<body>x</body>", &map, &blocking());
        assert_eq!(out, format!("<body>x{tag}\n</body>"));

        let out = inject_libs("<p>x</p>", &map, &blocking());
        assert_eq!(out, format!("<p>x</p>{tag}"));
    }

    #[test]
    fn test_inject_empty_map_is_identity() {
        let html = "<head></head>";
        assert_eq!(inject_libs(html, &LibraryMap::new(), &blocking()), html);
    }

    #[test]
    fn test_discover_libs() {
        let dir = TempDir::new().unwrap();
        let static_dir = dir.path().join("static");
        fs::create_dir_all(&static_dir).unwrap();
        fs::write(static_dir.join("alpinejs@3.14.8.js"), "").unwrap();
        fs::write(static_dir.join("alpinejs-autoanimate@1.0.0.js"), "").unwrap();
        fs::write(static_dir.join("notes.txt"), "").unwrap();

        let names = vec![
            "alpinejs".to_string(),
            "alpinejs-autoanimate".to_string(),
            "tailwindcss".to_string(),
        ];
        let (map, missing) = discover_libs(&static_dir, &names).unwrap();

        assert_eq!(map["alpinejs"], "alpinejs@3.14.8.js");
        assert_eq!(map["alpinejs-autoanimate"], "alpinejs-autoanimate@1.0.0.js");
        assert_eq!(missing, vec!["tailwindcss".to_string()]);
    }

    #[test]
    fn test_discover_creates_static_dir() {
        let dir = TempDir::new().unwrap();
        let static_dir = dir.path().join("nested/static");
        let (map, missing) = discover_libs(&static_dir, &["alpinejs".to_string()]).unwrap();
        assert!(static_dir.is_dir());
        assert!(map.is_empty());
        assert_eq!(missing.len(), 1);
    }
}
