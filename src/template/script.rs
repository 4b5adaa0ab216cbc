//! Script block rewriting.
//!
//! Two passes over a loaded file:
//!
//! 1. `<script x-data="name">BODY</script>` becomes a deferred
//!    `Alpine.data('name', () => BODY)` registration run on `alpine:init`.
//! 2. Every inline `<script>` gets a `//# sourceURL=<file>` comment right after
//!    its opening tag so browser debuggers show the originating file.
//!
//! Both are plain regex substitutions. Callers only see [`Rewrite`], so a real
//! markup parser can replace them without touching the compiler.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Text-to-text transformation applied to each loaded template file.
pub trait Rewrite: Send + Sync {
    /// Rewrite `content`, which was loaded from the file named `source`.
    fn rewrite(&self, content: &str, source: &str) -> String;
}

/// Owning script blocks: attributes may surround `x-data`, body spans lines,
/// tag names match in any case like [`SCRIPT_OPEN`].
static OWNED_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script([^>]*)x-data="([^"]+)"([^>]*)>(.*?)</script>"#)
        .expect("owned script pattern")
});

/// Opening tag of any script block.
static SCRIPT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script(\s[^>]*)?>").expect("script open pattern"));

const SOURCE_URL_PREFIX: &str = "\n//# sourceURL=";

/// Regex-based [`Rewrite`] for Alpine.js components.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptRewriter;

impl Rewrite for ScriptRewriter {
    fn rewrite(&self, content: &str, source: &str) -> String {
        let registered = register_components(content);
        annotate_source(&registered, source)
    }
}

/// Wrap every `x-data` script body in an `Alpine.data` registration.
pub fn register_components(content: &str) -> String {
    OWNED_SCRIPT
        .replace_all(content, |caps: &Captures| {
            format!(
                "<script> document.addEventListener('alpine:init', () => {{ Alpine.data('{}', () => \n{} ) }});\n</script>",
                &caps[2], &caps[4]
            )
        })
        .into_owned()
}

/// Insert a `sourceURL` comment after each inline script's opening tag.
///
/// External scripts (`src=`) and blocks already annotated by an included file
/// are left alone.
pub fn annotate_source(content: &str, source: &str) -> String {
    let comment = format!("{SOURCE_URL_PREFIX}{source}\n");
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for caps in SCRIPT_OPEN.captures_iter(content) {
        let Some(tag) = caps.get(0) else { continue };
        out.push_str(&content[last..tag.end()]);
        last = tag.end();

        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let external = attrs.to_ascii_lowercase().contains("src=");
        let annotated = content[tag.end()..].starts_with(SOURCE_URL_PREFIX);
        if !external && !annotated {
            out.push_str(&comment);
        }
    }
    out.push_str(&content[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_component() {
        let html = r#"<script x-data="todoApp">({ todos: [] })</script>"#;
        let out = register_components(html);
        assert_eq!(
            out,
            "<script> document.addEventListener('alpine:init', () => { Alpine.data('todoApp', () => \n({ todos: [] }) ) });\n</script>"
        );
    }

    #[test]
    fn test_register_tolerates_surrounding_attributes() {
        let html = r#"<script type="text/javascript" x-data="counter" defer>
({
  count: 0,
  inc() { if (this.count < 10 && this.count > -1) this.count++ }
})
</script>"#;
        let out = register_components(html);
        assert!(out.contains("Alpine.data('counter', () => "));
        assert!(out.contains("this.count < 10 && this.count > -1"));
        assert!(!out.contains("x-data"));
        assert!(!out.contains("defer"));
    }

    #[test]
    fn test_register_is_non_greedy() {
        let html = concat!(
            r#"<script x-data="a">({ a: 1 })</script>"#,
            "<p>between</p>",
            r#"<script x-data="b">({ b: 2 })</script>"#,
        );
        let out = register_components(html);
        assert!(out.contains("Alpine.data('a', () => \n({ a: 1 }) )"));
        assert!(out.contains("Alpine.data('b', () => \n({ b: 2 }) )"));
        assert!(out.contains("<p>between</p>"));
    }

    #[test]
    fn test_register_uppercase_tags() {
        let html = r#"<SCRIPT x-data="Shout">({ loud: true })</Script>"#;
        let out = ScriptRewriter.rewrite(html, "page.html");
        assert!(out.contains("Alpine.data('Shout', () => \n({ loud: true }) )"));
        assert_eq!(out.matches("//# sourceURL=page.html").count(), 1);
    }

    #[test]
    fn test_non_script_x_data_untouched() {
        let html = r#"<div x-data="todoApp"><span x-text="count"></span></div>"#;
        assert_eq!(register_components(html), html);
    }

    #[test]
    fn test_annotate_plain_and_attributed_scripts() {
        let html = r#"<script>one()</script><script type="module">two()</script>"#;
        let out = annotate_source(html, "index.html");
        assert_eq!(
            out,
            "<script>\n//# sourceURL=index.html\none()</script>\
             <script type=\"module\">\n//# sourceURL=index.html\ntwo()</script>"
        );
    }

    #[test]
    fn test_annotate_skips_external_and_annotated() {
        let html = "<script src=\"/static/a.js\" defer></script><script>\n//# sourceURL=part.html\nx()</script>";
        assert_eq!(annotate_source(html, "index.html"), html);
    }

    #[test]
    fn test_annotate_ignores_similar_tags() {
        let html = "<scripts>not a script</scripts><noscript>x</noscript>";
        assert_eq!(annotate_source(html, "index.html"), html);
    }

    #[test]
    fn test_rewriter_covers_owned_and_plain_blocks() {
        let html = concat!(
            r#"<script x-data="first">({ a: 1 })</script>"#,
            r#"<script x-data="second">({ b: 2 })</script>"#,
            "<script>console.log('plain')</script>",
        );
        let out = ScriptRewriter.rewrite(html, "page.html");

        assert_eq!(out.matches("Alpine.data(").count(), 2);
        assert_eq!(out.matches("//# sourceURL=page.html").count(), 3);
        assert!(out.contains("<script>\n//# sourceURL=page.html\nconsole.log('plain')</script>"));
    }
}
