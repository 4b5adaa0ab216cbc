//! Embedded client resources.
//!
//! `helpers.js` is minified by `build.rs` into `OUT_DIR` and spliced into
//! every rendered page together with the component data.
//!
//! ```ignore
//! use embed::serve::{BOOTSTRAP, BootstrapVars};
//!
//! let block = BOOTSTRAP.render(&BootstrapVars { component_data: "{}" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for the page bootstrap block.
    pub struct BootstrapVars<'a> {
        /// Already serialized, script-safe JSON object.
        pub component_data: &'a str,
    }

    impl TemplateVars for BootstrapVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replacen("__JT_COMPONENT_DATA__", self.component_data, 1)
        }
    }

    /// Minified client helpers (`$component`, `$api`).
    #[cfg(test)]
    pub const HELPERS_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/helpers.min.js"));

    /// Data + helpers block inserted before `</body>`.
    pub const BOOTSTRAP: Template<BootstrapVars<'static>> = Template::new(concat!(
        "\n<script>\n",
        "\t//# sourceURL=helpers.js\n",
        "\t// Set component data for Alpine\n",
        "\twindow._componentData = __JT_COMPONENT_DATA__;\n",
        include_str!(concat!(env!("OUT_DIR"), "/helpers.min.js")),
        "\n</script>\n",
    ));
}
