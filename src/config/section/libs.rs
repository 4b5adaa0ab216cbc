//! `[libs]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [libs]
//! static_dir = "static"                                    # name@version.js lives here
//! names = ["alpinejs", "tailwindcss", "alpinejs-autoanimate"]
//! blocking = ["tailwindcss"]                               # emitted without `defer`
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibsConfig {
    /// Directory holding versioned library files, also served under `/static/`.
    pub static_dir: PathBuf,

    /// Logical library names to look up in `static_dir`.
    pub names: Vec<String>,

    /// Libraries whose script tags must not be deferred.
    pub blocking: Vec<String>,
}

impl Default for LibsConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            names: vec![
                "alpinejs".into(),
                "tailwindcss".into(),
                "alpinejs-autoanimate".into(),
            ],
            blocking: vec!["tailwindcss".into()],
        }
    }
}
