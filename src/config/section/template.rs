//! `[template]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [template]
//! root = "index.html"         # Root template, relative to the config file
//! check_interval_ms = 2000    # Minimum time between two freshness checks
//! max_depth = 32              # Include nesting limit
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::template::DEFAULT_CHECK_INTERVAL;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Root template file.
    pub root: PathBuf,

    /// Freshness throttle window in milliseconds.
    pub check_interval_ms: u64,

    /// Maximum include nesting.
    pub max_depth: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("index.html"),
            check_interval_ms: DEFAULT_CHECK_INTERVAL.as_millis() as u64,
            max_depth: 32,
        }
    }
}

impl TemplateConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}
