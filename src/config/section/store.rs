//! `[store]` section configuration.
//!
//! ```toml
//! [store]
//! path = "data.json"     # JSON file the todo list is persisted to
//! max_todos = 150        # Creation is refused beyond this count
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub max_todos: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data.json"),
            max_todos: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_store_config() {
        let config = test_parse_config("[store]\nmax_todos = 10");
        assert_eq!(config.store.max_todos, 10);
        assert_eq!(config.store.path, std::path::PathBuf::from("data.json"));
    }
}
