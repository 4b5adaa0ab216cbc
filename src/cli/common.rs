//! Common utilities shared across CLI commands.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::template::{
    CompileOptions, Compiler, DiskFs, ScriptRewriter, SystemClock, Template, discover_libs,
};
use crate::{debug, log};

/// Discover local libraries and compile the root template.
///
/// Libraries without a local `name@version` file are reported and skipped.
pub fn load_template(config: &AppConfig) -> Result<Template> {
    let (libs, missing) = discover_libs(&config.libs.static_dir, &config.libs.names)
        .with_context(|| {
            format!(
                "Failed to scan static directory {}",
                config.libs.static_dir.display()
            )
        })?;

    for name in &missing {
        log!(
            "warning";
            "no local file for library `{}` in {} (expected {}@<version>.js)",
            name,
            config.libs.static_dir.display(),
            name
        );
    }
    for (name, file) in &libs {
        debug!("libs"; "{} -> {}", name, file);
    }

    let options = CompileOptions {
        max_depth: config.template.max_depth,
        blocking_libs: config.libs.blocking.clone(),
        ..CompileOptions::default()
    };
    let compiler = Compiler::new(
        config.template.root.clone(),
        libs,
        options,
        Arc::new(DiskFs),
        Box::new(ScriptRewriter),
    );

    Template::new(compiler, Arc::new(SystemClock), config.template.check_interval()).with_context(
        || {
            format!(
                "Failed to compile template {}",
                config.template.root.display()
            )
        },
    )
}
