//! One-shot compilation for inspecting the compiled document.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::common::load_template;
use crate::config::AppConfig;
use crate::logger;
use crate::template::{Payload, Template, WriteSink};

/// Compile the root template and write it to `output`, or stdout.
pub fn build(config: &AppConfig, output: Option<&Path>, render: bool) -> Result<()> {
    let template = load_template(config)?;
    let document = document(&template, render)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let snapshot = template.snapshot();
            logger::status_success(&format!(
                "{} ({} files, version {})",
                path.display(),
                snapshot.dependencies.len(),
                snapshot.version
            ));
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&document)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn document(template: &Template, render: bool) -> Result<Vec<u8>> {
    if !render {
        return Ok(template.snapshot().body.clone().into_bytes());
    }
    let mut out = Vec::new();
    template.render(&mut WriteSink(&mut out), &Payload::new())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn site(dir: &TempDir) -> AppConfig {
        fs::write(
            dir.path().join("index.html"),
            "<html><head></head><body><% part %></body></html>",
        )
        .unwrap();
        fs::write(dir.path().join("part.html"), "<p>part</p>").unwrap();

        let mut config = test_parse_config("[libs]\nnames = []");
        config.template.root = dir.path().join("index.html");
        config.libs.static_dir = dir.path().join("static");
        config
    }

    #[test]
    fn test_build_writes_compiled_document() {
        let dir = TempDir::new().unwrap();
        let config = site(&dir);
        let out = dir.path().join("out/index.html");

        build(&config, Some(&out), false).unwrap();
        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("<!-- BEGIN part.html -->\n<p>part</p>"));
        assert!(!html.contains("_componentData"));
    }

    #[test]
    fn test_build_render_embeds_bootstrap() {
        let dir = TempDir::new().unwrap();
        let config = site(&dir);
        let out = dir.path().join("rendered.html");

        build(&config, Some(&out), true).unwrap();
        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("window._componentData = {\"main\":{"));
    }

    #[test]
    fn test_build_fails_on_missing_include() {
        let dir = TempDir::new().unwrap();
        let config = site(&dir);
        fs::remove_file(dir.path().join("part.html")).unwrap();

        let err = build(&config, None, false).unwrap_err();
        assert!(format!("{err:#}").contains("error including part.html"));
    }
}
