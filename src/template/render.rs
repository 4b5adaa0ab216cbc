//! Page rendering and JSON responses.
//!
//! Every response first runs the throttled freshness check, then works on a
//! single snapshot so body and version always agree. Output is fully built in
//! memory before the first byte reaches the sink.

use serde_json::Value;
use std::io;

use super::cache::Template;
use super::compiler::CompiledTemplate;
use super::error::TemplateError;
use super::payload::{Namespaced, Payload, ROOT_NAMESPACE, SEPARATOR};
use crate::embed::serve::{BOOTSTRAP, BootstrapVars};
use crate::utils::html::{escape_script_json, find_tag, insert_at};
use crate::utils::mime;

/// Where rendered output goes: an HTTP response body or a file.
pub trait Sink {
    fn set_content_type(&mut self, content_type: &'static str);
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// In-memory [`Sink`]; the server turns it into a response afterwards.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Sink for BufferedResponse {
    fn set_content_type(&mut self, content_type: &'static str) {
        self.content_type = Some(content_type);
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

/// Any `io::Write` can take a page; the content type is dropped.
pub struct WriteSink<W>(pub W);

impl<W: io::Write> Sink for WriteSink<W> {
    fn set_content_type(&mut self, _content_type: &'static str) {}

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.0, bytes)?;
        io::Write::flush(&mut self.0)
    }
}

impl Template {
    /// Render the page with `payload` embedded as component data.
    pub fn render(&self, sink: &mut dyn Sink, payload: &Payload) -> Result<(), TemplateError> {
        let compiled = self.refresh_for_request();
        let page = render_page(&compiled, payload)?;
        sink.set_content_type(mime::types::HTML);
        sink.write_all(page.as_bytes())?;
        Ok(())
    }

    /// Write `payload` as JSON, stamped with `main::availVersion`.
    pub fn respond_json(&self, sink: &mut dyn Sink, mut payload: Payload) -> Result<(), TemplateError> {
        let compiled = self.refresh_for_request();
        payload.insert(
            format!("{ROOT_NAMESPACE}{SEPARATOR}availVersion"),
            Value::String(compiled.version.clone()),
        );

        let mut body = serde_json::to_vec(&payload)?;
        body.push(b'\n');
        sink.set_content_type(mime::types::JSON);
        sink.write_all(&body)?;
        Ok(())
    }

    /// JSON error response: `main::error` plus the current version.
    pub fn respond_error(&self, sink: &mut dyn Sink, message: &str) -> Result<(), TemplateError> {
        let mut payload = Payload::new();
        payload.insert(
            format!("{ROOT_NAMESPACE}{SEPARATOR}error"),
            Value::String(message.to_string()),
        );
        self.respond_json(sink, payload)
    }
}

/// Embed `payload` and the client helpers into `compiled`.
///
/// The block goes right before the first `</body>`, or at the end of the
/// document when there is none.
pub fn render_page(compiled: &CompiledTemplate, payload: &Payload) -> Result<String, TemplateError> {
    let mut data = Namespaced::from_flat(payload);
    let version = Value::String(compiled.version.clone());
    data.insert(ROOT_NAMESPACE, "currentVersion", version.clone());
    data.insert(ROOT_NAMESPACE, "availVersion", version);

    let json = serde_json::to_string(&data)?;
    let block = BOOTSTRAP.render(&BootstrapVars {
        component_data: &escape_script_json(&json),
    });

    Ok(match find_tag(&compiled.body, "</body>") {
        Some(pos) => insert_at(&compiled.body, pos, &block),
        None => format!("{}{block}", compiled.body),
    })
}
