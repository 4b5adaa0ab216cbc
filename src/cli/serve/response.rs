//! HTTP response helpers.

use crate::template::BufferedResponse;
use crate::utils::date::DateTimeUtc;
use crate::utils::mime::types::PLAIN;
use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Send a response produced through the template's sink.
pub fn send_buffered(request: Request, status: u16, buffered: BufferedResponse) -> Result<()> {
    let content_type = buffered.content_type.unwrap_or(PLAIN);
    send_body(request, status, content_type, buffered.body)
}

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTimeUtc::from_system_time(t).to_rfc2822())
        .ok();

    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(200))
            .with_header(make_header("Content-Type", content_type)?);
        if let Some(modified) = &modified {
            response.add_header(make_header("Last-Modified", modified)?);
        }
        request.respond(response)?;
        return Ok(());
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut response = Response::from_data(body)
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-cache")?);
    if let Some(modified) = &modified {
        response.add_header(make_header("Last-Modified", modified)?);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with a plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with a plain 500 when not even an error payload could be built.
pub fn respond_internal_error(request: Request, message: &str) -> Result<()> {
    send_body(request, 500, PLAIN, message.as_bytes().to_vec())
}

pub fn send_body(
    request: Request,
    status: u16,
    content_type: &str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}
