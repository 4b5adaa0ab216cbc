//! Route table and handlers of the todo application.
//!
//! Handlers produce a [`Reply`] instead of writing to the connection, so the
//! routing logic runs without a socket.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use tiny_http::Method;

use super::App;
use super::path::resolve_static;
use super::request::{NewTodoRequest, TodoIdRequest, decode_and_validate};
use crate::store::StoreError;
use crate::template::{BufferedResponse, Payload, STATIC_PREFIX};
use crate::{log, payload};

/// What to send back for one request.
#[derive(Debug)]
pub enum Reply {
    Buffered(u16, BufferedResponse),
    File(PathBuf),
    NotFound,
}

/// Dispatch one request. `path` carries no query string.
pub fn route(app: &App, method: &Method, path: &str, body: &mut dyn Read) -> Result<Reply> {
    match (method, path) {
        (Method::Get, "/") => index(app),
        (Method::Get, "/todos") => list_todos(app),
        (Method::Post, "/todos") => create_todo(app, body),
        (Method::Post, "/todos/toggle") => toggle_todo(app, body),
        (Method::Post, "/todos/delete") => delete_todo(app, body),
        (Method::Post, "/todos/clear-completed") => clear_completed(app),
        (Method::Get | Method::Head, _) => Ok(path
            .strip_prefix(STATIC_PREFIX)
            .and_then(|tail| resolve_static(tail, &app.static_dir))
            .map_or(Reply::NotFound, Reply::File)),
        _ => Ok(Reply::NotFound),
    }
}

/// `GET /`: the page with the current list embedded.
fn index(app: &App) -> Result<Reply> {
    let payload = payload! {
        "todoApp::todos" => app.store.list(),
        "todoApp::newTodo" => "",
        "todoApp::filter" => "all",
    }?;
    let mut out = BufferedResponse::default();
    app.template.render(&mut out, &payload)?;
    Ok(Reply::Buffered(200, out))
}

fn list_todos(app: &App) -> Result<Reply> {
    respond(app, todos(app))
}

fn create_todo(app: &App, body: &mut dyn Read) -> Result<Reply> {
    let outcome = decode_and_validate::<NewTodoRequest>(body).and_then(|req| {
        app.store.create(&req.text).map_err(|e| match e {
            StoreError::Full(_) => e.to_string(),
            e => {
                log!("store"; "{}", e);
                "Failed to save todo".to_string()
            }
        })?;
        payload! {
            "todoApp::todos" => app.store.list(),
            "todoApp::newTodo" => "",
            "main::error" => "",
        }
        .map_err(|e| format!("Failed to fetch updated todos: {e}"))
    });
    respond(app, outcome)
}

fn toggle_todo(app: &App, body: &mut dyn Read) -> Result<Reply> {
    let outcome = decode_and_validate::<TodoIdRequest>(body).and_then(|req| {
        app.store
            .toggle(&req.id)
            .map_err(|e| format!("Failed to toggle todo: {e}"))?;
        todos(app)
    });
    respond(app, outcome)
}

fn delete_todo(app: &App, body: &mut dyn Read) -> Result<Reply> {
    let outcome = decode_and_validate::<TodoIdRequest>(body).and_then(|req| {
        // Deleting an unknown id still answers with the current list.
        app.store
            .delete(&req.id)
            .map_err(|e| format!("Failed to delete todo: {e}"))?;
        todos(app)
    });
    respond(app, outcome)
}

fn clear_completed(app: &App) -> Result<Reply> {
    let outcome = app
        .store
        .clear_completed()
        .map_err(|e| format!("Failed to clear completed todos: {e}"))
        .and_then(|_| todos(app));
    respond(app, outcome)
}

fn todos(app: &App) -> Result<Payload, String> {
    payload! { "todoApp::todos" => app.store.list() }
        .map_err(|e| format!("Failed to fetch todos: {e}"))
}

/// JSON response, or the error contract when `outcome` failed.
fn respond(app: &App, outcome: Result<Payload, String>) -> Result<Reply> {
    let mut out = BufferedResponse::default();
    match outcome {
        Ok(payload) => app.template.respond_json(&mut out, payload)?,
        Err(message) => app.template.respond_error(&mut out, &message)?,
    }
    Ok(Reply::Buffered(200, out))
}
