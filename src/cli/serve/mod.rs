//! Todo demo server.
//!
//! A single accept loop hands each request to a rayon pool. Handlers share
//! one [`App`]: the self-refreshing template, the todo store and the static
//! directory.

mod handlers;
mod lifecycle;
mod path;
mod request;
mod response;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::config::AppConfig;
use crate::core::is_shutdown;
use crate::log;
use crate::store::TodoStore;
use crate::template::Template;
use handlers::Reply;

/// State shared by every request.
pub struct App {
    pub template: Template,
    pub store: TodoStore,
    pub static_dir: PathBuf,
}

/// Open the store, bind and serve until Ctrl+C.
pub fn serve(config: &AppConfig, template: Template) -> Result<()> {
    let store = TodoStore::open(&config.store.path, config.store.max_todos)
        .with_context(|| format!("Failed to open todo store {}", config.store.path.display()))?;
    let app = Arc::new(App {
        template,
        store,
        static_dir: config.libs.static_dir.clone(),
    });

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    log!("serve"; "http://{} (template version {})", addr, app.template.version());
    run_request_loop(&server, &app, config.serve.threads)
}

fn run_request_loop(server: &Server, app: &Arc<App>, threads: usize) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("jtemplate-http-{i}"))
        .build()
        .context("Failed to create HTTP thread pool")?;

    for request in server.incoming_requests() {
        let app = Arc::clone(app);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {}", e);
            }
        });
    }
    Ok(())
}

fn handle_request(mut request: Request, app: &App) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let method = request.method().clone();
    let url = request.url().to_string();
    let path = url.split(['?', '#']).next().unwrap_or_default();

    match handlers::route(app, &method, path, request.as_reader()) {
        Ok(Reply::Buffered(status, out)) => response::send_buffered(request, status, out),
        Ok(Reply::File(file)) => response::respond_file(request, &file),
        Ok(Reply::NotFound) => response::respond_not_found(request),
        Err(e) => {
            log!("serve"; "{} {}: {:#}", method, path, e);
            response::respond_internal_error(request, "500 Internal Server Error")
        }
    }
}
