//! Alpine.js template compiler.
//!
//! A root HTML file is expanded through `<% name %>` includes, its component
//! scripts are rewritten into `Alpine.data` registrations, library tags are
//! injected, and the result is cached as a versioned snapshot that recompiles
//! itself when any contributing file changes.

mod cache;
mod compiler;
mod error;
mod include;
mod libs;
mod loader;
mod payload;
mod render;
mod script;


pub use cache::{DEFAULT_CHECK_INTERVAL, SystemClock, Template};
pub use compiler::{CompileOptions, Compiler};
pub use libs::{STATIC_PREFIX, discover_libs};
pub use loader::DiskFs;
pub use payload::Payload;
pub use render::{BufferedResponse, WriteSink};
pub use script::ScriptRewriter;
