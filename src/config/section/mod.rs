//! Configuration section definitions.
//!
//! Each module corresponds to a section in `jtemplate.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `template` | `[template]`   | Root file, check interval, depth     |
//! | `libs`     | `[libs]`       | Static library discovery, injection  |
//! | `serve`    | `[serve]`      | HTTP server                          |
//! | `store`    | `[store]`      | Todo persistence                     |

mod libs;
mod serve;
mod store;
mod template;

pub use libs::LibsConfig;
pub use serve::ServeConfig;
pub use store::StoreConfig;
pub use template::TemplateConfig;
