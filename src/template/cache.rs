//! Throttled freshness checks and snapshot publication.
//!
//! The compiled document lives in an `ArcSwap<CompiledTemplate>`: request
//! threads load the current snapshot lock-free, and a recompilation publishes
//! a complete new snapshot with one atomic store. The throttle state sits
//! behind a `Mutex` that is only ever `try_lock`ed on the request path, so a
//! request arriving mid-recompile keeps serving the previous snapshot instead
//! of waiting.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::compiler::{CompiledTemplate, Compiler, format_version, newest_mtime};
use super::error::TemplateError;
use crate::{debug, log, logger};

/// Default interval between two file-system checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Monotonic time source for the throttle.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// `Instant::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Outcome of [`Template::ensure_fresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Inside the throttle window, or another thread is checking.
    Skipped,
    /// Checked; every dependency is as old as the published version.
    Unchanged,
    /// A dependency changed and a new snapshot was published.
    Recompiled,
}

struct CheckState {
    last_checked: Instant,
}

/// A compiled root template that keeps itself up to date.
pub struct Template {
    compiler: Compiler,
    clock: Arc<dyn Clock>,
    check_interval: Duration,
    current: ArcSwap<CompiledTemplate>,
    check: Mutex<CheckState>,
}

impl Template {
    /// Compile `compiler`'s root once; fails when the first compilation does.
    pub fn new(
        compiler: Compiler,
        clock: Arc<dyn Clock>,
        check_interval: Duration,
    ) -> Result<Self, TemplateError> {
        let compiled = compiler.compile()?;
        debug!(
            "template"; "compiled {} ({} files, version {})",
            compiler.root().display(),
            compiled.dependencies.len(),
            compiled.version
        );

        let last_checked = clock.now();
        Ok(Self {
            compiler,
            clock,
            check_interval,
            current: ArcSwap::from_pointee(compiled),
            check: Mutex::new(CheckState { last_checked }),
        })
    }

    /// Current snapshot; cheap, never blocks.
    pub fn snapshot(&self) -> Arc<CompiledTemplate> {
        self.current.load_full()
    }

    /// Version of the current snapshot.
    pub fn version(&self) -> String {
        self.current.load().version.clone()
    }

    /// Recompile when a dependency changed, at most once per check interval.
    ///
    /// On failure the previous snapshot stays published, and since its
    /// version did not move the next due check retries the compilation.
    pub fn ensure_fresh(&self) -> Result<Freshness, TemplateError> {
        let Some(mut state) = self.check.try_lock() else {
            return Ok(Freshness::Skipped);
        };

        let now = self.clock.now();
        if now.saturating_duration_since(state.last_checked) < self.check_interval {
            return Ok(Freshness::Skipped);
        }
        state.last_checked = now;

        let published = self.current.load_full();
        let observed = newest_mtime(self.compiler.vfs(), &published.dependencies);
        if observed == published.modified {
            return Ok(Freshness::Unchanged);
        }

        debug!(
            "template"; "version {} -> {}, recompiling",
            published.version,
            format_version(observed)
        );
        self.recompile()?;
        Ok(Freshness::Recompiled)
    }

    /// Recompile now, ignoring the throttle.
    #[allow(dead_code)]
    pub fn force_recompile(&self) -> Result<(), TemplateError> {
        let mut state = self.check.lock();
        state.last_checked = self.clock.now();
        self.recompile()
    }

    /// Compile and publish. Callers hold the check lock.
    fn recompile(&self) -> Result<(), TemplateError> {
        match self.compiler.compile() {
            Ok(compiled) => {
                logger::status_success(&format!(
                    "recompiled {} (version {})",
                    self.compiler.root().display(),
                    compiled.version
                ));
                self.current.store(Arc::new(compiled));
                Ok(())
            }
            Err(e) => {
                logger::status_error(
                    &format!("failed to update template `{}`", self.compiler.root().display()),
                    &e.to_string(),
                );
                Err(e)
            }
        }
    }

    /// Run the freshness check from a request path: errors are logged, the
    /// published snapshot keeps serving.
    pub(super) fn refresh_for_request(&self) -> Arc<CompiledTemplate> {
        if let Err(e) = self.ensure_fresh() {
            log!("template"; "serving previous version: {}", e);
        }
        self.snapshot()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
