//! # Hot Reload Module
//!
//! Live reloading of a route table without restarting the process.
//!
//! ## Overview
//!
//! A route tree is never mutated once it serves requests. Reloading therefore
//! builds a complete new [`Router`] from the table file and publishes it with a
//! single atomic store into a [`SharedRouter`]. Readers call `load()` per request
//! and see either the old tree or the new one, never a partially built one.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use routetree::hot_reload::{shared, watch_routes};
//!
//! let router = shared(load_router(path, &config)?);
//! let watcher = watch_routes(path, router.clone(), config, |r| {
//!     println!("Reloaded {} routes", r.len());
//! })?;
//!
//! // per request
//! let result = router.load().route(&method, path);
//! ```
//!
//! ## Error Handling
//!
//! If the new table fails to parse or build:
//! - The error is logged
//! - The previous router remains active
//!
//! Saving a broken table never takes routing down.

use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::table::load_router;

/// Router handle shared between request handlers and the reloader
pub type SharedRouter = Arc<ArcSwap<Router>>;

/// Wrap a router for sharing
pub fn shared(router: Router) -> SharedRouter {
    Arc::new(ArcSwap::from_pointee(router))
}

/// Rebuild the router from `path` and swap it in
///
/// On error the current router is left in place.
pub fn reload(
    path: &Path,
    config: &RuntimeConfig,
    router: &SharedRouter,
) -> anyhow::Result<Arc<Router>> {
    let fresh = Arc::new(load_router(path, config)?);
    router.store(Arc::clone(&fresh));
    info!(
        path = %path.display(),
        routes = fresh.len(),
        "hot-reload: route table swapped"
    );
    Ok(fresh)
}

/// Watch a route table and reload the [`SharedRouter`] when it changes.
///
/// `on_reload` runs after every successful swap with the new router.
pub fn watch_routes<P, F>(
    table_path: P,
    router: SharedRouter,
    config: RuntimeConfig,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Router) + Send + 'static,
{
    let path: PathBuf = table_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                debug!(kind = ?event.kind, path = %watch_path.display(), "Route table changed");
                match reload(&watch_path, &config, &router) {
                    Ok(fresh) => on_reload(&fresh),
                    Err(e) => error!(
                        path = %watch_path.display(),
                        error = %format!("{e:#}"),
                        "hot-reload failed, keeping previous routes"
                    ),
                }
            }
            Err(e) => error!(error = %e, "watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
