//! Live route reloading.
//!
//! The route table is the only structure shared across concurrent requests,
//! and it is read-only during normal operation. Reload never mutates a live
//! table: a replacement is compiled off to the side and published through a
//! single atomic swap, so any in-flight lookup sees either the old table or
//! the new one in its entirety - never a partially updated structure.
//!
//! [`watch_routes`] layers a filesystem watcher on top for deployments that
//! keep their route map in a YAML/JSON file (see [`crate::spec::load_routes`]).
//! If an updated file fails to parse or compile, the error is logged and the
//! previous table stays active; the service keeps serving.
//!
//! Watching is a development convenience. Production deployments usually
//! call [`crate::Dispatcher::reload`] from an explicit admin action instead.

use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::matcher::{MatcherKind, RouteTable};
use crate::spec;

/// Atomically swappable handle to the current [`RouteTable`].
///
/// `load()` is a lock-free atomic read, cheap enough for every request;
/// `swap()` publishes a replacement table built elsewhere. Clones share the
/// same underlying slot.
#[derive(Clone)]
pub struct SharedRouteTable {
    inner: Arc<ArcSwap<RouteTable>>,
}

impl SharedRouteTable {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Snapshot the current table. The returned `Arc` stays valid for the
    /// whole request even if a swap happens mid-flight.
    #[must_use]
    pub fn load(&self) -> Arc<RouteTable> {
        self.inner.load_full()
    }

    /// Publish a replacement table. In-flight readers keep their snapshot.
    pub fn swap(&self, table: RouteTable) {
        self.inner.store(Arc::new(table));
    }
}

/// Watch a route definition file and swap the shared table when it changes.
///
/// The callback receives the number of routes after each successful reload
/// so the caller can refresh handler registrations or log. Keep the returned
/// watcher alive; dropping it stops watching.
pub fn watch_routes<P, F>(
    route_path: P,
    table: SharedRouteTable,
    kind: MatcherKind,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(usize) + Send + 'static,
{
    let path: PathBuf = route_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match reload_from_file(&watch_path, kind) {
                    Ok(new_table) => {
                        let count = new_table.len();
                        table.swap(new_table);
                        info!(
                            path = %watch_path.display(),
                            routes_count = count,
                            "hot-reload: route table swapped"
                        );
                        on_reload(count);
                    }
                    Err(err) => {
                        // Keep the previous table; a bad save must not take
                        // the service down.
                        warn!(
                            path = %watch_path.display(),
                            error = %err,
                            "hot-reload: keeping previous route table"
                        );
                    }
                }
            }
            Err(err) => warn!(error = %err, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

fn reload_from_file(path: &Path, kind: MatcherKind) -> anyhow::Result<RouteTable> {
    let specs = spec::load_routes(path)?;
    Ok(RouteTable::compile_with(&specs, kind)?)
}
