//! The layout driver.
//!
//! One engine instance per tech tree, owned by whoever needs the layout; no
//! process-wide state. The phase machine is `Unbuilt -> Building -> Built`,
//! back to `Unbuilt` on reset or failure. Exactly one build runs at a time:
//! a second request while one is in flight parks on a condition variable
//! until the in-flight build settles, then either returns its result or
//! retries from scratch if it failed. There is no mid-build cancellation.

use crate::build::{BuiltGraph, build_graph};
use crate::compact::{collapse_rows, remove_empty_rows};
use crate::error::{LayoutError, Result};
use crate::normalize::normalize;
use crate::order::order;
use crate::rank::assign_layers;
use crate::result::LayoutResult;
use crate::sanitize::sanitize;
use crate::straighten::straighten;
use crate::TechItem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, error};

#[derive(Debug, Clone)]
enum Phase {
    Unbuilt,
    Building,
    Built(Arc<LayoutResult>),
}

#[derive(Debug)]
struct Shared {
    phase: Mutex<Phase>,
    cond: Condvar,
}

pub struct LayoutEngine {
    items: Vec<TechItem>,
    shared: Arc<Shared>,
}

impl LayoutEngine {
    pub fn new(items: Vec<TechItem>) -> Self {
        Self {
            items,
            shared: Arc::new(Shared {
                phase: Mutex::new(Phase::Unbuilt),
                cond: Condvar::new(),
            }),
        }
    }

    /// Builds the layout if needed. Idempotent once built; if another build
    /// is already in flight this blocks until it settles instead of
    /// starting a second concurrent pass.
    pub fn build(&self) -> Result<Arc<LayoutResult>> {
        build_on(&self.shared, &self.items)
    }

    /// Runs the build on a worker thread so the caller's loop keeps going.
    /// The handle may be joined but does not have to be;
    /// [`LayoutEngine::wait_until_built`] is the usual rendezvous.
    pub fn build_in_background(&self) -> thread::JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let items = self.items.clone();
        thread::spawn(move || {
            if let Err(e) = build_on(&shared, &items) {
                error!(error = %e, "background layout build failed");
            }
        })
    }

    /// Blocks until a layout is available: waits out an in-flight build, or
    /// runs one synchronously if nothing has started yet. Never spins.
    pub fn wait_until_built(&self) -> Result<Arc<LayoutResult>> {
        self.build()
    }

    /// Non-blocking peek at the current layout.
    pub fn result(&self) -> Result<Arc<LayoutResult>> {
        match &*lock(&self.shared.phase) {
            Phase::Built(layout) => Ok(Arc::clone(layout)),
            Phase::Unbuilt | Phase::Building => Err(LayoutError::NotBuilt),
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(&*lock(&self.shared.phase), Phase::Built(_))
    }

    /// Tears the layout down, ready for the next build. An in-flight build
    /// is waited out first; it cannot be aborted.
    pub fn reset(&self) {
        let mut phase = lock(&self.shared.phase);
        while matches!(&*phase, Phase::Building) {
            phase = self
                .shared
                .cond
                .wait(phase)
                .unwrap_or_else(|e| e.into_inner());
        }
        *phase = Phase::Unbuilt;
        drop(phase);
        self.shared.cond.notify_all();
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

fn build_on(shared: &Shared, items: &[TechItem]) -> Result<Arc<LayoutResult>> {
    let mut phase = lock(&shared.phase);
    loop {
        match &*phase {
            Phase::Built(layout) => return Ok(Arc::clone(layout)),
            Phase::Building => {
                debug!("waiting out an in-flight layout build");
                phase = shared.cond.wait(phase).unwrap_or_else(|e| e.into_inner());
            }
            Phase::Unbuilt => break,
        }
    }
    *phase = Phase::Building;
    drop(phase);
    debug!("no layout present; running a fresh build");

    // If the pipeline unwinds, the guard flips the phase back to Unbuilt and
    // wakes waiters, so a torn build is never observable as Built.
    let guard = AbortGuard {
        shared,
        armed: true,
    };
    let outcome = run_pipeline(items);
    guard.disarm();

    let mut phase = lock(&shared.phase);
    match outcome {
        Ok(layout) => {
            let layout = Arc::new(layout);
            *phase = Phase::Built(Arc::clone(&layout));
            drop(phase);
            shared.cond.notify_all();
            Ok(layout)
        }
        Err(e) => {
            *phase = Phase::Unbuilt;
            drop(phase);
            shared.cond.notify_all();
            error!(error = %e, "layout build failed; next request retries from scratch");
            Err(e)
        }
    }
}

struct AbortGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl AbortGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbortGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut phase = lock(&self.shared.phase);
        *phase = Phase::Unbuilt;
        drop(phase);
        self.shared.cond.notify_all();
    }
}

/// The fixed-order pipeline. Each stage assumes the invariants established
/// by the previous one; in particular everything after `normalize` relies
/// on all edges being single-span.
fn run_pipeline(items: &[TechItem]) -> Result<LayoutResult> {
    if items.is_empty() {
        return Err(LayoutError::EmptyGraph);
    }

    let mut items = items.to_vec();
    let report = sanitize(&mut items);

    let BuiltGraph { mut tree, index } = build_graph(&items);
    let bands = assign_layers(&mut tree);
    normalize(&mut tree);
    collapse_rows(&mut tree);
    order(&mut tree);
    straighten(&mut tree);
    remove_empty_rows(&mut tree);

    debug!(
        nodes = tree.node_count(),
        edges = tree.edge_count(),
        crossings = crate::order::cross_count(&tree),
        "layout build finished"
    );

    Ok(LayoutResult::from_tree(&tree, &index, bands, report))
}
