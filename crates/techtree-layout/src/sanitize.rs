//! Prerequisite sanitation.
//!
//! Repairs the raw item list before any graph is built: strips
//! self-referential prerequisites, drops prerequisites already implied
//! transitively through another prerequisite, and raises tech levels that
//! sit below a direct prerequisite's. Runs as a fixed point because a raised
//! tech level can re-violate the constraint on neighbors; the pass count is
//! capped and cap exhaustion is logged, not fatal.

use crate::input::{TechItem, TechLevel};
use crate::SANITIZE_MAX_PASSES;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

/// What the sanitizer changed. Everything here was also logged as a warning.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SanitizeReport {
    /// Items that listed themselves as a prerequisite.
    pub removed_self: Vec<String>,
    /// `(item, prerequisite)` pairs dropped because the prerequisite was
    /// already reachable through another listed prerequisite.
    pub removed_redundant: Vec<(String, String)>,
    /// Items whose tech level was raised, with the level they ended at.
    pub raised: Vec<(String, TechLevel)>,
    /// False if the fixed point was still changing when the pass cap hit.
    pub converged: bool,
}

pub fn sanitize(items: &mut [TechItem]) -> SanitizeReport {
    let mut report = SanitizeReport::default();

    let index: FxHashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.clone(), i))
        .collect();

    strip_self_references(items, &mut report);

    for pass in 0..SANITIZE_MAX_PASSES {
        let mut changed = false;
        changed |= remove_redundant_prerequisites(items, &index, &mut report);
        changed |= raise_tech_levels(items, &index, &mut report);

        if !changed {
            report.converged = true;
            tracing::debug!(passes = pass + 1, "prerequisite sanitation settled");
            break;
        }
    }

    if !report.converged {
        warn!(
            cap = SANITIZE_MAX_PASSES,
            "prerequisite sanitation hit its pass cap; keeping best-effort repairs"
        );
    }

    report
}

fn strip_self_references(items: &mut [TechItem], report: &mut SanitizeReport) {
    for item in items.iter_mut() {
        let before = item.prerequisites.len();
        let id = item.id.clone();
        item.prerequisites.retain(|p| *p != id);
        if item.prerequisites.len() != before {
            warn!(item = %id, "dropped self-referential prerequisite");
            report.removed_self.push(id);
        }
    }
}

/// A prerequisite is redundant when it also appears in the union of the
/// *other* listed prerequisites' ancestor chains. A sole prerequisite is
/// never redundant, so an unresolvable two-node cycle is left as-is.
fn remove_redundant_prerequisites(
    items: &mut [TechItem],
    index: &FxHashMap<String, usize>,
    report: &mut SanitizeReport,
) -> bool {
    let ancestors = ancestor_sets(items, index);
    let mut changed = false;

    for i in 0..items.len() {
        let resolved: Vec<Option<usize>> = items[i]
            .prerequisites
            .iter()
            .map(|p| index.get(p).copied())
            .collect();
        if resolved.len() < 2 {
            continue;
        }

        // All decisions are taken against the same snapshot of the list.
        let drop: Vec<bool> = resolved
            .iter()
            .enumerate()
            .map(|(k, p)| {
                let Some(p) = p else { return false };
                resolved.iter().enumerate().any(|(m, q)| {
                    m != k && q.is_some_and(|q| ancestors[q].contains(p))
                })
            })
            .collect();
        if !drop.iter().any(|&d| d) {
            continue;
        }

        let id = items[i].id.clone();
        let mut k = 0;
        items[i].prerequisites.retain(|p| {
            let redundant = drop[k];
            k += 1;
            if redundant {
                warn!(item = %id, prerequisite = %p, "dropped redundant prerequisite");
                report.removed_redundant.push((id.clone(), p.clone()));
                changed = true;
            }
            !redundant
        });
    }

    changed
}

fn raise_tech_levels(
    items: &mut [TechItem],
    index: &FxHashMap<String, usize>,
    report: &mut SanitizeReport,
) -> bool {
    let mut changed = false;

    for i in 0..items.len() {
        let required: Option<TechLevel> = items[i]
            .prerequisites
            .iter()
            .filter_map(|p| index.get(p).copied())
            .map(|pi| items[pi].tech_level)
            .max();

        if let Some(required) = required {
            if items[i].tech_level < required {
                warn!(
                    item = %items[i].id,
                    from = %items[i].tech_level,
                    to = %required,
                    "raised tech level to match prerequisites"
                );
                items[i].tech_level = required;
                report.raised.push((items[i].id.clone(), required));
                changed = true;
            }
        }
    }

    changed
}

/// Transitive prerequisite sets per item, memoized over one pass. A
/// visiting guard keeps cyclic input from recursing forever; edges on a
/// cycle contribute no ancestors beyond the point of re-entry.
fn ancestor_sets(items: &[TechItem], index: &FxHashMap<String, usize>) -> Vec<FxHashSet<usize>> {
    let mut memo: Vec<Option<FxHashSet<usize>>> = vec![None; items.len()];
    let mut visiting = vec![false; items.len()];
    for i in 0..items.len() {
        collect_ancestors(i, items, index, &mut memo, &mut visiting);
    }
    memo.into_iter().map(Option::unwrap_or_default).collect()
}

fn collect_ancestors(
    i: usize,
    items: &[TechItem],
    index: &FxHashMap<String, usize>,
    memo: &mut Vec<Option<FxHashSet<usize>>>,
    visiting: &mut Vec<bool>,
) {
    if memo[i].is_some() || visiting[i] {
        return;
    }
    visiting[i] = true;

    let direct: Vec<usize> = items[i]
        .prerequisites
        .iter()
        .filter_map(|p| index.get(p).copied())
        .collect();

    let mut set: FxHashSet<usize> = FxHashSet::default();
    for p in direct {
        collect_ancestors(p, items, index, memo, visiting);
        set.insert(p);
        if let Some(ps) = &memo[p] {
            set.extend(ps.iter().copied());
        }
    }

    visiting[i] = false;
    memo[i] = Some(set);
}
