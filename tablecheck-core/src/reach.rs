//! Usage propagation over the dependency graph.
//!
//! A table is used when an active table-dependency edge points at it, or
//! when a chain of object-to-object dependencies leads from an object that
//! has such an edge. The chain walk is a multi-source BFS with an explicit
//! visited set, so cyclic object dependencies (which Access exports do
//! produce) terminate in O(|objects| + |object-edges|).

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::graph::DependencyGraph;
use crate::model::TableId;

/// How a table came to be considered used. Direct wins when both apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    /// At least one active table-dependency edge points at the table.
    Direct,
    /// Reached only through a chain of object dependencies.
    Indirect,
}

/// The used-table sets computed by one propagation pass.
#[derive(Debug, Clone, Default)]
pub struct UsageOutcome {
    /// Tables with at least one active table-dependency edge.
    pub direct: HashSet<TableId>,
    /// Tables accumulated through object-dependency chains, minus the
    /// direct set.
    pub indirect: HashSet<TableId>,
}

impl UsageOutcome {
    /// Union of direct and indirect usage.
    pub fn all_used(&self) -> HashSet<TableId> {
        self.direct.union(&self.indirect).copied().collect()
    }

    pub fn kind_of(&self, table_id: TableId) -> Option<UsageKind> {
        if self.direct.contains(&table_id) {
            Some(UsageKind::Direct)
        } else if self.indirect.contains(&table_id) {
            Some(UsageKind::Indirect)
        } else {
            None
        }
    }
}

/// Computes the complete used-table set for the graph.
///
/// 1. Direct set: every table with an active table-dependency edge.
/// 2. Seeds: every object with an active table-dependency edge.
/// 3. BFS over the object graph from the seeds, accumulating the tables
///    each visited object references.
///
/// Total over any well-formed graph, including the empty one.
pub fn propagate_usage(graph: &DependencyGraph) -> UsageOutcome {
    let direct: HashSet<TableId> = graph.directly_referenced_tables().collect();

    let mut visited: HashSet<_> = HashSet::new();
    let mut queue: VecDeque<_> = VecDeque::new();
    for seed in graph.seed_objects() {
        if visited.insert(seed) {
            queue.push_back(seed);
        }
    }

    let mut accumulated: HashSet<TableId> = HashSet::new();
    while let Some(object_id) = queue.pop_front() {
        if let Some(tables) = graph.tables_of(object_id) {
            accumulated.extend(tables.iter().copied());
        }
        for target in graph.object_targets(object_id) {
            if visited.insert(target) {
                queue.push_back(target);
            }
        }
    }

    let indirect: HashSet<TableId> = accumulated.difference(&direct).copied().collect();
    debug!(
        direct = direct.len(),
        indirect = indirect.len(),
        objects_visited = visited.len(),
        "usage propagation finished"
    );
    UsageOutcome { direct, indirect }
}

/// Runs propagation and flips `is_used` on every table in the final used
/// set. Edge ids with no matching table are ignored. Returns the outcome
/// for diagnostics.
pub fn mark_used_tables(graph: &mut DependencyGraph) -> UsageOutcome {
    let outcome = propagate_usage(graph);
    for table_id in outcome.all_used() {
        if let Some(table) = graph.tables.get_mut(&table_id) {
            table.is_used = true;
        }
    }
    outcome
}
