//! Dependency graph construction.
//!
//! Turns the flat edge lists from ingestion into queryable adjacency
//! structures and enriches each table with the objects that directly
//! reference it. Only active edges take part; inactive ones are filtered
//! out here and surface again solely in the raw dependency statistics.
//!
//! Performance characteristics:
//! - Build: O(|tables| + |objects| + |edges|)
//! - The object-to-object graph is a `DiGraphMap` keyed by object id,
//!   with unit edges to minimize memory footprint.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::model::{
    DatabaseObject, ObjectDependency, ObjectId, ObjectReference, Table, TableDependency, TableId,
};

/// The enriched dependency graph: entity stores plus derived indexes.
///
/// Exclusively owned by one analysis run. The entity maps are `BTreeMap`s
/// so every iteration order (and with it every tie-break downstream) is
/// deterministic.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub tables: BTreeMap<TableId, Table>,
    pub objects: BTreeMap<ObjectId, DatabaseObject>,
    /// object id -> tables it directly references (active edges only).
    object_to_tables: HashMap<ObjectId, HashSet<TableId>>,
    /// table id -> objects that directly reference it (active edges only),
    /// in edge discovery order, deduplicated.
    table_to_objects: BTreeMap<TableId, Vec<ObjectId>>,
    /// source object -> target objects it depends on (active edges only).
    object_graph: DiGraphMap<ObjectId, ()>,
}

impl DependencyGraph {
    /// Tables with at least one active table-dependency edge.
    /// Edge ids are kept even when the table is absent from the store;
    /// marking usage later simply skips unknown ids.
    pub fn directly_referenced_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        self.table_to_objects.keys().copied()
    }

    /// Objects with at least one active table-dependency edge.
    pub fn seed_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.object_to_tables.keys().copied()
    }

    /// Tables directly referenced by the given object (active edges only).
    pub fn tables_of(&self, object_id: ObjectId) -> Option<&HashSet<TableId>> {
        self.object_to_tables.get(&object_id)
    }

    /// Objects that directly reference the given table, in discovery order.
    pub fn referencing_objects_of(&self, table_id: TableId) -> &[ObjectId] {
        self.table_to_objects
            .get(&table_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Targets of the given object's active object-dependency edges.
    pub fn object_targets(&self, object_id: ObjectId) -> Vec<ObjectId> {
        if self.object_graph.contains_node(object_id) {
            self.object_graph.neighbors(object_id).collect()
        } else {
            Vec::new()
        }
    }

    /// Number of active object-dependency edges in the graph.
    pub fn object_edge_count(&self) -> usize {
        self.object_graph.edge_count()
    }
}

/// Builds the enriched dependency graph from entity stores and raw edges.
///
/// Takes ownership of the entity maps; the caller's originals are never
/// touched. Degenerate inputs (empty maps, empty edge lists) produce a
/// valid, empty graph.
///
/// `include_inactive` widens the active-only filter so that disabled edges
/// also count (the `--include-inactive` toggle); by default they are
/// excluded from every index built here.
pub fn build_graph(
    tables: BTreeMap<TableId, Table>,
    objects: BTreeMap<ObjectId, DatabaseObject>,
    table_deps: &[TableDependency],
    object_deps: &[ObjectDependency],
    include_inactive: bool,
) -> DependencyGraph {
    let usable = |active: bool| active || include_inactive;

    let mut object_to_tables: HashMap<ObjectId, HashSet<TableId>> = HashMap::new();
    let mut table_to_objects: BTreeMap<TableId, Vec<ObjectId>> = BTreeMap::new();
    // Guards against the same object landing twice in one table's list
    // when the export carries duplicate edges.
    let mut seen_pairs: HashSet<(TableId, ObjectId)> = HashSet::new();

    for dep in table_deps.iter().filter(|d| usable(d.active)) {
        object_to_tables
            .entry(dep.object_id)
            .or_default()
            .insert(dep.table_id);
        if seen_pairs.insert((dep.table_id, dep.object_id)) {
            table_to_objects
                .entry(dep.table_id)
                .or_default()
                .push(dep.object_id);
        }
    }

    let mut object_graph: DiGraphMap<ObjectId, ()> = DiGraphMap::new();
    for dep in object_deps.iter().filter(|d| usable(d.active)) {
        object_graph.add_edge(dep.source_object_id, dep.target_object_id, ());
    }

    let mut graph = DependencyGraph {
        tables,
        objects,
        object_to_tables,
        table_to_objects,
        object_graph,
    };
    enrich_tables(&mut graph);
    graph
}

/// Attaches an `ObjectReference` to each table for every known object that
/// directly references it. Edges pointing at unknown table or object ids
/// cannot produce a reference and are skipped here, but their ids stay in
/// the adjacency indexes.
fn enrich_tables(graph: &mut DependencyGraph) {
    let mut skipped = 0usize;
    for (table_id, object_ids) in &graph.table_to_objects {
        let Some(table) = graph.tables.get_mut(table_id) else {
            skipped += object_ids.len();
            continue;
        };
        for object_id in object_ids {
            match graph.objects.get(object_id) {
                Some(obj) => {
                    // Only active edges reach this stage, so the reference
                    // carries active = true. The constructor cannot fail
                    // here: the object store only holds validated entities.
                    if let Ok(reference) = ObjectReference::new(
                        obj.object_id,
                        obj.object_name.clone(),
                        obj.object_type,
                        true,
                    ) {
                        table.referencing_objects.push(reference);
                    }
                }
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, "edges referencing unknown ids excluded from enrichment");
    }
}
