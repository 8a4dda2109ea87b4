//! Statistics derived from the finished, usage-labeled graph.
//!
//! Dependency totals are computed over the raw, unfiltered table-dependency
//! list so that inactive edges stay visible in reports even though they
//! never influence the usage verdict.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{DatabaseObject, ObjectId, Table, TableDependency, TableId};

/// The table with the highest direct-reference count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostReferencedTable {
    pub table_id: TableId,
    pub table_name: String,
    pub reference_count: usize,
}

/// Immutable statistical summary of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisStatistics {
    pub total_tables: usize,
    pub used_tables: usize,
    pub unused_tables: usize,
    pub total_objects: usize,
    /// Object count per canonical type name, covering every object in the
    /// store whether or not it participates in any dependency.
    pub object_type_distribution: BTreeMap<String, usize>,
    /// All table-dependency edges, active or not.
    pub total_dependencies: usize,
    /// Edges flagged active in the raw list.
    pub active_dependencies: usize,
    /// Ids of unused tables, ascending.
    pub unused_table_ids: Vec<TableId>,
    pub most_referenced_table: Option<MostReferencedTable>,
}

impl AnalysisStatistics {
    /// Percentage of tables that are used; 0.0 for an empty store.
    pub fn usage_percentage(&self) -> f64 {
        if self.total_tables == 0 {
            0.0
        } else {
            (self.used_tables as f64 / self.total_tables as f64) * 100.0
        }
    }

    /// Percentage of tables that are unused; 0.0 for an empty store.
    pub fn unused_percentage(&self) -> f64 {
        if self.total_tables == 0 {
            0.0
        } else {
            (self.unused_tables as f64 / self.total_tables as f64) * 100.0
        }
    }

    /// Multi-line human-readable summary.
    pub fn summary_text(&self) -> String {
        let ref_info = match &self.most_referenced_table {
            Some(m) => format!(
                "\n  Most Referenced Table: {} ({} references)",
                m.table_name, m.reference_count
            ),
            None => String::new(),
        };
        format!(
            "Analysis Summary:\n  Total Tables: {}\n  Used Tables: {} ({:.1}%)\n  Unused Tables: {} ({:.1}%)\n  Total Objects: {}\n  Dependencies: {}/{} active{}",
            self.total_tables,
            self.used_tables,
            self.usage_percentage(),
            self.unused_tables,
            self.unused_percentage(),
            self.total_objects,
            self.active_dependencies,
            self.total_dependencies,
            ref_info
        )
    }
}

/// Computes the full summary from the usage-labeled entity maps and the
/// original (unfiltered) table-dependency list. Pure and deterministic:
/// the maps are ordered, so ties and listings always come out the same.
pub fn calculate_statistics(
    tables: &BTreeMap<TableId, Table>,
    objects: &BTreeMap<ObjectId, DatabaseObject>,
    table_deps: &[TableDependency],
) -> AnalysisStatistics {
    let total_tables = tables.len();
    let used_tables = tables.values().filter(|t| t.is_used).count();
    let unused_tables = total_tables - used_tables;

    let unused_table_ids: Vec<TableId> = tables
        .values()
        .filter(|t| !t.is_used)
        .map(|t| t.table_id)
        .collect();

    let mut object_type_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for obj in objects.values() {
        *object_type_distribution
            .entry(obj.object_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    // Strictly-greater comparison keeps the first table encountered in
    // iteration order when counts tie.
    let mut most_referenced: Option<MostReferencedTable> = None;
    let mut max_refs = 0usize;
    for table in tables.values() {
        let count = table.reference_count();
        if count > max_refs {
            max_refs = count;
            most_referenced = Some(MostReferencedTable {
                table_id: table.table_id,
                table_name: table.table_name.clone(),
                reference_count: count,
            });
        }
    }

    let total_dependencies = table_deps.len();
    let active_dependencies = table_deps.iter().filter(|d| d.active).count();

    AnalysisStatistics {
        total_tables,
        used_tables,
        unused_tables,
        total_objects: objects.len(),
        object_type_distribution,
        total_dependencies,
        active_dependencies,
        unused_table_ids,
        most_referenced_table: most_referenced,
    }
}
