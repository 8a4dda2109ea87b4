//! Analysis orchestration: validate, build, propagate, summarize.
//!
//! The pipeline is pure and synchronous. Identical inputs produce identical
//! usage labels and statistics (timestamps and wall-clock duration aside),
//! so independent runs can safely execute in parallel if a host application
//! wants them to.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{TablecheckError, TablecheckResult};
use crate::graph::build_graph;
use crate::ledger::{ReferenceKind, UsageLedger};
use crate::model::{
    DatabaseObject, ObjectDependency, ObjectId, Table, TableDependency, TableId,
};
use crate::reach::mark_used_tables;
use crate::stats::{calculate_statistics, AnalysisStatistics};

/// Configurable analysis entry point.
///
/// ```rust,ignore
/// let result = Analyzer::new()
///     .include_inactive(false)
///     .analyze(tables, objects, &table_deps, &object_deps)?;
/// for table in result.unused_tables() {
///     println!("unused: {}", table.table_name);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    include_inactive: bool,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat inactive dependency edges as if they were active.
    pub fn include_inactive(mut self, enabled: bool) -> Self {
        self.include_inactive = enabled;
        self
    }

    /// Runs the full analysis over fully-materialized inputs.
    ///
    /// Ingestion guarantees entity-level invariants, but anything slipping
    /// through fails loudly here with a validation error instead of leaking
    /// into a silently wrong verdict.
    pub fn analyze(
        &self,
        tables: BTreeMap<TableId, Table>,
        objects: BTreeMap<ObjectId, DatabaseObject>,
        table_deps: &[TableDependency],
        object_deps: &[ObjectDependency],
    ) -> TablecheckResult<AnalysisResult> {
        let start = Instant::now();
        info!(
            tables = tables.len(),
            objects = objects.len(),
            table_deps = table_deps.len(),
            object_deps = object_deps.len(),
            "starting dependency analysis"
        );

        validate_inputs(&tables, &objects, table_deps, object_deps)?;

        debug!("building dependency graph");
        let mut graph = build_graph(
            tables,
            objects,
            table_deps,
            object_deps,
            self.include_inactive,
        );

        debug!("marking used tables");
        let outcome = mark_used_tables(&mut graph);

        let mut ledger = UsageLedger::new();
        for table in graph.tables.values() {
            let kind = match outcome.kind_of(table.table_id) {
                Some(crate::reach::UsageKind::Indirect) => ReferenceKind::Indirect,
                _ => ReferenceKind::Direct,
            };
            for reference in &table.referencing_objects {
                ledger.record(
                    table.table_id,
                    &table.table_name,
                    reference.object_id,
                    &reference.object_name,
                    reference.object_type,
                    kind,
                );
            }
        }

        debug!("calculating statistics");
        let statistics = calculate_statistics(&graph.tables, &graph.objects, table_deps);

        let processing_time = start.elapsed();
        info!(
            unused = statistics.unused_tables,
            total = statistics.total_tables,
            elapsed_ms = processing_time.as_millis() as u64,
            "analysis complete"
        );

        Ok(AnalysisResult {
            tables: graph.tables,
            objects: graph.objects,
            statistics,
            ledger,
            processing_time,
            timestamp: Utc::now(),
        })
    }
}

/// Defends the core's precondition: every entity and edge passed in must
/// already satisfy the model invariants.
fn validate_inputs(
    tables: &BTreeMap<TableId, Table>,
    objects: &BTreeMap<ObjectId, DatabaseObject>,
    table_deps: &[TableDependency],
    object_deps: &[ObjectDependency],
) -> TablecheckResult<()> {
    for (id, table) in tables {
        if *id == 0 || table.table_id == 0 {
            return Err(TablecheckError::validation("table store contains id 0"));
        }
        if *id != table.table_id {
            return Err(TablecheckError::validation(format!(
                "table store key {} does not match table id {}",
                id, table.table_id
            )));
        }
        if table.table_name.trim().is_empty() {
            return Err(TablecheckError::validation(format!(
                "table {} has an empty name",
                id
            )));
        }
    }
    for (id, obj) in objects {
        if *id == 0 || obj.object_id == 0 {
            return Err(TablecheckError::validation("object store contains id 0"));
        }
        if *id != obj.object_id {
            return Err(TablecheckError::validation(format!(
                "object store key {} does not match object id {}",
                id, obj.object_id
            )));
        }
        if obj.object_name.trim().is_empty() {
            return Err(TablecheckError::validation(format!(
                "object {} has an empty name",
                id
            )));
        }
    }
    if table_deps.iter().any(|d| d.object_id == 0 || d.table_id == 0) {
        return Err(TablecheckError::validation(
            "table dependency with zero id",
        ));
    }
    if object_deps
        .iter()
        .any(|d| d.source_object_id == 0 || d.target_object_id == 0)
    {
        return Err(TablecheckError::validation(
            "object dependency with zero id",
        ));
    }
    Ok(())
}

/// Complete output of one analysis run. Consumers read it; nothing mutates
/// it afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Usage-labeled tables, keyed by id.
    pub tables: BTreeMap<TableId, Table>,
    /// All database objects, keyed by id.
    pub objects: BTreeMap<ObjectId, DatabaseObject>,
    /// Statistical summary.
    pub statistics: AnalysisStatistics,
    /// Diagnostic reference ledger.
    pub ledger: UsageLedger,
    /// Wall-clock duration of the run.
    pub processing_time: std::time::Duration,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// Unused tables in id order.
    pub fn unused_tables(&self) -> Vec<&Table> {
        self.tables.values().filter(|t| !t.is_used).collect()
    }

    /// Used tables in id order.
    pub fn used_tables(&self) -> Vec<&Table> {
        self.tables.values().filter(|t| t.is_used).collect()
    }

    /// Case-insensitive lookup by table name.
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables
            .values()
            .find(|t| t.table_name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectType;

    fn tables(entries: &[(u32, &str)]) -> BTreeMap<TableId, Table> {
        entries
            .iter()
            .map(|(id, name)| (*id, Table::new(*id, *name).unwrap()))
            .collect()
    }

    fn objects(entries: &[(u32, &str, ObjectType)]) -> BTreeMap<ObjectId, DatabaseObject> {
        entries
            .iter()
            .map(|(id, name, ty)| (*id, DatabaseObject::new(*id, *name, *ty).unwrap()))
            .collect()
    }

    #[test]
    fn test_analyze_attaches_references_and_ledger() {
        let result = Analyzer::new()
            .analyze(
                tables(&[(1, "Customers"), (2, "Orphan")]),
                objects(&[(100, "CustomerForm", ObjectType::Form)]),
                &[TableDependency::new(100, 1, true).unwrap()],
                &[],
            )
            .unwrap();

        assert!(result.tables[&1].is_used);
        assert_eq!(result.tables[&1].referencing_objects.len(), 1);
        assert_eq!(result.unused_tables().len(), 1);
        assert_eq!(result.ledger.len(), 1);
        let summary = result.ledger.summary_for(1).unwrap();
        assert_eq!(summary.direct_references, 1);
    }

    #[test]
    fn test_table_by_name_is_case_insensitive() {
        let result = Analyzer::new()
            .analyze(tables(&[(1, "Customers")]), BTreeMap::new(), &[], &[])
            .unwrap();
        assert!(result.table_by_name("CUSTOMERS").is_some());
        assert!(result.table_by_name("nothere").is_none());
    }

    #[test]
    fn test_mismatched_store_key_fails_loudly() {
        let mut store = BTreeMap::new();
        store.insert(7u32, Table::new(8, "Mismatch").unwrap());
        let err = Analyzer::new()
            .analyze(store, BTreeMap::new(), &[], &[])
            .unwrap_err();
        assert!(matches!(err, TablecheckError::Validation { .. }));
    }

    #[test]
    fn test_tampered_entity_fails_loudly() {
        let mut t = Table::new(1, "Customers").unwrap();
        t.table_name = "   ".to_string();
        let err = Analyzer::new()
            .analyze(BTreeMap::from([(1, t)]), BTreeMap::new(), &[], &[])
            .unwrap_err();
        assert!(matches!(err, TablecheckError::Validation { .. }));
    }

    #[test]
    fn test_empty_inputs_produce_zero_summary() {
        let result = Analyzer::new()
            .analyze(BTreeMap::new(), BTreeMap::new(), &[], &[])
            .unwrap();
        assert_eq!(result.statistics.total_tables, 0);
        assert_eq!(result.statistics.usage_percentage(), 0.0);
        assert!(result.ledger.is_empty());
    }
}
