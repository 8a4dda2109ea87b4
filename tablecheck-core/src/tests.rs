//! End-to-end test suite for tablecheck-core.
//!
//! Covers the full pipeline on realistic fixtures: direct and transitive
//! usage, inactive edges, cycles, dangling references, and the summary
//! invariants.

use std::collections::BTreeMap;

use crate::prelude::*;
use crate::report;

fn table_map(entries: &[(u32, &str)]) -> BTreeMap<TableId, Table> {
    entries
        .iter()
        .map(|(id, name)| (*id, Table::new(*id, *name).unwrap()))
        .collect()
}

fn object_map(entries: &[(u32, &str, ObjectType)]) -> BTreeMap<ObjectId, DatabaseObject> {
    entries
        .iter()
        .map(|(id, name, ty)| (*id, DatabaseObject::new(*id, *name, *ty).unwrap()))
        .collect()
}

fn table_deps(entries: &[(u32, u32, bool)]) -> Vec<TableDependency> {
    entries
        .iter()
        .map(|(o, t, a)| TableDependency::new(*o, *t, *a).unwrap())
        .collect()
}

fn object_deps(entries: &[(u32, u32, bool)]) -> Vec<ObjectDependency> {
    entries
        .iter()
        .map(|(s, t, a)| ObjectDependency::new(*s, *t, *a).unwrap())
        .collect()
}

/// The four-table fixture: three tables referenced by objects, one orphan,
/// and a main form invoking two of the referencing objects.
fn four_table_fixture() -> (
    BTreeMap<TableId, Table>,
    BTreeMap<ObjectId, DatabaseObject>,
    Vec<TableDependency>,
    Vec<ObjectDependency>,
) {
    (
        table_map(&[
            (1, "Customers"),
            (2, "Orders"),
            (3, "Products"),
            (4, "Unused"),
        ]),
        object_map(&[
            (100, "CustomerForm", ObjectType::Form),
            (101, "OrderQuery", ObjectType::Query),
            (102, "ProductReport", ObjectType::Report),
            (103, "MainForm", ObjectType::Form),
        ]),
        table_deps(&[(100, 1, true), (101, 2, true), (102, 3, true)]),
        object_deps(&[(103, 100, true), (103, 101, true)]),
    )
}

#[test]
fn test_four_table_scenario() {
    let (tables, objects, tdeps, odeps) = four_table_fixture();
    let result = Analyzer::new()
        .analyze(tables, objects, &tdeps, &odeps)
        .unwrap();

    assert!(result.tables[&1].is_used);
    assert!(result.tables[&2].is_used);
    assert!(result.tables[&3].is_used);
    assert!(!result.tables[&4].is_used);

    let stats = &result.statistics;
    assert_eq!(stats.total_tables, 4);
    assert_eq!(stats.used_tables, 3);
    assert_eq!(stats.unused_tables, 1);
    assert_eq!(stats.unused_table_ids, vec![4]);
    assert_eq!(stats.total_objects, 4);
    assert_eq!(stats.object_type_distribution["Form"], 2);
    assert_eq!(stats.object_type_distribution["Query"], 1);
    assert_eq!(stats.object_type_distribution["Report"], 1);
}

#[test]
fn test_inactive_only_dependency() {
    // A single inactive edge: the table stays unused, but the edge still
    // shows up in the raw dependency totals.
    let result = Analyzer::new()
        .analyze(
            table_map(&[(1, "Customers")]),
            object_map(&[(101, "OrderQuery", ObjectType::Query)]),
            &table_deps(&[(101, 1, false)]),
            &[],
        )
        .unwrap();

    assert!(!result.tables[&1].is_used);
    assert_eq!(result.statistics.total_dependencies, 1);
    assert_eq!(result.statistics.active_dependencies, 0);
    assert_eq!(result.statistics.unused_tables, 1);
}

#[test]
fn test_object_dependency_cycle_terminates() {
    let result = Analyzer::new()
        .analyze(
            table_map(&[(1, "Customers")]),
            object_map(&[
                (100, "A", ObjectType::Form),
                (101, "B", ObjectType::Macro),
                (102, "C", ObjectType::Query),
            ]),
            &table_deps(&[(100, 1, true)]),
            &object_deps(&[(100, 101, true), (101, 102, true), (102, 100, true)]),
        )
        .unwrap();

    assert!(result.tables[&1].is_used);
    assert_eq!(result.statistics.used_tables, 1);
    // No duplicate references from revisiting the cycle.
    assert_eq!(result.tables[&1].referencing_objects.len(), 1);
}

#[test]
fn test_empty_inputs() {
    let result = Analyzer::new()
        .analyze(BTreeMap::new(), BTreeMap::new(), &[], &[])
        .unwrap();

    assert_eq!(result.statistics.total_tables, 0);
    assert_eq!(result.statistics.usage_percentage(), 0.0);
    assert_eq!(result.statistics.unused_percentage(), 0.0);
    assert!(result.statistics.most_referenced_table.is_none());
    assert!(result.unused_tables().is_empty());
}

#[test]
fn test_used_plus_unused_equals_total() {
    let (tables, objects, tdeps, odeps) = four_table_fixture();
    let result = Analyzer::new()
        .analyze(tables, objects, &tdeps, &odeps)
        .unwrap();
    let stats = &result.statistics;
    assert_eq!(stats.used_tables + stats.unused_tables, stats.total_tables);
}

#[test]
fn test_pipeline_is_idempotent() {
    let (tables, objects, tdeps, odeps) = four_table_fixture();
    let first = Analyzer::new()
        .analyze(tables.clone(), objects.clone(), &tdeps, &odeps)
        .unwrap();
    let second = Analyzer::new()
        .analyze(tables, objects, &tdeps, &odeps)
        .unwrap();

    assert_eq!(first.tables, second.tables);
    assert_eq!(first.statistics, second.statistics);
}

#[test]
fn test_dangling_edges_do_not_halt_the_run() {
    let result = Analyzer::new()
        .analyze(
            table_map(&[(1, "Customers")]),
            object_map(&[(100, "CustomerForm", ObjectType::Form)]),
            // Edges into unknown table 77 and from unknown object 999.
            &table_deps(&[(100, 1, true), (100, 77, true), (999, 1, true)]),
            &object_deps(&[(999, 100, true)]),
        )
        .unwrap();

    assert!(result.tables[&1].is_used);
    // Unknown object 999 produced no reference on table 1.
    assert_eq!(result.tables[&1].referencing_objects.len(), 1);
    assert_eq!(result.statistics.total_dependencies, 3);
}

#[test]
fn test_most_referenced_table() {
    let result = Analyzer::new()
        .analyze(
            table_map(&[(1, "Customers"), (2, "Orders")]),
            object_map(&[
                (100, "F1", ObjectType::Form),
                (101, "F2", ObjectType::Form),
                (102, "Q1", ObjectType::Query),
            ]),
            &table_deps(&[(100, 1, true), (101, 1, true), (102, 2, true)]),
            &[],
        )
        .unwrap();

    let most = result.statistics.most_referenced_table.as_ref().unwrap();
    assert_eq!(most.table_id, 1);
    assert_eq!(most.reference_count, 2);
}

#[test]
fn test_transitive_chain_through_intermediate_objects() {
    // 105 -> 104 -> 100, only 100 touches a table.
    let result = Analyzer::new()
        .analyze(
            table_map(&[(1, "Customers"), (2, "Orphan")]),
            object_map(&[
                (100, "Leaf", ObjectType::Query),
                (104, "Middle", ObjectType::Macro),
                (105, "Top", ObjectType::Form),
            ]),
            &table_deps(&[(100, 1, true)]),
            &object_deps(&[(105, 104, true), (104, 100, true)]),
        )
        .unwrap();

    assert!(result.tables[&1].is_used);
    assert!(!result.tables[&2].is_used);
}

#[test]
fn test_include_inactive_flips_the_verdict() {
    let tables = table_map(&[(1, "Customers")]);
    let objects = object_map(&[(101, "OrderQuery", ObjectType::Query)]);
    let deps = table_deps(&[(101, 1, false)]);

    let strict = Analyzer::new()
        .analyze(tables.clone(), objects.clone(), &deps, &[])
        .unwrap();
    assert!(!strict.tables[&1].is_used);

    let lenient = Analyzer::new()
        .include_inactive(true)
        .analyze(tables, objects, &deps, &[])
        .unwrap();
    assert!(lenient.tables[&1].is_used);
    // Raw totals are unaffected by the toggle.
    assert_eq!(lenient.statistics.active_dependencies, 0);
    assert_eq!(lenient.statistics.total_dependencies, 1);
}

#[test]
fn test_report_formats_cover_the_result() {
    let (tables, objects, tdeps, odeps) = four_table_fixture();
    let result = Analyzer::new()
        .analyze(tables, objects, &tdeps, &odeps)
        .unwrap();

    let summary = report::format_summary(&result);
    assert!(summary.contains("Total Tables: 4"));
    assert!(summary.contains("Used Tables: 3 (75.0%)"));

    let unused = report::format_unused_tables(&result);
    assert!(unused.contains("Unused"));

    let json = report::to_json(&result);
    assert_eq!(json["statistics"]["unused_table_ids"][0], 4);
}
