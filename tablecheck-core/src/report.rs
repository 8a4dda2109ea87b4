//! Console output formatting - plaintext and JSON.

use serde_json::json;

use crate::analyzer::AnalysisResult;
use crate::stats::AnalysisStatistics;

/// Formats the one-screen result summary.
pub fn format_summary(result: &AnalysisResult) -> String {
    format!(
        "{}\n  Processing Time: {:.3}s",
        result.statistics.summary_text(),
        result.processing_time.as_secs_f64()
    )
}

/// Formats the unused-table listing, one table per line.
pub fn format_unused_tables(result: &AnalysisResult) -> String {
    let unused = result.unused_tables();
    if unused.is_empty() {
        return "No unused tables found.".to_string();
    }
    let mut out = format!("UNUSED TABLES ({}):\n", unused.len());
    for table in unused {
        out.push_str(&format!("  - {} (id {})\n", table.table_name, table.table_id));
    }
    out.pop();
    out
}

/// Formats the verbose statistics block: type distribution plus the
/// per-table reference breakdown from the ledger.
pub fn format_statistics(result: &AnalysisResult) -> String {
    let stats = &result.statistics;
    let mut out = String::from("OBJECT TYPE DISTRIBUTION:\n");
    if stats.object_type_distribution.is_empty() {
        out.push_str("  (no objects)\n");
    }
    for (type_name, count) in &stats.object_type_distribution {
        out.push_str(&format!("  {:<8} {}\n", type_name, count));
    }

    out.push_str("\nTABLE REFERENCES:\n");
    let summaries = result.ledger.summaries();
    if summaries.is_empty() {
        out.push_str("  (no references recorded)\n");
    }
    for summary in summaries {
        out.push_str(&format!(
            "  {} - {} total ({} direct, {} indirect)\n",
            summary.table_name,
            summary.total_references,
            summary.direct_references,
            summary.indirect_references
        ));
    }
    out.pop();
    out
}

/// Prints the result in plain text format.
pub fn print_plain(result: &AnalysisResult, verbose: bool) {
    println!("{}", format_summary(result));
    println!();
    println!("{}", format_unused_tables(result));
    if verbose {
        println!();
        println!("{}", format_statistics(result));
    }
}

/// Serializes the result for JSON output.
pub fn to_json(result: &AnalysisResult) -> serde_json::Value {
    let stats: &AnalysisStatistics = &result.statistics;
    json!({
        "statistics": stats,
        "usage_percentage": stats.usage_percentage(),
        "unused_percentage": stats.unused_percentage(),
        "unused_tables": result
            .unused_tables()
            .iter()
            .map(|t| json!({ "table_id": t.table_id, "table_name": t.table_name }))
            .collect::<Vec<_>>(),
        "processing_time_seconds": result.processing_time.as_secs_f64(),
        "timestamp": result.timestamp.to_rfc3339(),
    })
}

/// Prints the result in JSON format.
///
/// Falls back to the plain summary if serialization fails (it should not
/// with these types, but a report must never take the run down).
pub fn print_json(result: &AnalysisResult) {
    match serde_json::to_string_pretty(&to_json(result)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", format_summary(result));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::model::{Table, TableDependency};
    use std::collections::BTreeMap;

    fn sample_result() -> AnalysisResult {
        let tables = BTreeMap::from([
            (1, Table::new(1, "Customers").unwrap()),
            (2, Table::new(2, "Orphan").unwrap()),
        ]);
        let objects = BTreeMap::from([(
            100,
            crate::model::DatabaseObject::new(100, "CustomerForm", crate::model::ObjectType::Form)
                .unwrap(),
        )]);
        Analyzer::new()
            .analyze(
                tables,
                objects,
                &[TableDependency::new(100, 1, true).unwrap()],
                &[],
            )
            .unwrap()
    }

    #[test]
    fn test_format_unused_tables() {
        let result = sample_result();
        let text = format_unused_tables(&result);
        assert!(text.contains("UNUSED TABLES (1):"));
        assert!(text.contains("Orphan"));
        assert!(!text.contains("Customers"));
    }

    #[test]
    fn test_format_statistics_lists_distribution_and_refs() {
        let result = sample_result();
        let text = format_statistics(&result);
        assert!(text.contains("Form"));
        assert!(text.contains("Customers - 1 total (1 direct, 0 indirect)"));
    }

    #[test]
    fn test_json_shape() {
        let result = sample_result();
        let value = to_json(&result);
        assert_eq!(value["statistics"]["total_tables"], 2);
        assert_eq!(value["statistics"]["used_tables"], 1);
        assert_eq!(value["unused_tables"][0]["table_name"], "Orphan");
        assert!(value["usage_percentage"].as_f64().unwrap() > 49.0);
    }
}
