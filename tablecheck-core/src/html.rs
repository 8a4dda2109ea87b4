//! Self-contained HTML usage report.
//!
//! Generates a single HTML document with no external assets: summary cards,
//! the object-type distribution, and a per-table usage listing color-coded
//! used/unused. Opens directly in a browser from disk.
//!
//! Performance characteristics:
//! - Row strings are pre-allocated from the table count
//! - Single pass over tables and objects

use crate::analyzer::AnalysisResult;

/// Escape text for embedding in HTML.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Generate the full HTML report for an analysis result.
pub fn generate_html_report(result: &AnalysisResult) -> String {
    let stats = &result.statistics;

    // ~220 bytes per table row.
    let mut rows = String::with_capacity(result.tables.len() * 220);
    for table in result.tables.values() {
        let status_class = if table.is_used { "used" } else { "unused" };
        let refs: Vec<String> = table
            .referencing_objects
            .iter()
            .map(|r| {
                format!(
                    r#"<span class="{}">{}</span>"#,
                    r.object_type.css_class(),
                    escape_html(&r.display_name())
                )
            })
            .collect();
        let refs_cell = if refs.is_empty() {
            "&mdash;".to_string()
        } else {
            refs.join(", ")
        };
        rows.push_str(&format!(
            r#"      <tr class="{}">
        <td>{}</td>
        <td>{}</td>
        <td><span class="badge {}">{}</span></td>
        <td>{}</td>
        <td>{}</td>
      </tr>
"#,
            status_class,
            table.table_id,
            escape_html(&table.table_name),
            status_class,
            table.status(),
            table.reference_count(),
            refs_cell
        ));
    }

    let mut distribution = String::new();
    for (type_name, count) in &stats.object_type_distribution {
        distribution.push_str(&format!(
            r#"      <li><span class="object-{}">{}</span>: {}</li>
"#,
            type_name.to_lowercase(),
            type_name,
            count
        ));
    }
    if distribution.is_empty() {
        distribution.push_str("      <li>(no objects)</li>\n");
    }

    let most_referenced = match &stats.most_referenced_table {
        Some(m) => format!(
            "{} ({} references)",
            escape_html(&m.table_name),
            m.reference_count
        ),
        None => "&mdash;".to_string(),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Tablecheck - Table Usage Report</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
      background: #1a1a2e;
      color: #eee;
      padding: 2rem;
    }}
    h1 {{ margin-bottom: 0.25rem; }}
    .meta {{ color: #8888aa; margin-bottom: 1.5rem; font-size: 0.9rem; }}
    .cards {{ display: flex; gap: 1rem; margin-bottom: 1.5rem; flex-wrap: wrap; }}
    .card {{
      background: #16213e;
      border-radius: 8px;
      padding: 1rem 1.5rem;
      min-width: 10rem;
    }}
    .card .value {{ font-size: 1.8rem; font-weight: bold; }}
    .card .label {{ color: #8888aa; font-size: 0.85rem; }}
    .card.used .value {{ color: #90ee90; }}
    .card.unused .value {{ color: #f08080; }}
    ul {{ list-style: none; margin-bottom: 1.5rem; }}
    li {{ padding: 0.15rem 0; }}
    table {{ width: 100%; border-collapse: collapse; background: #16213e; border-radius: 8px; }}
    th, td {{ padding: 0.5rem 0.75rem; text-align: left; border-bottom: 1px solid #2a2a4a; }}
    th {{ color: #8888aa; font-size: 0.85rem; text-transform: uppercase; }}
    .badge {{ padding: 0.15rem 0.5rem; border-radius: 4px; font-size: 0.8rem; }}
    .badge.used {{ background: #1f4d2e; color: #90ee90; }}
    .badge.unused {{ background: #4d1f1f; color: #f08080; }}
    .object-form {{ color: #7ec8e3; }}
    .object-query {{ color: #c3a6ff; }}
    .object-macro {{ color: #ffd479; }}
    .object-report {{ color: #98fb98; }}
  </style>
</head>
<body>
  <h1>Table Usage Report</h1>
  <div class="meta">Generated {timestamp} &middot; {duration:.3}s</div>

  <div class="cards">
    <div class="card"><div class="value">{total}</div><div class="label">Total Tables</div></div>
    <div class="card used"><div class="value">{used}</div><div class="label">Used ({used_pct:.1}%)</div></div>
    <div class="card unused"><div class="value">{unused}</div><div class="label">Unused ({unused_pct:.1}%)</div></div>
    <div class="card"><div class="value">{objects}</div><div class="label">Database Objects</div></div>
    <div class="card"><div class="value">{active}/{deps}</div><div class="label">Active Dependencies</div></div>
  </div>

  <h2>Object Types</h2>
  <ul>
{distribution}  </ul>
  <div class="meta">Most referenced table: {most_referenced}</div>

  <h2>Tables</h2>
  <table>
    <thead>
      <tr><th>ID</th><th>Name</th><th>Status</th><th>References</th><th>Referencing Objects</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"##,
        timestamp = result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        duration = result.processing_time.as_secs_f64(),
        total = stats.total_tables,
        used = stats.used_tables,
        used_pct = stats.usage_percentage(),
        unused = stats.unused_tables,
        unused_pct = stats.unused_percentage(),
        objects = stats.total_objects,
        active = stats.active_dependencies,
        deps = stats.total_dependencies,
        distribution = distribution,
        most_referenced = most_referenced,
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::model::{DatabaseObject, ObjectType, Table, TableDependency};
    use std::collections::BTreeMap;

    #[test]
    fn test_report_contains_tables_and_statuses() {
        let tables = BTreeMap::from([
            (1, Table::new(1, "Customers").unwrap()),
            (2, Table::new(2, "Orphan<script>").unwrap()),
        ]);
        let objects = BTreeMap::from([(
            100,
            DatabaseObject::new(100, "CustomerForm", ObjectType::Form).unwrap(),
        )]);
        let result = Analyzer::new()
            .analyze(
                tables,
                objects,
                &[TableDependency::new(100, 1, true).unwrap()],
                &[],
            )
            .unwrap();

        let html = generate_html_report(&result);
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Customers"));
        assert!(html.contains("Form: CustomerForm"));
        // Names are escaped, never embedded raw.
        assert!(html.contains("Orphan&lt;script&gt;"));
        assert!(!html.contains("Orphan<script>"));
        assert!(html.contains(r#"class="badge unused""#));
    }

    #[test]
    fn test_report_handles_empty_result() {
        let result = Analyzer::new()
            .analyze(BTreeMap::new(), BTreeMap::new(), &[], &[])
            .unwrap();
        let html = generate_html_report(&result);
        assert!(html.contains("(no objects)"));
        assert!(html.contains("Table Usage Report"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
