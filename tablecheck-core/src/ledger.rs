//! Diagnostic ledger of individual table-reference events.
//!
//! The analyzer records one event per (table, referencing object) pair it
//! attaches during a run. The ledger duplicates information already present
//! on the labeled tables; nothing in the verdict path reads it. Verbose
//! reporting uses the per-table summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{ObjectId, ObjectType, TableId};

/// How the recorded reference reached the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceKind {
    /// The object has an active table-dependency edge to the table.
    Direct,
    /// The table was reached through an object-dependency chain.
    Indirect,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Indirect => "indirect",
        }
    }
}

/// A single recorded reference event.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecord {
    pub table_id: TableId,
    pub table_name: String,
    pub object_id: ObjectId,
    pub object_name: String,
    pub object_type: ObjectType,
    pub kind: ReferenceKind,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregated view of one table's recorded references.
#[derive(Debug, Clone, Serialize)]
pub struct TableUsageSummary {
    pub table_id: TableId,
    pub table_name: String,
    pub total_references: usize,
    pub direct_references: usize,
    pub indirect_references: usize,
    /// Reference count per referencing object type.
    pub references_by_type: BTreeMap<String, usize>,
}

/// Append-only collection of reference events, indexed by table.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    records: Vec<UsageRecord>,
    by_table: BTreeMap<TableId, Vec<usize>>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference event, stamped with the current time.
    pub fn record(
        &mut self,
        table_id: TableId,
        table_name: &str,
        object_id: ObjectId,
        object_name: &str,
        object_type: ObjectType,
        kind: ReferenceKind,
    ) {
        let index = self.records.len();
        self.records.push(UsageRecord {
            table_id,
            table_name: table_name.to_string(),
            object_id,
            object_name: object_name.to_string(),
            object_type,
            kind,
            recorded_at: Utc::now(),
        });
        self.by_table.entry(table_id).or_default().push(index);
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary for one table, or `None` if nothing was recorded for it.
    pub fn summary_for(&self, table_id: TableId) -> Option<TableUsageSummary> {
        let indexes = self.by_table.get(&table_id)?;
        let mut summary = TableUsageSummary {
            table_id,
            table_name: String::new(),
            total_references: 0,
            direct_references: 0,
            indirect_references: 0,
            references_by_type: BTreeMap::new(),
        };
        for &i in indexes {
            let record = &self.records[i];
            summary.table_name = record.table_name.clone();
            summary.total_references += 1;
            match record.kind {
                ReferenceKind::Direct => summary.direct_references += 1,
                ReferenceKind::Indirect => summary.indirect_references += 1,
            }
            *summary
                .references_by_type
                .entry(record.object_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        Some(summary)
    }

    /// Summaries for every table with at least one record, in id order.
    pub fn summaries(&self) -> Vec<TableUsageSummary> {
        self.by_table
            .keys()
            .filter_map(|&id| self.summary_for(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_summarize() {
        let mut ledger = UsageLedger::new();
        ledger.record(1, "Customers", 100, "CustomerForm", ObjectType::Form, ReferenceKind::Direct);
        ledger.record(1, "Customers", 101, "OrderQuery", ObjectType::Query, ReferenceKind::Direct);
        ledger.record(1, "Customers", 103, "MainForm", ObjectType::Form, ReferenceKind::Indirect);

        assert_eq!(ledger.len(), 3);
        let summary = ledger.summary_for(1).unwrap();
        assert_eq!(summary.table_name, "Customers");
        assert_eq!(summary.total_references, 3);
        assert_eq!(summary.direct_references, 2);
        assert_eq!(summary.indirect_references, 1);
        assert_eq!(summary.references_by_type["Form"], 2);
        assert_eq!(summary.references_by_type["Query"], 1);
    }

    #[test]
    fn test_unknown_table_has_no_summary() {
        let ledger = UsageLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.summary_for(42).is_none());
        assert!(ledger.summaries().is_empty());
    }

    #[test]
    fn test_summaries_come_out_in_table_id_order() {
        let mut ledger = UsageLedger::new();
        ledger.record(9, "Z", 1, "A", ObjectType::Macro, ReferenceKind::Direct);
        ledger.record(2, "B", 1, "A", ObjectType::Macro, ReferenceKind::Direct);
        let ids: Vec<_> = ledger.summaries().iter().map(|s| s.table_id).collect();
        assert_eq!(ids, vec![2, 9]);
    }
}
