//! tablecheck-core: unused-table detection for Access database exports.
//!
//! This library analyzes the dependency metadata exported from a Microsoft
//! Access database (which forms, queries, macros, and reports reference
//! which tables, and which objects reference other objects) and classifies
//! every table as used or unused.
//!
//! # How it works
//!
//! 1. **Ingestion** ([`parse`]) reads the four XML export files into
//!    validated entity maps and edge lists.
//! 2. **Graph build** ([`graph`]) filters to active edges, builds adjacency
//!    indexes, and attaches each table's direct referencing objects.
//! 3. **Usage propagation** ([`reach`]) marks every table reachable from an
//!    active table reference, directly or through object-dependency chains.
//!    Cyclic object dependencies are handled with a visited-set BFS.
//! 4. **Statistics** ([`stats`]) summarize the labeled graph.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use tablecheck_core::prelude::*;
//!
//! let config = AnalysisConfig::new(
//!     "Analysis_Tables.xml",
//!     "Analysis_Objects.xml",
//!     "Analysis_TableDependencies.xml",
//!     "Analysis_ObjectDependencies.xml",
//! );
//! let data = load_all(&config)?;
//! let result = Analyzer::new().analyze(
//!     data.tables,
//!     data.objects,
//!     &data.table_dependencies,
//!     &data.object_dependencies,
//! )?;
//!
//! for table in result.unused_tables() {
//!     println!("Unused table: {}", table.table_name);
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `html` (default): Enable the self-contained HTML report

pub mod analyzer;
pub mod config;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod parse;
pub mod prelude;
pub mod reach;
pub mod report;
pub mod stats;

#[cfg(feature = "html")]
pub mod html;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{IoResultExt, TablecheckError, TablecheckResult};

// Data model
pub use model::{
    DatabaseObject, ObjectDependency, ObjectId, ObjectReference, ObjectType, Table,
    TableDependency, TableId,
};

// Graph building and usage propagation
pub use graph::{build_graph, DependencyGraph};
pub use reach::{mark_used_tables, propagate_usage, UsageKind, UsageOutcome};

// Analysis
pub use analyzer::{AnalysisResult, Analyzer};

// Statistics
pub use stats::{calculate_statistics, AnalysisStatistics, MostReferencedTable};

// Ingestion
pub use parse::{
    load_all, parse_object_dependencies, parse_objects, parse_table_dependencies, parse_tables,
    DataSet,
};

// Configuration
pub use config::{load_config, AnalysisConfig, OutputConfig, TablecheckConfig};

// Ledger
pub use ledger::{ReferenceKind, TableUsageSummary, UsageLedger, UsageRecord};

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{format_statistics, format_summary, format_unused_tables, print_json, print_plain};

#[cfg(feature = "html")]
pub use html::generate_html_report;

#[cfg(test)]
mod tests;
