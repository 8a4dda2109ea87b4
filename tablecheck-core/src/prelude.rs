//! Convenient imports for the common analysis workflow.
//!
//! ```rust,ignore
//! use tablecheck_core::prelude::*;
//!
//! let data = load_all(&config)?;
//! let result = Analyzer::new().analyze(
//!     data.tables,
//!     data.objects,
//!     &data.table_dependencies,
//!     &data.object_dependencies,
//! )?;
//! ```

pub use crate::analyzer::{AnalysisResult, Analyzer};
pub use crate::config::AnalysisConfig;
pub use crate::error::{TablecheckError, TablecheckResult};
pub use crate::model::{
    DatabaseObject, ObjectDependency, ObjectId, ObjectReference, ObjectType, Table,
    TableDependency, TableId,
};
pub use crate::parse::{load_all, DataSet};
pub use crate::stats::AnalysisStatistics;
