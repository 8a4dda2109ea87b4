//! Data model for tables, database objects, and dependency edges.
//!
//! All constructors validate their inputs: ids must be non-zero, names
//! non-empty, and object types one of the four Access categories. Invalid
//! records never make it past construction, so the analysis stages can rely
//! on well-formed values throughout.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{TablecheckError, TablecheckResult};

/// Identifier of a table in the export. Always non-zero.
pub type TableId = u32;

/// Identifier of a database object in the export. Always non-zero.
pub type ObjectId = u32;

/// Category of a database object in an Access export.
///
/// Exports are inconsistent about pluralization ("Form" vs "Forms");
/// both spellings map to the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ObjectType {
    Form,
    Query,
    Macro,
    Report,
}

impl ObjectType {
    /// All categories, in display order.
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Form,
        ObjectType::Query,
        ObjectType::Macro,
        ObjectType::Report,
    ];

    /// Canonical name used in reports and the type distribution.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::Query => "Query",
            Self::Macro => "Macro",
            Self::Report => "Report",
        }
    }

    /// CSS class used by the HTML report.
    pub fn css_class(&self) -> String {
        format!("object-{}", self.as_str().to_lowercase())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = TablecheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "form" | "forms" => Ok(Self::Form),
            "query" | "queries" => Ok(Self::Query),
            "macro" | "macros" => Ok(Self::Macro),
            "report" | "reports" => Ok(Self::Report),
            other => Err(TablecheckError::validation(format!(
                "unrecognized object type: '{}'",
                other
            ))),
        }
    }
}

/// A reference from a database object to a table, attached to the table
/// during graph enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReference {
    pub object_id: ObjectId,
    pub object_name: String,
    pub object_type: ObjectType,
    /// Only active edges produce references, so this is `true` for every
    /// reference the graph builder attaches. Kept on the record so reporting
    /// does not have to re-derive it.
    pub active: bool,
}

impl ObjectReference {
    pub fn new(
        object_id: ObjectId,
        object_name: impl Into<String>,
        object_type: ObjectType,
        active: bool,
    ) -> TablecheckResult<Self> {
        let object_name = object_name.into();
        if object_id == 0 {
            return Err(TablecheckError::validation("object reference with id 0"));
        }
        if object_name.trim().is_empty() {
            return Err(TablecheckError::validation(format!(
                "object reference {} has an empty name",
                object_id
            )));
        }
        Ok(Self {
            object_id,
            object_name,
            object_type,
            active,
        })
    }

    /// Formatted display name with type, e.g. "Form: CustomerForm".
    pub fn display_name(&self) -> String {
        format!("{}: {}", self.object_type, self.object_name)
    }
}

/// A database table and its usage verdict.
///
/// Created with `is_used = false` and no references; the analyzer attaches
/// references and flips the verdict exactly once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub table_id: TableId,
    pub table_name: String,
    pub is_used: bool,
    pub referencing_objects: Vec<ObjectReference>,
}

impl Table {
    pub fn new(table_id: TableId, table_name: impl Into<String>) -> TablecheckResult<Self> {
        let table_name = table_name.into();
        if table_id == 0 {
            return Err(TablecheckError::validation("table with id 0"));
        }
        if table_name.trim().is_empty() {
            return Err(TablecheckError::validation(format!(
                "table {} has an empty name",
                table_id
            )));
        }
        Ok(Self {
            table_id,
            table_name,
            is_used: false,
            referencing_objects: Vec::new(),
        })
    }

    /// Human-readable status for reports.
    pub fn status(&self) -> &'static str {
        if self.is_used {
            "Used"
        } else {
            "Unused"
        }
    }

    pub fn reference_count(&self) -> usize {
        self.referencing_objects.len()
    }
}

/// A database object (Form, Query, Macro, Report). Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseObject {
    pub object_id: ObjectId,
    pub object_name: String,
    pub object_type: ObjectType,
}

impl DatabaseObject {
    pub fn new(
        object_id: ObjectId,
        object_name: impl Into<String>,
        object_type: ObjectType,
    ) -> TablecheckResult<Self> {
        let object_name = object_name.into();
        if object_id == 0 {
            return Err(TablecheckError::validation("database object with id 0"));
        }
        if object_name.trim().is_empty() {
            return Err(TablecheckError::validation(format!(
                "database object {} has an empty name",
                object_id
            )));
        }
        Ok(Self {
            object_id,
            object_name,
            object_type,
        })
    }
}

/// Dependency edge: an object references a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDependency {
    pub object_id: ObjectId,
    pub table_id: TableId,
    pub active: bool,
}

impl TableDependency {
    pub fn new(object_id: ObjectId, table_id: TableId, active: bool) -> TablecheckResult<Self> {
        if object_id == 0 || table_id == 0 {
            return Err(TablecheckError::validation(format!(
                "table dependency with zero id (object {}, table {})",
                object_id, table_id
            )));
        }
        Ok(Self {
            object_id,
            table_id,
            active,
        })
    }
}

/// Dependency edge: the source object depends on / invokes the target object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectDependency {
    pub source_object_id: ObjectId,
    pub target_object_id: ObjectId,
    pub active: bool,
}

impl ObjectDependency {
    pub fn new(
        source_object_id: ObjectId,
        target_object_id: ObjectId,
        active: bool,
    ) -> TablecheckResult<Self> {
        if source_object_id == 0 || target_object_id == 0 {
            return Err(TablecheckError::validation(format!(
                "object dependency with zero id ({} -> {})",
                source_object_id, target_object_id
            )));
        }
        Ok(Self {
            source_object_id,
            target_object_id,
            active,
        })
    }
}
