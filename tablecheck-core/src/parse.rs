//! Ingestion of Microsoft Access XML exports.
//!
//! The exports are flat record lists under a `dataroot` element, usually in
//! the `od:` (officedata) namespace but sometimes without any namespace at
//! all. Matching on local names covers both. Malformed records are dropped
//! with a warning; duplicate ids keep the first occurrence. Anything that
//! survives ingestion satisfies the model invariants.
//!
//! Expected files and record shapes:
//! - `Analysis_Tables`:            TableID, TableName
//! - `Analysis_Objects`:           ObjectID, ObjectName, ObjectType
//! - `Analysis_TableDependencies`: ObjectID, TableID, Active
//! - `Analysis_ObjectDependencies`: SourceObjectID (or ParentObjectID),
//!                                  TargetObjectID (or ChildObjectID), Active

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::{IoResultExt, TablecheckError, TablecheckResult};
use crate::model::{
    DatabaseObject, ObjectDependency, ObjectId, ObjectType, Table, TableDependency, TableId,
};

/// Everything the analyzer consumes, fully materialized.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub tables: BTreeMap<TableId, Table>,
    pub objects: BTreeMap<ObjectId, DatabaseObject>,
    pub table_dependencies: Vec<TableDependency>,
    pub object_dependencies: Vec<ObjectDependency>,
}

/// One flat record from an export file: child element local name -> text.
type Record = BTreeMap<String, String>;

/// Parses all four input files. The files are independent, so the two
/// entity files and the two dependency files load as parallel pairs.
pub fn load_all(config: &AnalysisConfig) -> TablecheckResult<DataSet> {
    let ((tables, objects), (table_dependencies, object_dependencies)) = rayon::join(
        || {
            rayon::join(
                || parse_tables(&config.tables_file),
                || parse_objects(&config.objects_file),
            )
        },
        || {
            rayon::join(
                || parse_table_dependencies(&config.table_dependencies_file),
                || parse_object_dependencies(&config.object_dependencies_file),
            )
        },
    );
    let dataset = DataSet {
        tables: tables?,
        objects: objects?,
        table_dependencies: table_dependencies?,
        object_dependencies: object_dependencies?,
    };
    info!(
        tables = dataset.tables.len(),
        objects = dataset.objects.len(),
        table_deps = dataset.table_dependencies.len(),
        object_deps = dataset.object_dependencies.len(),
        "loaded input data"
    );
    Ok(dataset)
}

/// Parses table definitions. First occurrence wins on duplicate ids.
pub fn parse_tables(path: &Path) -> TablecheckResult<BTreeMap<TableId, Table>> {
    let mut tables = BTreeMap::new();
    for record in read_records(path, "Analysis_Tables")? {
        let Some(id) = get_id(&record, "TableID") else {
            warn!(path = %path.display(), "dropping table record with a missing or invalid id");
            continue;
        };
        let name = get_text(&record, "TableName");
        if name.is_empty() {
            warn!(path = %path.display(), "dropping table record with missing fields");
            continue;
        }
        match Table::new(id, name) {
            Ok(table) => {
                if tables.contains_key(&table.table_id) {
                    warn!(table_id = table.table_id, "duplicate table id, keeping first");
                } else {
                    tables.insert(table.table_id, table);
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "dropping invalid table record"),
        }
    }
    info!(count = tables.len(), path = %path.display(), "parsed tables");
    Ok(tables)
}

/// Parses object definitions. First occurrence wins on duplicate ids.
pub fn parse_objects(path: &Path) -> TablecheckResult<BTreeMap<ObjectId, DatabaseObject>> {
    let mut objects = BTreeMap::new();
    for record in read_records(path, "Analysis_Objects")? {
        let Some(id) = get_id(&record, "ObjectID") else {
            warn!(path = %path.display(), "dropping object record with a missing or invalid id");
            continue;
        };
        let name = get_text(&record, "ObjectName");
        let type_text = get_text(&record, "ObjectType");
        if name.is_empty() || type_text.is_empty() {
            warn!(path = %path.display(), "dropping object record with missing fields");
            continue;
        }
        let object_type: ObjectType = match type_text.parse() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dropping object record");
                continue;
            }
        };
        match DatabaseObject::new(id, name, object_type) {
            Ok(obj) => {
                if objects.contains_key(&obj.object_id) {
                    warn!(object_id = obj.object_id, "duplicate object id, keeping first");
                } else {
                    objects.insert(obj.object_id, obj);
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "dropping invalid object record"),
        }
    }
    info!(count = objects.len(), path = %path.display(), "parsed objects");
    Ok(objects)
}

/// Parses object-to-table dependency edges.
pub fn parse_table_dependencies(path: &Path) -> TablecheckResult<Vec<TableDependency>> {
    let mut deps = Vec::new();
    for record in read_records(path, "Analysis_TableDependencies")? {
        let (Some(object_id), Some(table_id)) =
            (get_id(&record, "ObjectID"), get_id(&record, "TableID"))
        else {
            warn!(path = %path.display(), "dropping table dependency with missing or invalid ids");
            continue;
        };
        let active = get_bool(&record, "Active", true);
        match TableDependency::new(object_id, table_id, active) {
            Ok(dep) => deps.push(dep),
            Err(e) => warn!(path = %path.display(), error = %e, "dropping table dependency"),
        }
    }
    info!(count = deps.len(), path = %path.display(), "parsed table dependencies");
    Ok(deps)
}

/// Parses object-to-object dependency edges. Source/target fields appear
/// under two different tag pairs across export versions.
pub fn parse_object_dependencies(path: &Path) -> TablecheckResult<Vec<ObjectDependency>> {
    let mut deps = Vec::new();
    for record in read_records(path, "Analysis_ObjectDependencies")? {
        let (Some(source), Some(target)) = (
            pick_id(&record, &["SourceObjectID", "ParentObjectID"]),
            pick_id(&record, &["TargetObjectID", "ChildObjectID"]),
        ) else {
            warn!(path = %path.display(), "dropping object dependency with missing or invalid ids");
            continue;
        };
        let active = get_bool(&record, "Active", true);
        match ObjectDependency::new(source, target, active) {
            Ok(dep) => deps.push(dep),
            Err(e) => warn!(path = %path.display(), error = %e, "dropping object dependency"),
        }
    }
    info!(count = deps.len(), path = %path.display(), "parsed object dependencies");
    Ok(deps)
}

/// Reads the flat records matching `record_tag` out of an export file.
///
/// Tag comparison uses local names, so `od:Analysis_Tables` and
/// `Analysis_Tables` both match. Nested structure inside a record is not
/// expected and deeper elements are treated as additional fields.
fn read_records(path: &Path, record_tag: &str) -> TablecheckResult<Vec<Record>> {
    let content = fs::read_to_string(path).with_path(path)?;
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current_record: Option<Record> = None;
    let mut current_field: Option<String> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = local_name(e.local_name().as_ref());
                if !saw_root {
                    saw_root = true;
                    if local != "dataroot" {
                        warn!(path = %path.display(), root = %local, "unexpected root tag");
                    }
                } else if current_record.is_none() {
                    if local == record_tag {
                        current_record = Some(Record::new());
                    }
                } else {
                    current_field = Some(local);
                }
            }
            Ok(Event::Empty(e)) => {
                let local = local_name(e.local_name().as_ref());
                if let Some(record) = current_record.as_mut() {
                    record.entry(local).or_default();
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(record), Some(field)) = (current_record.as_mut(), &current_field) {
                    let text = e
                        .unescape()
                        .map_err(|err| TablecheckError::parse(path, err.to_string()))?;
                    record.insert(field.clone(), text.trim().to_string());
                }
            }
            Ok(Event::End(e)) => {
                let local = local_name(e.local_name().as_ref());
                if current_field.is_some() {
                    current_field = None;
                } else if local == record_tag {
                    if let Some(record) = current_record.take() {
                        records.push(record);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(TablecheckError::parse(path, e.to_string())),
        }
    }
    Ok(records)
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn get_text(record: &Record, tag: &str) -> String {
    record.get(tag).cloned().unwrap_or_default()
}

/// Positive id field; `None` when missing, unparseable, or outside the
/// id range. Checked conversion, never a narrowing cast: an oversized id
/// must drop the record, not alias onto a small id.
fn get_id(record: &Record, tag: &str) -> Option<u32> {
    let text = get_text(record, tag);
    if text.is_empty() {
        return None;
    }
    let value: i64 = match text.parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(tag, value = %text, "invalid integer value");
            return None;
        }
    };
    match u32::try_from(value) {
        Ok(id) if id > 0 => Some(id),
        _ => {
            warn!(tag, value, "id outside the valid range");
            None
        }
    }
}

/// First usable id among several candidate tags.
fn pick_id(record: &Record, tags: &[&str]) -> Option<u32> {
    tags.iter().find_map(|tag| get_id(record, tag))
}

fn get_bool(record: &Record, tag: &str, default: bool) -> bool {
    let text = get_text(record, tag).to_lowercase();
    match text.as_str() {
        "" => default,
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        other => {
            warn!(tag, value = %other, "invalid boolean value, using default");
            default
        }
    }
}
