use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Tag table driving the dbwatcher source restructuring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryMappings {
    #[serde(rename = "group")]
    pub groups: Vec<QueryGroup>,
    /// Elements removed outright, wherever they appear.
    #[serde(default)]
    pub dropped: Vec<String>,
    /// Empty elements appended to the document root.
    #[serde(default)]
    pub appended: Vec<String>,
}

/// Old query elements folded into `<wrapper><query id="..">`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryGroup {
    pub wrapper: String,
    pub query: String,
    pub id: String,
    #[serde(rename = "field")]
    pub fields: Vec<QueryField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryField {
    pub source: String,
    pub target: String,
}

/// Errors returned when loading mapping files.
#[derive(Debug, Error)]
pub enum MappingLoadError {
    #[error("failed to read mappings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse mappings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("mappings file {path} defines no query groups")]
    Empty { path: String },
}

/// Load query mappings from a TOML file.
pub fn load_query_mappings(path: &Path) -> Result<QueryMappings, MappingLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| MappingLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_mappings(&raw, path.display().to_string())
}

/// Built-in mappings for the generation-4 to generation-5 schema change.
pub fn default_query_mappings() -> QueryMappings {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/mappings/dbwatcher.toml"
    ));
    parse_mappings(embedded, "embedded mappings".to_string())
        .unwrap_or_else(|_| fallback_query_mappings())
}

fn parse_mappings(raw: &str, path: String) -> Result<QueryMappings, MappingLoadError> {
    let parsed: QueryMappings = toml::from_str(raw).map_err(|source| MappingLoadError::Parse {
        path: path.clone(),
        source,
    })?;
    if parsed.groups.is_empty() {
        return Err(MappingLoadError::Empty { path });
    }
    Ok(parsed)
}

fn fallback_query_mappings() -> QueryMappings {
    QueryMappings {
        groups: vec![
            group(
                "sqlFull",
                "fullQuery",
                "FULL_SQL",
                &[
                    ("fullCollectSqlPre", "pre"),
                    ("fullCollectSql", "main"),
                    ("fullCollectSqlPost", "post"),
                ],
            ),
            group(
                "sqlIncremental",
                "incrementalQuery",
                "INC_SQL",
                &[
                    ("autoUpdateCheckPre", "pre"),
                    ("updateIdSelectSql", "updateId"),
                    ("incCollectSql", "main"),
                    ("autoUpdateCheckPost", "post"),
                ],
            ),
        ],
        dropped: strings(&[
            "manualUpdateCheckPost",
            "fieldUpdateCollectSqlPre",
            "fieldUpdateCollectSqlPost",
        ]),
        appended: strings(&["sqlFieldUpdate", "sqlDocAdd"]),
    }
}

fn group(wrapper: &str, query: &str, id: &str, fields: &[(&str, &str)]) -> QueryGroup {
    QueryGroup {
        wrapper: wrapper.to_string(),
        query: query.to_string(),
        id: id.to_string(),
        fields: fields
            .iter()
            .map(|(source, target)| QueryField {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
