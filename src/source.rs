//! Record source - reads the style-guide document
//!
//! The document is a YAML list of mappings. Each key is an entry name and
//! each value holds the entry attributes:
//!
//! ```yaml
//! - utilize:
//!     class: verb
//!     desc: Wordy substitute for "use".
//!     use_it: avoid
//!     type: word
//!     refers: [use]
//! ```
//!
//! Records come back in document order, which later decides the order in
//! which entry identifiers are assigned.

use crate::entry::{NewEntry, UsageRecommendation};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One named entry of the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub name: String,
    pub attributes: RecordAttributes,
}

/// Attribute map of a record, as written in the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordAttributes {
    #[serde(deserialize_with = "scalar_text")]
    pub class: String,
    #[serde(deserialize_with = "scalar_text")]
    pub desc: String,
    #[serde(default, deserialize_with = "usage")]
    pub use_it: UsageRecommendation,
    #[serde(rename = "type", deserialize_with = "scalar_text")]
    pub kind: String,
    #[serde(default, deserialize_with = "reference_names")]
    pub refers: Vec<String>,
}

impl SourceRecord {
    /// Split the record into the entry to insert and its referenced names.
    pub fn into_entry(self) -> (NewEntry, Vec<String>) {
        let RecordAttributes {
            class,
            desc,
            use_it,
            kind,
            refers,
        } = self.attributes;

        let entry = NewEntry {
            name: self.name,
            class,
            desc,
            use_it,
            kind,
        };
        (entry, refers)
    }
}

/// Read and parse the document at `path`.
///
/// The file handle is released before this returns, whether parsing
/// succeeded or not.
pub fn read_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let file = File::open(path).map_err(|source| Error::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value = serde_yaml::from_reader(BufReader::new(file))?;
    let records = records_from_value(document)?;

    tracing::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from document text.
pub fn parse_records(text: &str) -> Result<Vec<SourceRecord>> {
    let document: Value = serde_yaml::from_str(text)?;
    records_from_value(document)
}

fn records_from_value(document: Value) -> Result<Vec<SourceRecord>> {
    let items = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => {
            return Err(Error::MalformedRecord {
                index: 0,
                reason: format!("expected a list of entries, found {}", describe(&other)),
            });
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mapping = match item {
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(Error::MalformedRecord {
                    index,
                    reason: format!("expected a mapping, found {}", describe(&other)),
                });
            }
        };

        // Normally a single key; longer mappings load every key in order.
        for (key, value) in mapping {
            let name = key_text(&key).ok_or_else(|| Error::MalformedRecord {
                index,
                reason: format!("entry name must be a scalar, found {}", describe(&key)),
            })?;

            let attributes: RecordAttributes =
                serde_yaml::from_value(value).map_err(|e| Error::MalformedRecord {
                    index,
                    reason: format!("entry '{}': {}", name, e),
                })?;

            records.push(SourceRecord { name, attributes });
        }
    }

    Ok(records)
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {}",
            describe(&other)
        ))),
    }
}

fn usage<'de, D>(deserializer: D) -> std::result::Result<UsageRecommendation, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(UsageRecommendation::normalize(&value))
}

fn reference_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    names
        .iter()
        .map(|name| {
            key_text(name).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "referenced name must be a scalar, found {}",
                    describe(name)
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GUIDE: &str = r#"
- foo:
    class: c
    desc: d
    use_it: true
    type: t
    refers: [bar]
- bar:
    class: c
    desc: d
    use_it: avoid
    type: t
    refers: []
"#;

    #[test]
    fn test_parse_preserves_order() {
        let records = parse_records(GUIDE).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar"]);
        assert_eq!(records[0].attributes.use_it, UsageRecommendation::Use);
        assert_eq!(records[0].attributes.refers, vec!["bar".to_string()]);
        assert_eq!(records[1].attributes.use_it, UsageRecommendation::Avoid);
    }

    #[test]
    fn test_into_entry_strips_refers() {
        let record = parse_records(GUIDE).unwrap().remove(0);
        let (entry, refers) = record.into_entry();
        assert_eq!(entry.name, "foo");
        assert_eq!(entry.kind, "t");
        assert_eq!(refers, vec!["bar".to_string()]);
    }

    #[test]
    fn test_missing_use_it_and_null_refers() {
        let records = parse_records(
            "- ghost:\n    class: c\n    desc: d\n    type: t\n    refers:\n",
        )
        .unwrap();
        assert_eq!(records[0].attributes.use_it, UsageRecommendation::Unknown);
        assert!(records[0].attributes.refers.is_empty());
    }

    #[test]
    fn test_scalar_attributes_become_text() {
        let records =
            parse_records("- '404':\n    class: 7\n    desc: true\n    type: t\n").unwrap();
        assert_eq!(records[0].name, "404");
        assert_eq!(records[0].attributes.class, "7");
        assert_eq!(records[0].attributes.desc, "true");
    }

    #[test]
    fn test_multi_key_mapping_loads_every_key() {
        let records = parse_records(
            "- a: {class: c, desc: d, type: t}\n  b: {class: c, desc: d, type: t}\n",
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "b");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            parse_records("foo: bar"),
            Err(Error::MalformedRecord { index: 0, .. })
        ));
        assert!(matches!(
            parse_records("- just a string"),
            Err(Error::MalformedRecord { index: 0, .. })
        ));
        assert!(matches!(
            parse_records("- foo: {desc: d, type: t}"),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(parse_records("- [unclosed"), Err(Error::SourceFormat(_))));
    }

    #[test]
    fn test_read_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GUIDE.as_bytes()).unwrap();

        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_records(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(Error::SourceUnreadable { .. })));
    }
}
