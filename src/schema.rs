use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A raw input value: a number, a string that may hold a number, or anything
/// else (which coerces to 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceRecord {
    #[schemars(description = "Display name of the entity, e.g. 'Alice' or 'Team 1'")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Labels from the root group down to this record, ending with its own label. Required for hierarchical datasets, ignored for flat ones."
    )]
    pub path: Option<Vec<String>>,

    // Monthly values keyed "Jan".."Dec"; any other key is carried but ignored.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl SourceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_path<S: Into<String>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.path = Some(path.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_value(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Vec<SourceRecord>)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// A single cell edit coming from the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditRequest {
    #[schemars(description = "Name of the record being edited")]
    pub target: String,

    #[schemars(description = "'Jan'..'Dec', 'total' or 'average'")]
    pub field: String,

    pub new_value: CellValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Full path of the target in a hierarchical dataset. Needed when the name alone is not unique."
    )]
    pub path: Option<Vec<String>>,
}

impl EditRequest {
    pub fn new(
        target: impl Into<String>,
        field: impl Into<String>,
        new_value: impl Into<CellValue>,
    ) -> Self {
        Self {
            target: target.into(),
            field: field.into(),
            new_value: new_value.into(),
            path: None,
        }
    }

    pub fn at_path<S: Into<String>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.path = Some(path.into_iter().map(Into::into).collect());
        self
    }
}
