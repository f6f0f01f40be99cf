use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SourceError};

/// One corpus entry: a JSON object with at least a `content` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Field holding the raw text to tokenize.
    pub const TEXT_FIELD: &'static str = "content";

    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_content(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(Self::TEXT_FIELD.to_string(), Value::String(text.into()));
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Result<&str> {
        match self.fields.get(field) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(SourceError::NotText(field.to_string())),
            None => Err(SourceError::MissingField(field.to_string())),
        }
    }

    pub fn content(&self) -> Result<&str> {
        self.text(Self::TEXT_FIELD)
    }
}
