use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One schema-free document. Nothing about its shape is enforced here.
pub type Record = Value;

/// Response body of `GET /data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope {
    pub data: Vec<Record>,
}

impl DataEnvelope {
    pub fn new(data: Vec<Record>) -> Self {
        Self { data }
    }
}

/// Map a parsed fallback file onto its records.
///
/// An object whose `data` field is an array yields that array and a bare
/// array yields itself. Every other value yields no records.
pub fn normalize_records(raw: Value) -> Vec<Record> {
    match raw {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
