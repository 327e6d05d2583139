//! Bulk import of a JSON array of objects into the `data` collection.
//!
//! Each run appends: nothing is cleared or deduplicated, so importing the
//! same file twice stores every record twice.

use crate::services::database::MongoDb;
use mongodb::bson::{self, Document};
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::path::Path;
use tokio::fs;

/// Read `path` and return its records.
///
/// The file must hold a JSON array whose elements are all objects.
pub async fn load_records(path: &Path) -> Result<Vec<Map<String, Value>>, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "{} not found",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).await?;
    let raw: Value = serde_json::from_str(&contents)?;

    let Value::Array(items) = raw else {
        return Err(AppError::InternalError(anyhow::anyhow!(
            "{} must contain a JSON array of objects",
            path.display()
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(AppError::InternalError(anyhow::anyhow!(
                "record {} in {} is not an object: {}",
                index,
                path.display(),
                other
            ))),
        })
        .collect()
}

/// Convert records to BSON documents.
pub fn to_documents(records: &[Map<String, Value>]) -> Result<Vec<Document>, AppError> {
    records
        .iter()
        .map(|record| {
            bson::to_document(record).map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to convert record to BSON: {}", e))
            })
        })
        .collect()
}

/// Insert every record in a single `insert_many`. Returns how many were written.
pub async fn import_records(
    db: &MongoDb,
    records: &[Map<String, Value>],
) -> Result<usize, AppError> {
    if records.is_empty() {
        tracing::warn!("No records to import");
        return Ok(0);
    }

    let documents = to_documents(records)?;
    let result = db
        .records()
        .insert_many(documents, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert records: {}", e);
            AppError::from(e)
        })?;

    Ok(result.inserted_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("data-service-import-{}-{}.json", tag, Uuid::new_v4()))
    }

    async fn load(tag: &str, contents: &str) -> Result<Vec<Map<String, Value>>, AppError> {
        let path = temp_path(tag);
        fs::write(&path, contents).await.unwrap();
        let result = load_records(&path).await;
        fs::remove_file(&path).await.unwrap();
        result
    }

    #[tokio::test]
    async fn loads_array_of_objects_in_order() {
        let records = load("ok", r#"[{"a": 1}, {"b": "two"}]"#).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["a"], json!(1));
        assert_eq!(records[1]["b"], json!("two"));
    }

    #[tokio::test]
    async fn missing_file_fails() {
        let err = load_records(&temp_path("missing")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_json_fails() {
        assert!(load("bad", "[{").await.is_err());
    }

    #[tokio::test]
    async fn wrapped_object_is_rejected() {
        assert!(load("wrapped", r#"{"data": [{"a": 1}]}"#).await.is_err());
    }

    #[tokio::test]
    async fn non_object_elements_are_rejected() {
        let err = load("scalar", r#"[{"a": 1}, 2]"#).await.unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn converts_nested_values_to_bson() {
        let record = json!({ "title": "x", "tags": ["a"], "meta": { "n": 3 } });
        let Value::Object(map) = record else {
            unreachable!()
        };
        let documents = to_documents(&[map]).unwrap();
        assert_eq!(
            documents[0],
            doc! { "meta": { "n": 3_i64 }, "tags": ["a"], "title": "x" }
        );
    }
}
