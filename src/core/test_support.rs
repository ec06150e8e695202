use crate::core::{MemberRecord, MemberRow, MemberStore, Result, Storage};
use crate::utils::error::LoaderError;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory `MemberStore` that records every upsert and fails the calls
/// whose zero-based index is listed in `fail_calls`.
#[derive(Clone, Default)]
pub struct MockStore {
    pub upserts: Arc<Mutex<Vec<Vec<MemberRow>>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
    pub rows: Arc<Mutex<Vec<Map<String, Value>>>>,
    fail_calls: HashSet<usize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        Self {
            rows: Arc::new(Mutex::new(rows)),
            ..Self::default()
        }
    }

    pub async fn upsert_sizes(&self) -> Vec<usize> {
        self.upserts.lock().await.iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl MemberStore for MockStore {
    async fn upsert(&self, _table: &str, rows: &[MemberRow]) -> Result<()> {
        let mut upserts = self.upserts.lock().await;
        let call = upserts.len();
        upserts.push(rows.to_vec());
        if self.fail_calls.contains(&call) {
            return Err(LoaderError::BackendError {
                status: 409,
                message: format!("conflict in call {}", call),
            });
        }
        Ok(())
    }

    async fn count(&self, _table: &str, tree_slug: Option<&str>) -> Result<u64> {
        let rows = self.rows.lock().await;
        let count = rows
            .iter()
            .filter(|row| row.get("tree_slug").and_then(Value::as_str) == tree_slug)
            .count();
        Ok(count as u64)
    }

    async fn delete_tree(&self, _table: &str, tree_slug: &str) -> Result<()> {
        self.deleted.lock().await.push(tree_slug.to_string());
        self.rows
            .lock()
            .await
            .retain(|row| row.get("tree_slug").and_then(Value::as_str) != Some(tree_slug));
        Ok(())
    }

    async fn fetch_all(&self, _table: &str, columns: &str) -> Result<Vec<Map<String, Value>>> {
        let rows = self.rows.lock().await;
        if columns == "*" {
            return Ok(rows.clone());
        }
        let wanted: Vec<&str> = columns.split(',').collect();
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(k, _)| wanted.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect())
    }
}

/// In-memory `Storage`.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    pub files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub async fn insert(&self, path: &str, data: &[u8]) {
        self.files
            .lock()
            .await
            .insert(path.to_string(), data.to_vec());
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

impl Storage for MemoryStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            LoaderError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(path.to_string())
    }
}

pub fn members(n: usize) -> Vec<MemberRecord> {
    (1..=n)
        .map(|i| {
            let gender = if i % 2 == 0 { "female" } else { "male" };
            serde_json::from_value(json!({
                "id": format!("m-{i:03}"),
                "name": format!("Member {i}"),
                "gender": gender,
            }))
            .unwrap()
        })
        .collect()
}
