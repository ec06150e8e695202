use crate::utils::error::LoaderError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One member object exactly as it appears in the input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberRecord {
    pub data: Map<String, Value>,
}

impl MemberRecord {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Copies the value stored under `key`, or `default` when the key is absent.
    /// A key that is present with `null` stays `null`.
    pub fn field_or(&self, key: &str, default: Value) -> Value {
        self.data.get(key).cloned().unwrap_or(default)
    }

    pub fn has_id(&self) -> bool {
        self.data.get("id").is_some_and(|id| !id.is_null())
    }
}

/// A row of the `members` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRow {
    pub id: Value,
    pub name: Value,
    pub gender: Value,
    pub birth_date: Value,
    pub death_date: Value,
    pub is_deceased: Value,
    pub place_of_birth: Value,
    pub occupation: Value,
    pub education: Value,
    pub address: Value,
    pub phone: Value,
    pub email: Value,
    pub biography: Value,
    pub photo: Value,
    pub children: Value,
    pub parents: Value,
    pub spouses: Value,
    pub tree_slug: String,
}

#[derive(Debug)]
pub enum BatchOutcome {
    Imported {
        batch: usize,
        count: usize,
    },
    Failed {
        batch: usize,
        rows: Vec<MemberRow>,
        cause: LoaderError,
    },
}

impl BatchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Complete,
    Partial,
    Failed,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub total: usize,
    pub total_batches: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub batches: Vec<BatchOutcome>,
}

/// Longest error text kept per failed batch in the summary.
pub const ERROR_MESSAGE_LIMIT: usize = 100;

impl ImportSummary {
    pub fn outcome(&self) -> ImportOutcome {
        if self.success_count == self.total {
            ImportOutcome::Complete
        } else if self.success_count > 0 {
            ImportOutcome::Partial
        } else {
            ImportOutcome::Failed
        }
    }

    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches.iter().filter(|b| b.is_failed())
    }

    /// `Batch <n>: <cause>` for every failed batch, cause truncated.
    pub fn error_messages(&self) -> Vec<String> {
        self.batches
            .iter()
            .filter_map(|outcome| match outcome {
                BatchOutcome::Failed { batch, cause, .. } => Some(format!(
                    "Batch {}: {}",
                    batch,
                    truncate_chars(&cause.to_string(), ERROR_MESSAGE_LIMIT)
                )),
                BatchOutcome::Imported { .. } => None,
            })
            .collect()
    }
}

pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Result of the interactive import command.
#[derive(Debug)]
pub enum ImportRun {
    Cancelled,
    Finished(ImportSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRun {
    Empty,
    Cancelled,
    Deleted { count: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCount {
    pub slug: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    pub slug: String,
    pub rows: usize,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub directory: String,
    pub files: Vec<BackupFile>,
}

impl BackupReport {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }
}
