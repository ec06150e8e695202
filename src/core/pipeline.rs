use crate::core::batch::BatchLoader;
use crate::core::transform::to_rows;
use crate::core::{
    ConfigProvider, ImportSummary, MemberRecord, MemberRow, MemberStore, Pipeline, Result, Storage,
};
use crate::utils::error::LoaderError;
use serde_json::Value;

/// Reads `path` and checks it holds an array of objects.
pub async fn load_members<S: Storage>(storage: &S, path: &str) -> Result<Vec<MemberRecord>> {
    let bytes = storage.read_file(path).await.map_err(|e| match e {
        LoaderError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            LoaderError::InputNotFound {
                path: path.to_string(),
            }
        }
        other => other,
    })?;

    let document: Value =
        serde_json::from_slice(&bytes).map_err(|source| LoaderError::InvalidJson {
            path: path.to_string(),
            source,
        })?;

    let Value::Array(items) = document else {
        return Err(LoaderError::ValidationError {
            message: format!("{} must contain a JSON array of member objects", path),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(data) => Ok(MemberRecord::new(data)),
            other => Err(LoaderError::ValidationError {
                message: format!(
                    "element {} of {} is {}, expected an object",
                    index,
                    path,
                    json_kind(&other)
                ),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// File -> rows -> batched upserts.
pub struct ImportPipeline<S: Storage, M: MemberStore, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) store: M,
    pub(crate) config: C,
}

impl<S: Storage, M: MemberStore, C: ConfigProvider> ImportPipeline<S, M, C> {
    pub fn new(storage: S, store: M, config: C) -> Self {
        Self {
            storage,
            store,
            config,
        }
    }

    pub fn store(&self) -> &M {
        &self.store
    }
}

#[async_trait::async_trait]
impl<S: Storage, M: MemberStore, C: ConfigProvider> Pipeline for ImportPipeline<S, M, C> {
    fn tree_slug(&self) -> &str {
        self.config.tree_slug()
    }

    async fn extract(&self) -> Result<Vec<MemberRecord>> {
        let path = self.config.input_file();
        tracing::debug!("Reading members from {}", path);

        let records = load_members(&self.storage, path).await?;

        let missing_ids = records.iter().filter(|r| !r.has_id()).count();
        if missing_ids > 0 {
            tracing::warn!("{} member(s) have no id and will likely be rejected", missing_ids);
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<MemberRecord>) -> Result<Vec<MemberRow>> {
        Ok(to_rows(&data, self.config.tree_slug()))
    }

    async fn load(&self, rows: Vec<MemberRow>) -> Result<ImportSummary> {
        let loader = BatchLoader::new(&self.store, self.config.table(), self.config.batch_size());
        Ok(loader.run(rows).await)
    }
}
