use crate::domain::model::{ImportSummary, MemberRecord, MemberRow};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn tree_slug(&self) -> &str;
    fn table(&self) -> &str;
    fn batch_size(&self) -> usize;
}

/// Asks the operator whether to go ahead.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Remote table access. `tree_slug: None` addresses rows whose slug is null.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn upsert(&self, table: &str, rows: &[MemberRow]) -> Result<()>;
    async fn count(&self, table: &str, tree_slug: Option<&str>) -> Result<u64>;
    async fn delete_tree(&self, table: &str, tree_slug: &str) -> Result<()>;
    async fn fetch_all(&self, table: &str, columns: &str) -> Result<Vec<Map<String, Value>>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn tree_slug(&self) -> &str;
    async fn extract(&self) -> Result<Vec<MemberRecord>>;
    async fn transform(&self, data: Vec<MemberRecord>) -> Result<Vec<MemberRow>>;
    async fn load(&self, rows: Vec<MemberRow>) -> Result<ImportSummary>;
}
