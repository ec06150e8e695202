pub mod batch;
pub mod engine;
pub mod maintenance;
pub mod pipeline;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    BackupFile, BackupReport, BatchOutcome, DeleteRun, ImportOutcome, ImportRun, ImportSummary,
    MemberRecord, MemberRow, SlugCount,
};
pub use crate::domain::ports::{ConfigProvider, Confirm, MemberStore, Pipeline, Storage};
pub use crate::utils::error::Result;
