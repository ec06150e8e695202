use crate::core::{Confirm, ImportRun, Pipeline, Result};

pub struct ImportEngine<P: Pipeline, C: Confirm> {
    pipeline: P,
    confirm: C,
}

impl<P: Pipeline, C: Confirm> ImportEngine<P, C> {
    pub fn new(pipeline: P, confirm: C) -> Self {
        Self { pipeline, confirm }
    }

    pub fn confirmation_prompt(count: usize, tree_slug: &str) -> String {
        format!(
            "⚠️  WARNING:\n   This will import {} members to tree '{}'\n   Make sure the database is clean!",
            count, tree_slug
        )
    }

    /// Load, ask, transform, upsert. Nothing is sent unless the operator agrees.
    pub async fn run(&self) -> Result<ImportRun> {
        // Extract
        let records = self.pipeline.extract().await?;
        println!("✅ Loaded {} members\n", records.len());
        tracing::info!("Loaded {} members", records.len());

        let prompt = Self::confirmation_prompt(records.len(), self.pipeline.tree_slug());
        if !self.confirm.confirm(&prompt)? {
            tracing::info!("Import cancelled by operator");
            return Ok(ImportRun::Cancelled);
        }

        println!();
        println!("🚀 Starting import...");
        println!("{}", "-".repeat(60));

        // Transform
        let rows = self.pipeline.transform(records).await?;

        // Load
        let summary = self.pipeline.load(rows).await?;
        tracing::info!(
            total = summary.total,
            success = summary.success_count,
            failed = summary.error_count,
            "Import finished"
        );

        println!("{}", "-".repeat(60));
        Ok(ImportRun::Finished(summary))
    }
}
