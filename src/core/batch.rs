use crate::core::{BatchOutcome, ImportSummary, MemberRow, MemberStore};
use crate::domain::model::{truncate_chars, ERROR_MESSAGE_LIMIT};

/// Sends rows to the store in fixed-size chunks, one request at a time.
///
/// A rejected chunk is recorded whole as failed and the loop moves on; rows
/// are never split out of a failed chunk or retried.
pub struct BatchLoader<'a, M: MemberStore + ?Sized> {
    store: &'a M,
    table: &'a str,
    batch_size: usize,
}

impl<'a, M: MemberStore + ?Sized> BatchLoader<'a, M> {
    pub fn new(store: &'a M, table: &'a str, batch_size: usize) -> Self {
        Self {
            store,
            table,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.batch_size)
    }

    pub async fn run(&self, rows: Vec<MemberRow>) -> ImportSummary {
        let total = rows.len();
        let total_batches = self.batch_count(total);
        let mut summary = ImportSummary {
            total,
            total_batches,
            ..ImportSummary::default()
        };

        for (index, chunk) in rows.chunks(self.batch_size).enumerate() {
            let batch = index + 1;
            tracing::debug!("Upserting batch {}/{} ({} rows)", batch, total_batches, chunk.len());

            match self.store.upsert(self.table, chunk).await {
                Ok(()) => {
                    summary.success_count += chunk.len();
                    println!(
                        "✅ Batch {}/{}: {} members imported",
                        batch,
                        total_batches,
                        chunk.len()
                    );
                    summary.batches.push(BatchOutcome::Imported {
                        batch,
                        count: chunk.len(),
                    });
                }
                Err(cause) => {
                    summary.error_count += chunk.len();
                    tracing::warn!(
                        batch,
                        rows = chunk.len(),
                        category = ?cause.category(),
                        "Batch rejected: {}",
                        cause
                    );
                    println!(
                        "❌ Batch {}: {}",
                        batch,
                        truncate_chars(&cause.to_string(), ERROR_MESSAGE_LIMIT)
                    );
                    summary.batches.push(BatchOutcome::Failed {
                        batch,
                        rows: chunk.to_vec(),
                        cause,
                    });
                }
            }
        }

        summary
    }
}
