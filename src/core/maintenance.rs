//! Tree-level housekeeping: wiping one tree, dumping every tree to disk and
//! listing which trees exist.

use crate::core::{
    BackupFile, BackupReport, Confirm, DeleteRun, MemberStore, Result, SlugCount, Storage,
};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Directory name used for rows without a tree slug.
pub const LEGACY_SLUG: &str = "legacy";

pub async fn delete_tree<M, C>(store: &M, confirm: &C, table: &str, tree_slug: &str) -> Result<DeleteRun>
where
    M: MemberStore + ?Sized,
    C: Confirm + ?Sized,
{
    let count = store.count(table, Some(tree_slug)).await?;
    println!("📊 Found {} members in tree \"{}\"", count, tree_slug);

    if count == 0 {
        return Ok(DeleteRun::Empty);
    }

    let prompt = format!(
        "⚠️  WARNING! This will delete ALL {} members of tree \"{}\".\n   This cannot be undone!",
        count, tree_slug
    );
    if !confirm.confirm(&prompt)? {
        tracing::info!("Delete cancelled by operator");
        return Ok(DeleteRun::Cancelled);
    }

    store.delete_tree(table, tree_slug).await?;
    tracing::info!(tree_slug, count, "Deleted tree");
    Ok(DeleteRun::Deleted { count })
}

/// Buckets rows by `tree_slug`; missing or null slugs go to [`LEGACY_SLUG`].
pub fn group_by_slug(rows: Vec<Map<String, Value>>) -> BTreeMap<String, Vec<Map<String, Value>>> {
    let mut trees: BTreeMap<String, Vec<Map<String, Value>>> = BTreeMap::new();
    for row in rows {
        let slug = match row.get("tree_slug") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => LEGACY_SLUG.to_string(),
        };
        trees.entry(slug).or_default().push(row);
    }
    trees
}

fn file_name(slug: &str) -> String {
    let safe: String = slug
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.json", safe)
}

/// Writes `<date>/<slug>.json` for every tree through `storage`.
pub async fn backup_trees<M, S>(store: &M, storage: &S, table: &str, date: NaiveDate) -> Result<BackupReport>
where
    M: MemberStore + ?Sized,
    S: Storage,
{
    let rows = store.fetch_all(table, "*").await?;
    tracing::info!("Fetched {} rows for backup", rows.len());

    let directory = date.format("%Y-%m-%d").to_string();
    let mut report = BackupReport {
        directory: directory.clone(),
        files: Vec::new(),
    };

    for (slug, members) in group_by_slug(rows) {
        let path = format!("{}/{}", directory, file_name(&slug));
        let json = serde_json::to_vec_pretty(&members)?;
        let written = storage.write_file(&path, &json).await?;
        println!("💾 Saved backup for: {} ({} members)", slug, members.len());

        report.files.push(BackupFile {
            slug,
            rows: members.len(),
            path: written,
        });
    }

    Ok(report)
}

/// Distinct slugs in first-seen order, each with its exact count.
pub async fn slug_counts<M>(store: &M, table: &str) -> Result<Vec<SlugCount>>
where
    M: MemberStore + ?Sized,
{
    let rows = store.fetch_all(table, "tree_slug").await?;

    let mut slugs: Vec<Option<String>> = Vec::new();
    for row in rows {
        let slug = row
            .get("tree_slug")
            .and_then(Value::as_str)
            .map(str::to_string);
        if !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }

    let mut counts = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let count = store.count(table, slug.as_deref()).await?;
        counts.push(SlugCount { slug, count });
    }
    Ok(counts)
}
