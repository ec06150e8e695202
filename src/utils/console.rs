use crate::core::{BackupReport, ImportOutcome, ImportSummary, SlugCount};
use std::fmt::Write;

const WIDTH: usize = 60;

pub fn banner(title: &str) -> String {
    let rule = "=".repeat(WIDTH);
    format!("{rule}\n{title}\n{rule}\n")
}

pub fn rule() -> String {
    "=".repeat(WIDTH)
}

pub fn outcome_line(outcome: ImportOutcome) -> &'static str {
    match outcome {
        ImportOutcome::Complete => "🎉 ALL DATA IMPORTED SUCCESSFULLY!",
        ImportOutcome::Partial => "⚠️  PARTIAL IMPORT - Some data failed",
        ImportOutcome::Failed => "❌ IMPORT FAILED - No data was imported",
    }
}

pub fn render_summary(summary: &ImportSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "📊 IMPORT SUMMARY:");
    let _ = writeln!(out, "   Total members:     {}", summary.total);
    let _ = writeln!(out, "   ✅ Success:        {}", summary.success_count);
    let _ = writeln!(out, "   ❌ Failed:         {}", summary.error_count);
    let _ = writeln!(out);

    let errors = summary.error_messages();
    if !errors.is_empty() {
        let _ = writeln!(out, "🔍 Errors:");
        for err in &errors {
            let _ = writeln!(out, "   - {}", err);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", outcome_line(summary.outcome()));
    out
}

pub fn render_slug_counts(counts: &[SlugCount]) -> String {
    if counts.is_empty() {
        return "No members found.\n".to_string();
    }

    let mut out = String::new();
    for entry in counts {
        let _ = writeln!(
            out,
            "Slug: {} -> Count: {}",
            entry.slug.as_deref().unwrap_or("(none)"),
            entry.count
        );
    }
    out
}

pub fn render_backup(report: &BackupReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        let _ = writeln!(out, "   {:<20} {:>6}  {}", file.slug, file.rows, file.path);
    }
    let _ = writeln!(
        out,
        "✅ Backup completed: {} members in {} file(s)",
        report.total_rows(),
        report.files.len()
    );
    out
}
