use crate::config::Overrides;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "family-loader")]
#[command(about = "Import and maintain family-tree members in Supabase")]
pub struct Cli {
    /// Optional TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Supabase project URL (overrides SUPABASE_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Supabase access key (overrides SUPABASE_KEY)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Family tree the command works on
    #[arg(long, global = true)]
    pub tree_slug: Option<String>,

    /// Destination table
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upsert members from a JSON file (default)
    Import(ImportArgs),
    /// Delete every member of the tree
    Delete,
    /// Write every tree to <output-dir>/<date>/<slug>.json
    Backup(BackupArgs),
    /// List tree slugs and their member counts
    Slugs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ImportArgs {
    /// JSON array of member objects
    #[arg(short, long)]
    pub file: Option<String>,

    /// Members per upsert request
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct BackupArgs {
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl Cli {
    /// Subcommand to run; a bare invocation imports with defaults.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Import(ImportArgs::default()))
    }

    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            supabase_url: self.url.clone(),
            supabase_key: self.key.clone(),
            tree_slug: self.tree_slug.clone(),
            table: self.table.clone(),
            ..Overrides::default()
        };

        match &self.command {
            Some(Command::Import(args)) => {
                overrides.input_file = args.file.clone();
                overrides.batch_size = args.batch_size;
            }
            Some(Command::Backup(args)) => {
                overrides.backup_dir = args.output_dir.clone();
            }
            _ => {}
        }

        overrides
    }
}
