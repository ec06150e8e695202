#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use toml_config::FileConfig;

pub const PLACEHOLDER_URL: &str = "https://your-project.supabase.co";
pub const PLACEHOLDER_KEY: &str = "your-anon-key-here";
const MASK_MIN_LEN: usize = 12;
pub const DEFAULT_TREE_SLUG: &str = "default";
pub const DEFAULT_TABLE: &str = "members";
pub const DEFAULT_INPUT_FILE: &str = "dummy_family_5_generations.json";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BACKUP_DIR: &str = "backups";

/// Everything a command needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_key: String,
    pub tree_slug: String,
    pub table: String,
    pub input_file: String,
    pub batch_size: usize,
    pub backup_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase_url: PLACEHOLDER_URL.to_string(),
            supabase_key: PLACEHOLDER_KEY.to_string(),
            tree_slug: DEFAULT_TREE_SLUG.to_string(),
            table: DEFAULT_TABLE.to_string(),
            input_file: DEFAULT_INPUT_FILE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            backup_dir: DEFAULT_BACKUP_DIR.to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub tree_slug: Option<String>,
    pub table: Option<String>,
    pub input_file: Option<String>,
    pub batch_size: Option<usize>,
    pub backup_dir: Option<String>,
}

impl Settings {
    /// Defaults, then the optional file, then the process environment, then `overrides`.
    pub fn resolve(file: Option<FileConfig>, overrides: &Overrides) -> Self {
        Self::resolve_with(file, |name| std::env::var(name).ok(), overrides)
    }

    pub fn resolve_with<F>(file: Option<FileConfig>, env: F, overrides: &Overrides) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(file) = file {
            settings.apply_file(file);
        }
        settings.apply_env(env);
        settings.apply_overrides(overrides);
        settings
    }

    fn apply_file(&mut self, file: FileConfig) {
        set_if_some(&mut self.supabase_url, file.supabase.url);
        set_if_some(&mut self.supabase_key, file.supabase.key);
        set_if_some(&mut self.input_file, file.import.file);
        set_if_some(&mut self.tree_slug, file.import.tree_slug);
        set_if_some(&mut self.table, file.import.table);
        set_if_some(&mut self.batch_size, file.import.batch_size);
        set_if_some(&mut self.backup_dir, file.backup.output_dir);
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        set_if_some(&mut self.supabase_url, env("SUPABASE_URL"));
        set_if_some(&mut self.supabase_key, env("SUPABASE_KEY"));
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        set_if_some(&mut self.supabase_url, overrides.supabase_url.clone());
        set_if_some(&mut self.supabase_key, overrides.supabase_key.clone());
        set_if_some(&mut self.tree_slug, overrides.tree_slug.clone());
        set_if_some(&mut self.table, overrides.table.clone());
        set_if_some(&mut self.input_file, overrides.input_file.clone());
        set_if_some(&mut self.batch_size, overrides.batch_size);
        set_if_some(&mut self.backup_dir, overrides.backup_dir.clone());
    }

    /// The key for logs. Keys of 12 characters or fewer are hidden entirely.
    pub fn masked_key(&self) -> String {
        if self.supabase_key.chars().count() <= MASK_MIN_LEN {
            return "***".to_string();
        }
        let visible: String = self.supabase_key.chars().take(6).collect();
        format!("{}***", visible)
    }
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_not_placeholder("SUPABASE_URL", &self.supabase_url, "your-project")?;
        validation::validate_not_placeholder("SUPABASE_KEY", &self.supabase_key, "your-anon-key")?;
        validation::validate_url("SUPABASE_URL", &self.supabase_url)?;
        validation::validate_non_empty_string("SUPABASE_KEY", &self.supabase_key)?;
        validation::validate_non_empty_string("tree_slug", &self.tree_slug)?;
        validation::validate_non_empty_string("table", &self.table)?;
        validation::validate_path("input_file", &self.input_file)?;
        validation::validate_positive_number("batch_size", self.batch_size, 1)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn input_file(&self) -> &str {
        &self.input_file
    }

    fn tree_slug(&self) -> &str {
        &self.tree_slug
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }
}
