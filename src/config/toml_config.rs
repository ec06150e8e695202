use crate::utils::error::{LoaderError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key may be left out.
///
/// ```toml
/// [supabase]
/// url = "${SUPABASE_URL}"
/// key = "${SUPABASE_KEY}"
///
/// [import]
/// file = "family.json"
/// tree_slug = "default"
/// batch_size = 10
/// table = "members"
///
/// [backup]
/// output_dir = "backups"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub supabase: SupabaseSection,
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub backup: BackupSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseSection {
    pub url: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSection {
    pub file: Option<String>,
    pub tree_slug: Option<String>,
    pub batch_size: Option<usize>,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupSection {
    pub output_dir: Option<String>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoaderError::ConfigError {
                    message: format!("config file not found: {}", path.display()),
                }
            } else {
                LoaderError::IoError(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses `content` after replacing `${VAR}` with `lookup(VAR)`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = substitute_env_vars(content, lookup)?;

        toml::from_str(&processed).map_err(|e| LoaderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Unknown variables are left as written.
fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LoaderError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}
