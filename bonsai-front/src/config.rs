//! Site configuration
//!
//! Values are layered: built-in defaults, the base TOML file, an optional
//! per-environment overlay next to it (`bonsai.production.toml` for
//! `bonsai.toml`), then `BONSAI_*` environment variables.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml::{Table, Value};

pub const DEFAULT_CONFIG_FILE: &str = "bonsai.toml";

pub const ENV_ENVIRONMENT: &str = "BONSAI_ENVIRONMENT";
pub const ENV_LISTEN: &str = "BONSAI_LISTEN";
pub const ENV_DATA_DIR: &str = "BONSAI_DATA_DIR";
pub const ENV_LOG: &str = "BONSAI_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("unknown environment: {}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// HTTP listen address.
    pub listen: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Data directory for persistence.
    pub data_dir: PathBuf,
    /// Seed demo pages into an empty store (development only).
    pub seed_demo_pages: bool,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed_demo_pages: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub environment: Environment,
    pub server: ServerSection,
    pub storage: StorageSection,
    pub log: LogSection,
}

impl SiteConfig {
    /// Whether demo pages should be seeded on startup.
    pub fn should_seed(&self) -> bool {
        self.environment.is_development() && self.storage.seed_demo_pages
    }

    /// Apply `BONSAI_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(value) = read(ENV_ENVIRONMENT) {
            self.environment = value
                .parse()
                .with_context(|| format!("invalid {}", ENV_ENVIRONMENT))?;
        }
        if let Some(value) = read(ENV_LISTEN) {
            self.server.listen = value
                .parse()
                .with_context(|| format!("invalid {}: {}", ENV_LISTEN, value))?;
        }
        if let Some(value) = read(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG) {
            self.log.level = value;
        }
        Ok(())
    }
}

/// Load the configuration using the process environment.
pub fn load_config(config_path: &Path) -> Result<SiteConfig> {
    load_config_with(config_path, |name| env::var(name).ok())
}

/// Load the configuration with an explicit environment lookup.
///
/// A missing base file yields the defaults.
pub fn load_config_with<F>(config_path: &Path, lookup: F) -> Result<SiteConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut table = read_table(config_path)?.unwrap_or_default();

    let environment = match lookup(ENV_ENVIRONMENT).filter(|v| !v.trim().is_empty()) {
        Some(value) => value.parse()?,
        None => match table.get("environment") {
            Some(Value::String(value)) => value.parse()?,
            _ => Environment::default(),
        },
    };

    let overlay_path = overlay_path(config_path, environment);
    if let Some(overlay) = read_table(&overlay_path)? {
        merge_tables(&mut table, overlay);
    }

    let mut config: SiteConfig = Value::Table(table)
        .try_into()
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    config.apply_overrides(lookup)?;
    Ok(config)
}

/// `bonsai.toml` becomes `bonsai.<environment>.toml` in the same directory.
pub fn overlay_path(config_path: &Path, environment: Environment) -> PathBuf {
    let stem = config_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bonsai");
    let file_name = match config_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, environment, ext),
        None => format!("{}.{}", stem, environment),
    };
    config_path.with_file_name(file_name)
}

fn read_table(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let table: Table =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(table))
}

/// Recursively merge `overlay` into `base`; overlay values win.
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_child)), Value::Table(overlay_child)) => {
                merge_tables(base_child, overlay_child);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.listen.to_string(), "127.0.0.1:8080");
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.log.level, "info");
        assert!(config.should_seed());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_with(&dir.path().join("bonsai.toml"), no_env).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bonsai.toml",
            "environment = \"production\"\n[server]\nlisten = \"0.0.0.0:80\"\n",
        );

        let config = load_config_with(&path, no_env).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.listen.to_string(), "0.0.0.0:80");
        assert_eq!(config.storage, StorageSection::default());
        assert!(!config.should_seed());
    }

    #[test]
    fn test_environment_overlay_is_merged() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bonsai.toml",
            "environment = \"production\"\n[storage]\ndata_dir = \"base\"\nseed_demo_pages = false\n",
        );
        write(
            &dir,
            "bonsai.production.toml",
            "[storage]\ndata_dir = \"/var/lib/bonsai\"\n",
        );

        let config = load_config_with(&path, no_env).unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/bonsai"));
        assert!(!config.storage.seed_demo_pages);
    }

    #[test]
    fn test_env_overrides_win() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bonsai.toml", "[log]\nlevel = \"warn\"\n");
        write(&dir, "bonsai.production.toml", "[log]\nlevel = \"error\"\n");

        let vars: HashMap<&str, &str> = [
            (ENV_ENVIRONMENT, "prod"),
            (ENV_LISTEN, "127.0.0.1:9000"),
            (ENV_DATA_DIR, "/tmp/bonsai"),
            (ENV_LOG, "  "),
        ]
        .into_iter()
        .collect();
        let config =
            load_config_with(&path, |name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.listen.to_string(), "127.0.0.1:9000");
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/bonsai"));
        assert_eq!(config.log.level, "error");
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bonsai.toml", "environment = \"staging\"\n");
        assert!(load_config_with(&path, no_env).is_err());

        let mut config = SiteConfig::default();
        let result = config.apply_overrides(|name| {
            (name == ENV_LISTEN).then(|| "not-an-address".to_string())
        });
        assert!(result.unwrap_err().to_string().contains(ENV_LISTEN));
    }

    #[test]
    fn test_overlay_path() {
        assert_eq!(
            overlay_path(Path::new("/etc/bonsai.toml"), Environment::Production),
            PathBuf::from("/etc/bonsai.production.toml")
        );
        assert_eq!(
            overlay_path(Path::new("conf"), Environment::Development),
            PathBuf::from("conf.development")
        );
    }
}
