use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::schema::DatasetSchema;

const DEFAULTS: &str = include_str!("../datasets.toml");
const ENV_PREFIX: &str = "SGFG";

#[derive(Debug, Clone, Deserialize)]
pub struct SectorAlias {
    pub from: String,
    pub to: String,
}

/// Runtime settings: embedded defaults, then an optional user file, then `SGFG_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// File names the standardizer always reads tab-delimited.
    #[serde(default)]
    pub tab_delimited_files: Vec<String>,
    pub json_blob_path: Vec<String>,
    pub combined_file: String,
    pub datasets: Vec<DatasetSchema>,
    #[serde(default)]
    pub sector_aliases: Vec<SectorAlias>,
}

impl Settings {
    pub fn load(user_file: Option<&Path>) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));
        if let Some(path) = user_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to assemble settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        debug!(
            datasets = settings.datasets.len(),
            data_dir = %settings.data_dir.display(),
            "Settings loaded"
        );
        Ok(settings)
    }

    pub fn is_tab_delimited(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.tab_delimited_files.iter().any(|f| name.ends_with(f.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let s = Settings::load(None).unwrap();
        assert_eq!(s.json_blob_path, vec!["data", "chartData"]);
        assert_eq!(s.datasets.len(), 6);
        assert!(s.sector_aliases.iter().any(|a| a.from == "IT & Software" && a.to == "Technology"));
    }

    #[test]
    fn tab_delimited_by_name() {
        let s = Settings::load(None).unwrap();
        assert!(s.is_tab_delimited(Path::new("data/2025.csv")));
        assert!(!s.is_tab_delimited(Path::new("data/2024.csv")));
    }

    #[test]
    fn user_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.toml");
        std::fs::write(&path, "data_dir = \"/tmp/elsewhere\"\n").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/tmp/elsewhere"));
        assert_eq!(s.datasets.len(), 6);
    }
}
