use crate::linker::ResolutionMode;
use crate::pipeline::{LoadOptions, LoadPaths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_FILE: &str = "style-guide.yaml";
pub const DEFAULT_SCHEMA_FILE: &str = "db_schema.sql";
pub const DEFAULT_DATABASE_FILE: &str = "writing_style.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StyledbConfig {
    pub source: Option<String>,
    pub schema: Option<String>,
    pub database: Option<String>,
    pub mode: Option<ResolutionMode>,
}

impl StyledbConfig {
    /// Config written by `styledb init`
    pub fn with_defaults() -> Self {
        Self {
            source: Some(DEFAULT_SOURCE_FILE.to_string()),
            schema: Some(DEFAULT_SCHEMA_FILE.to_string()),
            database: Some(DEFAULT_DATABASE_FILE.to_string()),
            mode: Some(ResolutionMode::Lenient),
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct LoadOverrides {
    pub source: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub mode: Option<ResolutionMode>,
}

/// Flag, then config file, then the fixed default.
pub fn resolve_load(
    overrides: LoadOverrides,
    config: Option<&StyledbConfig>,
) -> (LoadPaths, LoadOptions) {
    let defaults = LoadPaths::default();
    let paths = LoadPaths {
        source: overrides
            .source
            .or_else(|| config.and_then(|c| c.source.as_deref()).map(PathBuf::from))
            .unwrap_or(defaults.source),
        schema: overrides
            .schema
            .or_else(|| config.and_then(|c| c.schema.as_deref()).map(PathBuf::from))
            .unwrap_or(defaults.schema),
        database: overrides
            .database
            .or_else(|| config.and_then(|c| c.database.as_deref()).map(PathBuf::from))
            .unwrap_or(defaults.database),
    };

    let options = LoadOptions {
        mode: overrides
            .mode
            .or_else(|| config.and_then(|c| c.mode))
            .unwrap_or_default(),
    };

    (paths, options)
}

/// Database location for read-only commands
pub fn resolve_database(flag: Option<PathBuf>, config: Option<&StyledbConfig>) -> PathBuf {
    flag.or_else(|| config.and_then(|c| c.database.as_deref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE))
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("styledb.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<StyledbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: StyledbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &StyledbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_beats_config_beats_default() {
        let config = StyledbConfig {
            source: Some("guide/custom.yaml".into()),
            database: Some("out/custom.db".into()),
            mode: Some(ResolutionMode::Strict),
            ..Default::default()
        };
        let overrides = LoadOverrides {
            database: Some(PathBuf::from("cli.db")),
            ..Default::default()
        };

        let (paths, options) = resolve_load(overrides, Some(&config));
        assert_eq!(paths.source, PathBuf::from("guide/custom.yaml"));
        assert_eq!(paths.schema, PathBuf::from(DEFAULT_SCHEMA_FILE));
        assert_eq!(paths.database, PathBuf::from("cli.db"));
        assert_eq!(options.mode, ResolutionMode::Strict);
    }

    #[test]
    fn test_no_config_uses_defaults() {
        let (paths, options) = resolve_load(LoadOverrides::default(), None);
        assert_eq!(paths, LoadPaths::default());
        assert_eq!(options.mode, ResolutionMode::Lenient);
        assert_eq!(resolve_database(None, None), PathBuf::from(DEFAULT_DATABASE_FILE));
    }

    #[test]
    fn test_config_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styledb.toml");

        write_config(&path, &StyledbConfig::with_defaults(), false).unwrap();
        assert!(write_config(&path, &StyledbConfig::default(), false).is_err());

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, StyledbConfig::with_defaults());
        assert!(std::fs::read_to_string(&path).unwrap().contains("mode = \"lenient\""));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }
}
