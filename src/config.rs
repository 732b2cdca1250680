//! Configuration loading and management
//!
//! Handles parsing of `.studio.toml` configuration files.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{MissingTaskPolicy, StoreOptions, TeamMember};
use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the configuration file at the studio root
pub const CONFIG_FILE: &str = ".studio.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Board configuration
    #[serde(default)]
    pub board: BoardConfig,

    /// Team reference data
    #[serde(default = "default_team")]
    pub team: Vec<TeamMember>,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Board-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Task ID prefix
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// What update/delete/move do when the task id is unknown
    #[serde(default)]
    pub missing_task: MissingTaskPolicy,

    /// Column titles seeded onto every new project board, in display order
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long to wait for the board lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

/// The seven stages every studio project moves through.
pub const DEFAULT_COLUMNS: [&str; 7] = [
    "Discovery",
    "Concept Design",
    "Design Development",
    "Technical Drawings",
    "Client Review",
    "Procurement",
    "Site/Implementation",
];

fn default_id_prefix() -> String {
    "task".to_string()
}

fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|name| name.to_string()).collect()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

pub fn default_team() -> Vec<TeamMember> {
    [
        ("m-1", "Ava Thompson"),
        ("m-2", "Liam Carter"),
        ("m-3", "Sofia Martinez"),
        ("m-4", "Noah Bennett"),
        ("m-5", "Mia Chen"),
    ]
    .into_iter()
    .map(|(id, name)| TeamMember {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            team: default_team(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            missing_task: MissingTaskPolicy::default(),
            columns: default_columns(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `.studio.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.studio.toml` from the studio root. A missing file means
    /// defaults; a present but invalid file is an error.
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!(root = %root.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Options for constructing a [`crate::board::TaskStore`]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            id_prefix: self.board.id_prefix.trim().to_string(),
            missing_task: self.board.missing_task,
            columns: self.board.columns.clone(),
            team: self.team.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        self.board.validate()?;
        validate_team(&self.team)?;
        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl BoardConfig {
    fn validate(&self) -> Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "board.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(Error::InvalidConfig(
                "board.id_prefix must be alphanumeric".to_string(),
            ));
        }

        if self.columns.is_empty() {
            return Err(Error::InvalidConfig(
                "board.columns cannot be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            let trimmed = column.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidConfig(
                    "board.columns cannot contain blank names".to_string(),
                ));
            }
            if !seen.insert(trimmed.to_lowercase()) {
                return Err(Error::InvalidConfig(format!(
                    "board.columns contains duplicate '{trimmed}'"
                )));
            }
        }
        Ok(())
    }
}

fn validate_team(team: &[TeamMember]) -> Result<()> {
    let mut ids = HashSet::new();
    for member in team {
        let id = member.id.trim();
        if id.is_empty() {
            return Err(Error::InvalidConfig("team.id cannot be empty".to_string()));
        }
        if !ids.insert(id.to_string()) {
            return Err(Error::InvalidConfig(format!("team.id '{id}' is duplicated")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.board.id_prefix, "task");
        assert_eq!(cfg.board.missing_task, MissingTaskPolicy::Ignore);
        assert_eq!(cfg.board.columns.len(), 7);
        assert_eq!(cfg.board.columns[0], "Discovery");
        assert_eq!(cfg.board.columns[6], "Site/Implementation");
        assert_eq!(cfg.storage.lock_timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    }

    #[test]
    fn empty_file_keeps_team_seed() {
        let parsed: Config = toml::from_str("").expect("parse empty");
        assert_eq!(parsed.team.len(), 5);
        assert_eq!(parsed.team[0].id, "m-1");
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[board]
id_prefix = "studio"
missing_task = "error"
columns = ["Brief", "Moodboard", "Handover"]

[[team]]
id = "u-1"
name = "Grace Hopper"

[storage]
lock_timeout_ms = 250
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.board.id_prefix, "studio");
        assert_eq!(cfg.board.missing_task, MissingTaskPolicy::Error);
        assert_eq!(
            cfg.board.columns,
            vec!["Brief".to_string(), "Moodboard".to_string(), "Handover".to_string()]
        );
        assert_eq!(cfg.team.len(), 1);
        assert_eq!(cfg.team[0].name, "Grace Hopper");
        assert_eq!(cfg.storage.lock_timeout_ms, 250);

        let options = cfg.store_options();
        assert_eq!(options.columns.len(), 3);
        assert_eq!(options.missing_task, MissingTaskPolicy::Error);
    }

    #[test]
    fn invalid_board_config_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\nid_prefix = \"no-dash\"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_columns_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\ncolumns = [\"Brief\", \"brief\"]\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn unknown_missing_task_policy_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\nmissing_task = \"explode\"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::TomlParse(_)));
    }

    #[test]
    fn load_from_root_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_root(dir.path()).expect("defaults");
        assert_eq!(cfg.board.id_prefix, "task");
    }

    #[test]
    fn load_from_root_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\nid_prefix = \"atl\"").expect("write config");

        let cfg = Config::load_from_root(dir.path()).expect("load config");
        assert_eq!(cfg.board.id_prefix, "atl");
    }

    #[test]
    fn load_from_root_rejects_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "[board]
columns = []
").expect("write config");

        let err = Config::load_from_root(dir.path()).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("id_prefix = \"task\""));
        assert!(written.contains("missing_task = \"ignore\""));
    }
}
