//! Build configuration, read from `diffbind.toml`.
//!
//! Relative snapshot directories resolve against the build script's working
//! directory (the package root). Units that share one aggregator must agree
//! on the directory, usually by setting `DIFFBIND_SNAPSHOT_DIR` once for the
//! whole workspace.

use crate::error::BuildError;
use diffbind_schema::node::NamingDefaults;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub const CONFIG_FILE: &str = "diffbind.toml";
pub const ENV_UNIT: &str = "DIFFBIND_UNIT";
pub const ENV_SNAPSHOT_DIR: &str = "DIFFBIND_SNAPSHOT_DIR";

///
/// BuildConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub unit: UnitConfig,
    pub catalog: CatalogConfig,
    pub naming: NamingConfig,
}

impl BuildConfig {
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load `path`, falling back to defaults when the file does not exist,
    /// then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let config = match fs::read_to_string(path) {
            Ok(source) => Self::from_toml(&source).map_err(|source| BuildError::Config {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(BuildError::io(path, e)),
        };

        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply `DIFFBIND_UNIT` and `DIFFBIND_SNAPSHOT_DIR` through `lookup`.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(unit) = lookup(ENV_UNIT).filter(|v| !v.is_empty()) {
            self.unit.id = unit;
        }
        if let Some(dir) = lookup(ENV_SNAPSHOT_DIR).filter(|v| !v.is_empty()) {
            self.catalog.snapshot_dir = PathBuf::from(dir);
        }

        self
    }

    #[must_use]
    pub fn naming_defaults(&self) -> NamingDefaults {
        NamingDefaults {
            setter_prefix: self.naming.setter_prefix.clone(),
            bind_prefix: self.naming.bind_prefix.clone(),
            suffix: self.naming.suffix.clone(),
        }
    }
}

///
/// UnitConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UnitConfig {
    /// Names this unit's snapshot file.
    pub id: String,

    /// Rust path the generated artifacts are mounted under, as seen from the
    /// aggregator crate.
    pub path: String,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            id: "main".to_string(),
            path: "crate".to_string(),
        }
    }
}

///
/// CatalogConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub snapshot_dir: PathBuf,
    pub collision: CollisionPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("target/diffbind"),
            collision: CollisionPolicy::default(),
        }
    }
}

///
/// CollisionPolicy
///
/// Which reference survives when two units register the same key.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    #[default]
    FirstWins,
    LastWins,
}

///
/// NamingConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub setter_prefix: String,
    pub bind_prefix: String,
    pub suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        let defaults = NamingDefaults::default();

        Self {
            setter_prefix: defaults.setter_prefix,
            bind_prefix: defaults.bind_prefix,
            suffix: defaults.suffix,
        }
    }
}
