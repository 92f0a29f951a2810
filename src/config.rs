//! Run configuration
//!
//! Values resolve in order: command-line override, YAML file, default.

use crate::error::{LinkRankError, LinkRankResult};
use crate::presenter::OutputFormat;
use linkrank_algorithms::RankConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one rank run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Graph input file
    pub input: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Print only the highest ranked nodes
    pub top: Option<usize>,
    /// Engine settings
    #[serde(flatten)]
    pub engine: RankConfig,
}

impl RunConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> LinkRankResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> LinkRankResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> LinkRankResult<()> {
        self.engine.validate()?;
        if self.top == Some(0) {
            return Err(LinkRankError::Config("top must be positive".to_string()));
        }
        Ok(())
    }

    /// Input path, required for a run
    pub fn input_path(&self) -> LinkRankResult<&Path> {
        self.input
            .as_deref()
            .ok_or_else(|| LinkRankError::Config("no graph input given".to_string()))
    }
}
