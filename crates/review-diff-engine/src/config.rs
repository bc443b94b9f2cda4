//! Engine configuration.
//!
//! Every policy constant of the engine lives here so the host can override
//! it from its config file (`[diff]` section).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML content could not be parsed.
    #[error("Invalid diff configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which row layout the diff is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLayout {
    /// Single column, old and new lines interleaved.
    #[default]
    Unified,
    /// Two columns, old on the left and new on the right.
    SideBySide,
}

impl DiffLayout {
    /// The other layout.
    pub fn toggled(self) -> Self {
        match self {
            DiffLayout::Unified => DiffLayout::SideBySide,
            DiffLayout::SideBySide => DiffLayout::Unified,
        }
    }
}

/// Tunables for folding, word diff, tabs and windowing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A context run longer than this is folded by default.
    #[serde(default = "default_fold_threshold")]
    pub fold_threshold: usize,

    /// Context lines kept visible on each end of a folded run.
    #[serde(default = "default_context_margin")]
    pub context_margin: usize,

    /// Tab stop width used before any column computation.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Word diff is only computed when the longer run of a change block is
    /// at most this many times the shorter one.
    #[serde(default = "default_word_diff_ratio")]
    pub word_diff_ratio: f64,

    /// Lines with more tokens than this are highlighted as fully changed.
    #[serde(default = "default_max_word_diff_tokens")]
    pub max_word_diff_tokens: usize,

    /// Extra rows kept around the viewport by the virtual window.
    #[serde(default = "default_overscan")]
    pub overscan: usize,
}

fn default_fold_threshold() -> usize {
    8
}

fn default_context_margin() -> usize {
    3
}

fn default_tab_width() -> usize {
    4
}

fn default_word_diff_ratio() -> f64 {
    2.0
}

fn default_max_word_diff_tokens() -> usize {
    200
}

fn default_overscan() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fold_threshold: default_fold_threshold(),
            context_margin: default_context_margin(),
            tab_width: default_tab_width(),
            word_diff_ratio: default_word_diff_ratio(),
            max_word_diff_tokens: default_max_word_diff_tokens(),
            overscan: default_overscan(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML content; missing keys use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Stable fingerprint used as part of row cache keys.
    pub(crate) fn fingerprint(&self) -> [u64; 5] {
        [
            self.fold_threshold as u64,
            self.context_margin as u64,
            self.tab_width as u64,
            self.word_diff_ratio.to_bits(),
            self.max_word_diff_tokens as u64,
        ]
    }
}
