//! Application configuration
//!
//! Loaded from `.review-lander.toml` in the current directory, falling back
//! to `~/.review-lander.toml`. Diff engine tunables live under `[diff]`.

use review_diff_engine::{DiffLayout, EngineConfig, ReviewTarget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".review-lander.toml";

/// Application configuration loaded from `.review-lander.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Layout a file opens in
    #[serde(default)]
    pub default_layout: DiffLayout,

    /// Whether the blame gutter is shown when blame is available
    #[serde(default)]
    pub show_blame: bool,

    /// Repository owner passed to the review source
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name passed to the review source
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Pull request number passed to the review source
    #[serde(default)]
    pub pr_number: u64,

    /// Git ref blame is requested for
    #[serde(default = "default_git_ref")]
    pub git_ref: String,

    /// Diff engine tunables
    #[serde(default)]
    pub diff: EngineConfig,
}

fn default_owner() -> String {
    "local".to_string()
}

fn default_repo() -> String {
    "fixture".to_string()
}

fn default_git_ref() -> String {
    "HEAD".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_layout: DiffLayout::default(),
            show_blame: false,
            owner: default_owner(),
            repo: default_repo(),
            pr_number: 0,
            git_ref: default_git_ref(),
            diff: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        Self::load_from(&config_candidates())
    }

    /// Load the first readable file of `candidates`, or use defaults
    ///
    /// A file that exists but does not parse is logged and replaced by the
    /// defaults; later candidates are not consulted.
    pub fn load_from(candidates: &[PathBuf]) -> Self {
        let Some((path, content)) = read_first(candidates) else {
            log::debug!("Using default app config");
            return Self::default();
        };

        match toml::from_str(&content) {
            Ok(config) => {
                log::info!("Loaded app config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Where the review is fetched from
    pub fn review_target(&self) -> ReviewTarget {
        ReviewTarget {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            pr_number: self.pr_number,
            git_ref: self.git_ref.clone(),
        }
    }
}

/// Config file locations in lookup order
fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(CONFIG_FILE));
    }
    candidates
}

fn read_first(candidates: &[PathBuf]) -> Option<(&Path, String)> {
    candidates.iter().find_map(|path| {
        std::fs::read_to_string(path)
            .ok()
            .map(|content| (path.as_path(), content))
    })
}
