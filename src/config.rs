//! Configuration - environment-derived settings for a single run
//!
//! All environment access happens here, once, at startup. The rest of the
//! crate receives a [`Config`] value and never touches the process
//! environment, which keeps the core logic testable without env juggling.

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Relative path of the snapshot consumed by the site generator.
pub const OUTPUT_PATH: &str = "_data/projects.json";

/// Run configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target user or organization, as supplied.
    pub owner: String,

    /// Case-folded owner, used for exclusion matching and URL construction.
    pub owner_lower: String,

    /// Optional bearer token for authenticated (higher rate limit) requests.
    pub token: Option<String>,

    /// Snapshot location, relative to the working directory.
    pub output_path: PathBuf,

    /// Case-folded repository names that never appear in output.
    excluded_names: HashSet<String>,

    /// Case-folded `owner/name` forms of the excluded repositories.
    excluded_full_names: HashSet<String>,
}

impl Config {
    /// Build the configuration from environment variables.
    ///
    /// `GITHUB_OWNER` is required. `GITHUB_TOKEN`, `GITHUB_EXCLUDE_REPOS`
    /// and `GITHUB_SELF_REPO` are optional; the self repository defaults to
    /// the current working directory's base name.
    pub fn from_env() -> Result<Self> {
        let owner = env::var("GITHUB_OWNER").ok();
        let token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        let exclude_list = env::var("GITHUB_EXCLUDE_REPOS").unwrap_or_default();
        let self_repo = env::var("GITHUB_SELF_REPO")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(current_dir_name);

        Self::from_parts(owner.as_deref(), token, &exclude_list, self_repo.as_deref())
    }

    /// Assemble a configuration from already-read values.
    pub fn from_parts(
        owner: Option<&str>,
        token: Option<String>,
        exclude_list: &str,
        self_repo: Option<&str>,
    ) -> Result<Self> {
        let owner = match owner {
            Some(o) if !o.trim().is_empty() => o.trim().to_string(),
            _ => bail!("GITHUB_OWNER is not set; export the target user or organization name"),
        };
        let owner_lower = owner.to_lowercase();

        let mut excluded_names: HashSet<String> = exclude_list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
            .collect();

        // The repository this tool lives in never lists itself.
        if let Some(name) = self_repo {
            if !name.is_empty() {
                excluded_names.insert(name.to_lowercase());
            }
        }

        let excluded_full_names = excluded_names
            .iter()
            .map(|name| format!("{owner_lower}/{name}"))
            .collect();

        Ok(Self {
            owner,
            owner_lower,
            token,
            output_path: PathBuf::from(OUTPUT_PATH),
            excluded_names,
            excluded_full_names,
        })
    }

    /// Check whether a repository is excluded by name or full name.
    /// Matching is case-insensitive.
    pub fn is_excluded(&self, name: &str, full_name: &str) -> bool {
        self.excluded_names.contains(&name.to_lowercase())
            || self.excluded_full_names.contains(&full_name.to_lowercase())
    }
}

/// Base name of the current working directory, if it has one.
fn current_dir_name() -> Option<String> {
    env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
}
