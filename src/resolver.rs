//! Repository resolver - eligibility filtering and site URL resolution
//!
//! Turns the raw repository listing into the list of published-site entries
//! the snapshot persists. Filtering and URL selection are pure functions;
//! only the orchestration over the API client is async.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::github::{GitHubClient, PagesLookup, RepoRecord};

/// One published site, in the shape the site generator consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub url: Option<String>,
    pub github_url: String,
    pub description: String,
    pub updated_at: String,
    pub stars: u64,
    pub language: String,
}

/// A repository is eligible when it has a published site, is not archived,
/// and is not excluded by name or full name. Ineligible repositories are
/// dropped silently.
pub fn is_eligible(config: &Config, record: &RepoRecord) -> bool {
    if !record.has_pages || record.archived {
        return false;
    }
    !config.is_excluded(&record.name, &qualified_name(config, record))
}

/// Whether this repository hosts the account's root site
/// (`{owner}.github.io`).
pub fn is_root_site(config: &Config, name: &str) -> bool {
    name.to_lowercase() == root_site_host(config)
}

/// Choose the site URL for a repository given the Pages lookup outcome.
///
/// The root-site name wins over anything the lookup returned; otherwise a
/// found configuration supplies the URL (explicit `html_url` first, custom
/// domain second), and everything else falls back to the default
/// project-pages form.
pub fn site_url(config: &Config, name: &str, lookup: &PagesLookup) -> String {
    let root = root_site_host(config);
    if name.to_lowercase() == root {
        return format!("https://{root}/");
    }

    if let PagesLookup::Found { html_url, cname } = lookup {
        if let Some(url) = html_url.as_deref().filter(|u| !u.is_empty()) {
            return format!("{}/", url.trim_end_matches('/'));
        }
        if let Some(domain) = cname.as_deref().filter(|c| !c.is_empty()) {
            return format!("https://{}/", domain.trim_end_matches('/'));
        }
    }

    format!("https://{}.github.io/{}/", config.owner_lower, name)
}

/// List, filter and resolve the account's published sites, in listing order.
///
/// Per-repository lookup failures never abort the run; the affected
/// repository gets the heuristic URL instead.
pub async fn resolve_projects(config: &Config, github: &GitHubClient) -> Result<Vec<ProjectEntry>> {
    let repos = github.list_public_repos(&config.owner).await?;

    let mut entries = Vec::new();
    for repo in repos {
        if !is_eligible(config, &repo) {
            debug!("Skipping ineligible repository: {}", repo.name);
            continue;
        }

        // The root site URL is fixed; its Pages configuration is never
        // consulted.
        let lookup = if is_root_site(config, &repo.name) {
            PagesLookup::Unavailable
        } else {
            github.pages_config(&config.owner, &repo.name).await
        };

        let url = site_url(config, &repo.name, &lookup);
        entries.push(build_entry(config, repo, url));
    }

    Ok(entries)
}

fn qualified_name(config: &Config, record: &RepoRecord) -> String {
    record
        .full_name
        .clone()
        .unwrap_or_else(|| format!("{}/{}", config.owner, record.name))
}

fn root_site_host(config: &Config) -> String {
    format!("{}.github.io", config.owner_lower)
}

/// Assemble the output entry, applying the field defaults: last activity is
/// pushed_at, then updated_at, then empty; description and language default
/// to the empty string; the repository URL is constructed when the API
/// omitted it.
fn build_entry(config: &Config, record: RepoRecord, url: String) -> ProjectEntry {
    let github_url = record
        .html_url
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| format!("https://github.com/{}/{}", config.owner, record.name));

    let updated_at = [record.pushed_at, record.updated_at]
        .into_iter()
        .flatten()
        .find(|ts| !ts.is_empty())
        .unwrap_or_default();

    ProjectEntry {
        name: record.name,
        url: Some(url),
        github_url,
        description: record.description.unwrap_or_default(),
        updated_at,
        stars: record.stargazers_count,
        language: record.language.unwrap_or_default(),
    }
}
