//! pagescout - GitHub Pages site inventory for a static site generator
//!
//! pagescout enumerates an account's public repositories, works out which
//! ones expose a published GitHub Pages site, resolves each site's canonical
//! URL, and writes the result to `_data/projects.json` — only when the
//! content actually changed, so automated runs don't produce noise commits.
//!
//! ## Modules
//!
//! - [`config`]: environment-derived run configuration
//! - [`client`]: HTTP GET with bounded retry against the REST API
//! - [`github`]: repository listing and Pages configuration lookup
//! - [`resolver`]: eligibility filtering and site URL resolution
//! - [`snapshot`]: idempotent persistence of the resolved entries

pub mod client;
pub mod config;
pub mod github;
pub mod resolver;
pub mod snapshot;

pub use client::{ApiClient, RetryPolicy};
pub use config::Config;
pub use github::{GitHubClient, PagesLookup, RepoRecord};
pub use resolver::{resolve_projects, ProjectEntry};
pub use snapshot::{write_snapshot, SnapshotOutcome};
