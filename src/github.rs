//! GitHub API surface - repository listing and Pages configuration lookup

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::ApiClient;

/// Subset of the repository listing payload this tool consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub has_pages: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Pages configuration payload, as far as URL resolution needs it.
#[derive(Debug, Deserialize)]
struct PagesConfig {
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    cname: Option<String>,
}

/// Outcome of the per-repository Pages configuration lookup.
///
/// 403 and 404 are expected answers for repositories whose Pages
/// configuration is not visible, so they get their own variant instead of
/// surfacing as errors; the caller falls back to the heuristic URL for both
/// `Unavailable` and `TransientError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagesLookup {
    /// The API returned a configuration (status 200).
    Found {
        html_url: Option<String>,
        cname: Option<String>,
    },
    /// The API answered 403 or 404.
    Unavailable,
    /// The lookup exhausted its retries or failed at the transport level.
    TransientError,
}

/// Typed wrapper over the endpoints this tool consumes.
pub struct GitHubClient {
    api: ApiClient,
}

impl GitHubClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List every public repository of the account, most recently pushed
    /// first. Pagination stops at the first empty page; any page failure
    /// aborts the listing.
    pub async fn list_public_repos(&self, owner: &str) -> Result<Vec<RepoRecord>> {
        let path = format!("/users/{owner}/repos");
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let params = [
                ("per_page", "100".to_string()),
                ("page", page.to_string()),
                ("type", "public".to_string()),
                ("sort", "pushed".to_string()),
            ];
            let response = self
                .api
                .get(&path, &params, &[StatusCode::OK])
                .await
                .with_context(|| format!("Failed to fetch repositories page {page} for {owner}"))?;

            let chunk: Vec<RepoRecord> = response
                .json()
                .with_context(|| format!("Failed to parse repositories page {page}"))?;
            if chunk.is_empty() {
                break;
            }

            debug!("Fetched page {} with {} repositories", page, chunk.len());
            repos.extend(chunk);
            page += 1;
        }

        info!("Found {} public repositories for {}", repos.len(), owner);
        Ok(repos)
    }

    /// Look up the Pages configuration for one repository.
    ///
    /// Never fails the run: every problem collapses into a [`PagesLookup`]
    /// variant the resolver can fall back from.
    pub async fn pages_config(&self, owner: &str, repo: &str) -> PagesLookup {
        let path = format!("/repos/{owner}/{repo}/pages");
        let ok = [StatusCode::OK, StatusCode::FORBIDDEN, StatusCode::NOT_FOUND];

        match self.api.get(&path, &[], &ok).await {
            Ok(response) if response.status == StatusCode::OK => {
                match response.json::<PagesConfig>() {
                    Ok(config) => PagesLookup::Found {
                        html_url: config.html_url,
                        cname: config.cname,
                    },
                    Err(err) => {
                        warn!("Unparseable Pages payload for {}/{}: {:#}", owner, repo, err);
                        PagesLookup::TransientError
                    }
                }
            }
            Ok(response) => {
                debug!(
                    "Pages configuration for {}/{} not visible ({})",
                    owner, repo, response.status
                );
                PagesLookup::Unavailable
            }
            Err(err) => {
                warn!("Pages lookup for {}/{} failed: {:#}", owner, repo, err);
                PagesLookup::TransientError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RetryPolicy;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GitHubClient {
        let retry = RetryPolicy {
            max_attempts: 2,
            backoff_base: Duration::ZERO,
        };
        GitHubClient::new(ApiClient::with_base_url(&server.uri(), None, retry).expect("client"))
    }

    fn repo_json(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "full_name": format!("acme/{name}"),
            "archived": false,
            "has_pages": true,
            "description": null,
            "pushed_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "stargazers_count": 1,
            "language": "Rust",
            "html_url": format!("https://github.com/acme/{name}")
        })
    }

    #[tokio::test]
    async fn test_listing_stops_at_first_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/acme/repos"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .and(query_param("type", "public"))
            .and(query_param("sort", "pushed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([repo_json("a"), repo_json("b")])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/acme/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("c")])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/acme/repos"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let github = client_for(&server).await;
        let repos = github.list_public_repos("acme").await.expect("listing");

        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/acme/repos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let github = client_for(&server).await;
        let err = github.list_public_repos("acme").await.unwrap_err();
        assert!(err.to_string().contains("page 1"));
    }

    #[tokio::test]
    async fn test_pages_config_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "html_url": "https://acme.github.io/widgets",
                "cname": null
            })))
            .mount(&server)
            .await;

        let github = client_for(&server).await;
        let lookup = github.pages_config("acme", "widgets").await;
        assert_eq!(
            lookup,
            PagesLookup::Found {
                html_url: Some("https://acme.github.io/widgets".to_string()),
                cname: None,
            }
        );
    }

    #[tokio::test]
    async fn test_pages_config_unavailable_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pages"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let github = client_for(&server).await;
        assert_eq!(
            github.pages_config("acme", "widgets").await,
            PagesLookup::Unavailable
        );
    }

    #[tokio::test]
    async fn test_pages_config_unavailable_on_403() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pages"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let github = client_for(&server).await;
        assert_eq!(
            github.pages_config("acme", "widgets").await,
            PagesLookup::Unavailable
        );
    }

    #[tokio::test]
    async fn test_pages_config_transient_error_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pages"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let github = client_for(&server).await;
        assert_eq!(
            github.pages_config("acme", "widgets").await,
            PagesLookup::TransientError
        );
    }
}
