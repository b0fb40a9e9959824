use crate::access::AccessResult;
use crate::config::Config;
use crate::credentials::{Credentials, validate_segment};
use crate::error::TokenCheckError;
use crate::provider::Provider;
use crate::tree::{BRANCH_PAGE_SIZE, BranchList, FileTree};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("token-check/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct BranchItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    #[serde(rename = "type")]
    item_type: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

/// GitHub REST client for probing a repository and enumerating its tree.
///
/// Every request carries the bearer token, the GitHub media type, and the
/// pinned API version. Nothing is retried.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: Client,
    base_url: Url,
}

impl GitHubProvider {
    /// Creates a provider talking to api.github.com with a 30 second timeout.
    pub fn new() -> Result<Self, TokenCheckError> {
        Self::with_options(DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn from_config(config: &Config) -> Result<Self, TokenCheckError> {
        if config.request_timeout_secs == 0 {
            return Err(TokenCheckError::invalid_input(
                "request_timeout_secs",
                "Set request_timeout_secs in the config to at least 1",
            ));
        }

        Self::with_options(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Creates a provider for an arbitrary API root, e.g. a GitHub Enterprise
    /// host or a local mock server.
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, TokenCheckError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            TokenCheckError::invalid_input("api base url", format!("{base_url}: {e}"))
        })?;

        if parsed.cannot_be_a_base() {
            return Err(TokenCheckError::invalid_input(
                "api base url",
                format!("{base_url} cannot be used as a base URL"),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| TokenCheckError::ClientInit { source })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, TokenCheckError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TokenCheckError::invalid_input(
                    "api base url",
                    format!("{} cannot be used as a base URL", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, token: &str) -> Result<Response, TokenCheckError> {
        let endpoint = url.path().to_string();
        debug!(%endpoint, "sending request");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| TokenCheckError::Transport {
                endpoint: endpoint.clone(),
                source: e.without_url(),
            })?;

        debug!(%endpoint, status = response.status().as_u16(), "received response");
        Ok(response)
    }

    /// Fetches `url` and decodes a successful body as `T`.
    ///
    /// Non-2xx statuses become errors carrying the raw body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<T, TokenCheckError> {
        let endpoint = url.path().to_string();
        let response = self.send(url, credentials.token()).await?;
        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|e| TokenCheckError::Transport {
                endpoint: endpoint.clone(),
                source: e.without_url(),
            })?;

        if !status.is_success() {
            return Err(status_error(status, body, credentials));
        }

        serde_json::from_str(&body).map_err(|source| TokenCheckError::Decode { endpoint, source })
    }
}

fn status_error(status: StatusCode, body: String, credentials: &Credentials) -> TokenCheckError {
    match status {
        StatusCode::UNAUTHORIZED => TokenCheckError::Unauthenticated,
        StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => TokenCheckError::NoAccess {
            owner: credentials.owner().to_string(),
            repo: credentials.repo().to_string(),
            status: status.as_u16(),
            body,
        },
        other => TokenCheckError::UpstreamUnexpected {
            status: other.as_u16(),
            body,
        },
    }
}

impl Provider for GitHubProvider {
    async fn check_access(&self, credentials: &Credentials) -> AccessResult {
        let url = match self.endpoint(["repos", credentials.owner(), credentials.repo()]) {
            Ok(url) => url,
            Err(e) => {
                return AccessResult::TransportFailure {
                    message: e.to_string(),
                };
            }
        };

        let response = match self.send(url, credentials.token()).await {
            Ok(response) => response,
            Err(e) => {
                return AccessResult::TransportFailure {
                    message: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            warn!("failed to read repository response body: {e}");
            String::new()
        });

        AccessResult::from_response(status, &body)
    }

    async fn list_branches(&self, credentials: &Credentials) -> Result<BranchList, TokenCheckError> {
        let mut url = self.endpoint([
            "repos",
            credentials.owner(),
            credentials.repo(),
            "branches",
        ])?;
        url.query_pairs_mut()
            .append_pair("per_page", &BRANCH_PAGE_SIZE.to_string());

        let branches: Vec<BranchItem> = self.fetch(url, credentials).await?;
        Ok(BranchList::new(branches.into_iter().map(|b| b.name)))
    }

    /// Lists the blobs of `git_ref` via the recursive Git Trees API.
    ///
    /// Directories (`tree`) and submodules (`commit`) are dropped. A ref with
    /// slashes such as `feature/login` is sent as separate path segments.
    async fn list_files(
        &self,
        credentials: &Credentials,
        git_ref: &str,
    ) -> Result<FileTree, TokenCheckError> {
        let git_ref = git_ref.trim();
        if git_ref.is_empty() {
            return Err(TokenCheckError::invalid_input(
                "ref",
                "A branch name or HEAD is required",
            ));
        }

        for segment in git_ref.split('/') {
            validate_segment("ref", segment)?;
        }

        let mut url = self.endpoint(
            ["repos", credentials.owner(), credentials.repo(), "git", "trees"]
                .into_iter()
                .chain(git_ref.split('/')),
        )?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let response: TreeResponse = self.fetch(url, credentials).await?;

        let paths = response
            .tree
            .into_iter()
            .filter(|item| item.item_type == "blob")
            .map(|item| item.path)
            .collect();

        Ok(FileTree {
            paths,
            truncated: response.truncated,
        })
    }
}
