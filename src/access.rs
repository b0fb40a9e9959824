use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Outcome of probing a repository with a token.
///
/// A probe always produces exactly one of these. Transport problems are a
/// variant too, so callers never have to look at the raw response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AccessResult {
    Granted {
        default_branch: Option<String>,
        /// The repository document GitHub returned, if the body was not empty.
        repository: Option<RepositoryDocument>,
    },
    /// GitHub answers 404 both for missing repositories and for repositories the
    /// token cannot see, so the two cases stay merged.
    NotFoundOrNoAccess,
    Unauthorized,
    Forbidden { body: String },
    UnexpectedStatus { code: u16, body: String },
    TransportFailure { message: String },
}

/// Body of a successful repository request.
///
/// Kept raw when it is not JSON, so it can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RepositoryDocument {
    Json(Value),
    Raw(String),
}

impl RepositoryDocument {
    /// Pretty-printed JSON, or the raw text when the body was not JSON.
    pub fn pretty(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Raw(body) => body.clone(),
        }
    }
}

impl AccessResult {
    /// Maps a response status and body to a result.
    ///
    /// A 200 with a body that does not decode still counts as granted, just
    /// without a default branch; the raw body is kept as the document.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::OK => granted(body),
            StatusCode::NOT_FOUND => Self::NotFoundOrNoAccess,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden {
                body: body.to_string(),
            },
            other => Self::UnexpectedStatus {
                code: other.as_u16(),
                body: body.to_string(),
            },
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    pub fn default_branch(&self) -> Option<&str> {
        match self {
            Self::Granted { default_branch, .. } => default_branch.as_deref(),
            _ => None,
        }
    }

    pub fn repository(&self) -> Option<&RepositoryDocument> {
        match self {
            Self::Granted { repository, .. } => repository.as_ref(),
            _ => None,
        }
    }
}

fn granted(body: &str) -> AccessResult {
    if body.trim().is_empty() {
        tracing::warn!("repository response was empty, default branch unknown");
        return AccessResult::Granted {
            default_branch: None,
            repository: None,
        };
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => AccessResult::Granted {
            default_branch: value
                .get("default_branch")
                .and_then(Value::as_str)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            repository: Some(RepositoryDocument::Json(value)),
        },
        Err(e) => {
            tracing::warn!("repository response did not decode, default branch unknown: {e}");
            AccessResult::Granted {
                default_branch: None,
                repository: Some(RepositoryDocument::Raw(body.to_string())),
            }
        }
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted { .. } => write!(f, "token has access"),
            Self::NotFoundOrNoAccess => write!(
                f,
                "404 Not Found. Either the repository does not exist or the token does not have access."
            ),
            Self::Unauthorized => write!(f, "401 Unauthorized. Token is invalid or missing."),
            Self::Forbidden { body } => write!(
                f,
                "403 Forbidden. Token is valid but does not have permission.\nResponse: {body}"
            ),
            Self::UnexpectedStatus { code, body } => {
                write!(f, "Unexpected status code: {code}\nResponse: {body}")
            }
            Self::TransportFailure { message } => write!(f, "Request failed: {message}"),
        }
    }
}
