use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum TokenCheckError {
    #[error("invalid {field}")]
    #[diagnostic(help("{hint}"))]
    InvalidInput { field: String, hint: String },

    #[error("401 unauthorized")]
    #[diagnostic(help("The token is invalid, expired or missing"))]
    Unauthenticated,

    #[error("{status} no access to {owner}/{repo}: {body}")]
    #[diagnostic(help(
        "Either the repository does not exist or the token does not have permission"
    ))]
    NoAccess {
        owner: String,
        repo: String,
        status: u16,
        body: String,
    },

    #[error("unexpected status code {status}: {body}")]
    UpstreamUnexpected { status: u16, body: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialize http client")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to load config")]
    ConfigLoad {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to save config")]
    ConfigSave {
        #[source]
        source: std::io::Error,
    },
}

impl TokenCheckError {
    pub(crate) fn invalid_input(field: &str, hint: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            hint: hint.into(),
        }
    }
}
