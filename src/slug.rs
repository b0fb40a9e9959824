use crate::error::TokenCheckError;

/// The owner and name of a repository, as typed on the command line.
///
/// Supports two formats:
/// - Slug: `{owner}/{repo}`
/// - URL: `https://github.com/{owner}/{repo}[/anything]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    /// Parses a slug or repository URL into owner and repo.
    ///
    /// Anything after the repository name in a URL (`/tree/main/src`, `/pulls`)
    /// is ignored, and a trailing `.git` is stripped.
    pub fn parse(input: &str) -> Result<Self, TokenCheckError> {
        let input = input.trim();

        let path = if input.contains("://") {
            let url = url::Url::parse(input).map_err(|_| {
                TokenCheckError::invalid_input(
                    "repository",
                    format!("{input} is not a valid URL. Expected https://github.com/owner/repo"),
                )
            })?;
            url.path().to_string()
        } else {
            input.to_string()
        };

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        // A bare slug has exactly two parts; a URL may carry more after them.
        if parts.len() < 2 || (!input.contains("://") && parts.len() != 2) {
            return Err(TokenCheckError::invalid_input(
                "repository",
                format!("{input} must look like owner/repo or https://github.com/owner/repo"),
            ));
        }

        let owner = parts[0].to_string();
        let repo = parts[1].strip_suffix(".git").unwrap_or(parts[1]).to_string();

        if repo.is_empty() {
            return Err(TokenCheckError::invalid_input(
                "repository",
                format!("{input} has an empty repository name"),
            ));
        }

        Ok(Self { owner, repo })
    }
}
