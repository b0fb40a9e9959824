use crate::error::TokenCheckError;
use std::fmt;

/// The three inputs every call needs: who owns the repository, its name, and
/// the token to present.
///
/// All fields are whitespace-trimmed. Construction fails on an empty field, so
/// holding a `Credentials` value means a request may be issued.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    owner: String,
    repo: String,
    token: String,
}

impl Credentials {
    pub fn new(owner: &str, repo: &str, token: &str) -> Result<Self, TokenCheckError> {
        let owner = owner.trim();
        let repo = repo.trim();
        let token = token.trim();

        validate_segment("owner", owner)?;
        validate_segment("repository", repo)?;

        if token.is_empty() {
            return Err(TokenCheckError::invalid_input(
                "token",
                "Provide a GitHub personal access token with --token or GITHUB_TOKEN",
            ));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// `owner/repo`, as shown to the user.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Owner, repository and each part of a ref end up as single URL path
/// segments. `.` and `..` would be collapsed by URL normalization.
pub(crate) fn validate_segment(field: &str, value: &str) -> Result<(), TokenCheckError> {
    if value.is_empty() {
        return Err(TokenCheckError::invalid_input(
            field,
            format!("The {field} must not be empty"),
        ));
    }

    if value == "." || value == ".." {
        return Err(TokenCheckError::invalid_input(
            field,
            format!("The {field} must not be {value:?}"),
        ));
    }

    if let Some(c) = value
        .chars()
        .find(|c| *c == '/' || c.is_whitespace() || c.is_control())
    {
        return Err(TokenCheckError::invalid_input(
            field,
            format!("The {field} {value:?} contains an invalid character {c:?}"),
        ));
    }

    Ok(())
}
