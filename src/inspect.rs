//! The verify-then-enumerate workflow.
//!
//! Steps run strictly in order because each consumes the previous one's
//! output: the access probe yields the default branch, the branch list decides
//! the initial selection, and only then is the file tree requested. Secondary
//! failures are recorded as warnings on an otherwise successful inspection.

use crate::access::{AccessResult, RepositoryDocument};
use crate::credentials::Credentials;
use crate::error::TokenCheckError;
use crate::provider::Provider;
use crate::tree::{BranchList, FileTree};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Ref used for the file listing when no default branch could be resolved.
pub const HEAD_REF: &str = "HEAD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    BranchListingFailed { error: String },
    BranchListIncomplete { shown: usize },
    NoBranches,
    FileListingFailed { git_ref: String, error: String },
    TreeTruncated { git_ref: String, shown: usize },
}

impl Warning {
    fn is_file_listing(&self) -> bool {
        matches!(
            self,
            Self::FileListingFailed { .. } | Self::TreeTruncated { .. }
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BranchListingFailed { error } => {
                write!(f, "could not list branches: {error}")
            }
            Self::BranchListIncomplete { shown } => write!(
                f,
                "branch list may be incomplete, only the first {shown} branches were fetched"
            ),
            Self::NoBranches => write!(f, "repository has no branches"),
            Self::FileListingFailed { git_ref, error } => {
                write!(f, "could not list files on {git_ref}: {error}")
            }
            Self::TreeTruncated { git_ref, shown } => write!(
                f,
                "file tree for {git_ref} was truncated by GitHub, only {shown} files are shown"
            ),
        }
    }
}

/// Everything learned about one repository in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    /// `owner/repo` the inspection was run against.
    pub repository: String,
    pub access: AccessResult,
    pub branches: Option<BranchList>,
    pub selected_branch: Option<String>,
    pub files: Option<FileTree>,
    pub warnings: Vec<Warning>,
}

impl Inspection {
    fn new(repository: String, access: AccessResult) -> Self {
        Self {
            repository,
            access,
            branches: None,
            selected_branch: None,
            files: None,
            warnings: Vec::new(),
        }
    }

    /// Replaces the current file listing with the outcome of listing `git_ref`.
    ///
    /// Warnings from an earlier listing are dropped; all others are kept.
    pub fn with_listing(
        mut self,
        git_ref: &str,
        listing: Result<FileTree, TokenCheckError>,
    ) -> Self {
        self.warnings.retain(|w| !w.is_file_listing());
        self.selected_branch = Some(git_ref.to_string());

        match listing {
            Ok(tree) => {
                if tree.truncated {
                    self.warnings.push(Warning::TreeTruncated {
                        git_ref: git_ref.to_string(),
                        shown: tree.len(),
                    });
                }
                self.files = Some(tree);
            }
            Err(e) => {
                self.warnings.push(Warning::FileListingFailed {
                    git_ref: git_ref.to_string(),
                    error: e.to_string(),
                });
                self.files = None;
            }
        }

        self
    }

    pub fn is_granted(&self) -> bool {
        self.access.is_granted()
    }

    /// The repository document returned with a grant.
    pub fn repository_info(&self) -> Option<&RepositoryDocument> {
        self.access.repository()
    }

    /// The single status message for this inspection, warnings appended.
    pub fn message(&self) -> String {
        let mut lines = Vec::new();

        match &self.access {
            AccessResult::Granted { default_branch, .. } => {
                let mut line = format!("Token HAS access to {}", self.repository);
                if let Some(branch) = default_branch {
                    line.push_str(&format!(" (default branch: {branch})"));
                }
                lines.push(line);

                if let Some(branches) = &self.branches {
                    lines.push(format!("Branches: {}", branches.len()));
                }
                if let (Some(branch), Some(files)) = (&self.selected_branch, &self.files) {
                    lines.push(format!("Files on {branch}: {}", files.len()));
                }
            }
            other => lines.push(other.to_string()),
        }

        lines.extend(self.warnings.iter().map(|w| format!("warning: {w}")));
        lines.join("\n")
    }
}

/// Picks the branch shown first: the default branch when the list has it,
/// otherwise the lexicographically first name.
pub fn select_initial_branch(
    branches: &BranchList,
    default_branch: Option<&str>,
) -> Option<String> {
    default_branch
        .filter(|b| branches.contains(b))
        .or_else(|| branches.first())
        .map(str::to_string)
}

/// Runs the inspection workflow against a [`Provider`].
#[derive(Debug, Clone)]
pub struct Inspector<P> {
    provider: P,
}

impl<P: Provider> Inspector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Probes access and, when granted, lists branches and the files of the
    /// initially selected branch.
    ///
    /// If the branch listing fails, the files of the default branch (or `HEAD`)
    /// are listed instead and the failure becomes a warning.
    pub async fn inspect(&self, credentials: &Credentials) -> Inspection {
        let access = self.provider.check_access(credentials).await;
        let default_branch = access.default_branch().map(str::to_string);
        let inspection = Inspection::new(credentials.full_name(), access);

        if !inspection.is_granted() {
            info!(repository = %inspection.repository, "access not granted");
            return inspection;
        }

        match self.provider.list_branches(credentials).await {
            Ok(branches) => {
                self.list_initial(credentials, inspection, branches, default_branch.as_deref())
                    .await
            }
            Err(e) => {
                warn!(repository = %inspection.repository, "branch listing failed: {e}");
                let mut inspection = inspection;
                inspection.warnings.push(Warning::BranchListingFailed {
                    error: e.to_string(),
                });

                let git_ref = default_branch.as_deref().unwrap_or(HEAD_REF);
                let listing = self.provider.list_files(credentials, git_ref).await;
                inspection.with_listing(git_ref, listing)
            }
        }
    }

    async fn list_initial(
        &self,
        credentials: &Credentials,
        mut inspection: Inspection,
        branches: BranchList,
        default_branch: Option<&str>,
    ) -> Inspection {
        if branches.may_be_incomplete {
            inspection.warnings.push(Warning::BranchListIncomplete {
                shown: branches.len(),
            });
        }

        let selected = select_initial_branch(&branches, default_branch);
        inspection.branches = Some(branches);

        let Some(branch) = selected else {
            inspection.warnings.push(Warning::NoBranches);
            return inspection;
        };

        info!(repository = %inspection.repository, %branch, "listing files");
        let listing = self.provider.list_files(credentials, &branch).await;
        inspection.with_listing(&branch, listing)
    }

    /// Lists the files of another branch. The access probe is not repeated.
    pub async fn browse(
        &self,
        credentials: &Credentials,
        branch: &str,
    ) -> Result<FileTree, TokenCheckError> {
        self.provider.list_files(credentials, branch).await
    }
}
