mod github;

pub use github::{API_VERSION, DEFAULT_API_BASE_URL, GitHubProvider};

use crate::access::AccessResult;
use crate::credentials::Credentials;
use crate::error::TokenCheckError;
use crate::tree::{BranchList, FileTree};

/// Read-only view of a hosted repository.
///
/// Each call is one request/response cycle; implementations keep no state
/// between calls.
pub trait Provider {
    /// Never fails: every outcome, transport errors included, is an `AccessResult`.
    fn check_access(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = AccessResult> + Send;

    fn list_branches(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<BranchList, TokenCheckError>> + Send;

    fn list_files(
        &self,
        credentials: &Credentials,
        git_ref: &str,
    ) -> impl std::future::Future<Output = Result<FileTree, TokenCheckError>> + Send;
}
