pub mod access;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod inspect;
pub mod progress;
pub mod provider;
pub mod slug;
pub mod tree;

pub use access::{AccessResult, RepositoryDocument};
pub use cli::Cli;
pub use config::Config;
pub use credentials::Credentials;
pub use error::TokenCheckError;
pub use inspect::{Inspection, Inspector, Warning, select_initial_branch};
pub use provider::{GitHubProvider, Provider};
pub use slug::RepoSlug;
pub use tree::{BranchList, FileTree};
