use serde::Serialize;
use std::collections::BTreeSet;

/// GitHub serves at most this many branches per page; only one page is read.
pub const BRANCH_PAGE_SIZE: usize = 100;

/// Branch names of a repository, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchList {
    names: Vec<String>,
    /// The page came back full, so more branches may exist.
    pub may_be_incomplete: bool,
}

impl BranchList {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        let may_be_incomplete = names.len() >= BRANCH_PAGE_SIZE;
        names.sort();
        names.dedup();
        Self {
            names,
            may_be_incomplete,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Every file path of one branch.
///
/// When `truncated` is set GitHub cut the listing short and `paths` is only
/// part of the real tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileTree {
    pub paths: BTreeSet<String>,
    pub truncated: bool,
}

impl FileTree {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
