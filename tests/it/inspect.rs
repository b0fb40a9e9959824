use serde_json::json;
use std::time::Duration;
use token_check::{
    AccessResult, Credentials, FileTree, GitHubProvider, Inspection, Inspector, RepositoryDocument,
    TokenCheckError, Warning,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn inspector(server: &MockServer) -> Inspector<GitHubProvider> {
    inspector_with_timeout(server, Duration::from_secs(5))
}

fn inspector_with_timeout(server: &MockServer, timeout: Duration) -> Inspector<GitHubProvider> {
    Inspector::new(GitHubProvider::with_options(&server.uri(), timeout).unwrap())
}

fn credentials() -> Credentials {
    Credentials::new("owner", "repo", "ghp_test").unwrap()
}

async fn mount_repo(server: &MockServer, default_branch: &str) {
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"default_branch": default_branch})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_branches(server: &MockServer, names: &[&str]) {
    let body: Vec<_> = names.iter().map(|n| json!({"name": n})).collect();
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_tree(
    server: &MockServer,
    git_ref: &str,
    paths: &[&str],
    truncated: bool,
    calls: u64,
) {
    let tree: Vec<_> = paths
        .iter()
        .map(|p| json!({"path": p, "type": "blob"}))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/git/trees/{git_ref}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"tree": tree, "truncated": truncated})),
        )
        .expect(calls)
        .mount(server)
        .await;
}

async fn forbid_enumeration(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/branches"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn granted_lists_default_branch_files() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &["release", "main", "dev"]).await;
    mount_tree(&server, "main", &["Cargo.toml", "src/lib.rs"], false, 1).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert!(inspection.is_granted());
    assert_eq!(inspection.repository, "owner/repo");
    assert_eq!(inspection.selected_branch.as_deref(), Some("main"));
    assert_eq!(
        inspection.branches.as_ref().unwrap().names(),
        ["dev", "main", "release"]
    );
    assert_eq!(inspection.files.as_ref().unwrap().len(), 2);
    assert!(inspection.warnings.is_empty());

    let message = inspection.message();
    assert!(message.starts_with("Token HAS access to owner/repo (default branch: main)"));
    assert!(!message.contains("warning"));
}

#[tokio::test]
async fn missing_default_branch_selects_first_branch() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &["release", "dev"]).await;
    mount_tree(&server, "dev", &["a.txt"], false, 1).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert_eq!(inspection.selected_branch.as_deref(), Some("dev"));
    assert_eq!(inspection.files.unwrap().len(), 1);
}

#[tokio::test]
async fn not_found_stops_after_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .expect(1)
        .mount(&server)
        .await;
    forbid_enumeration(&server).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert_eq!(inspection.access, AccessResult::NotFoundOrNoAccess);
    assert!(inspection.branches.is_none());
    assert!(inspection.files.is_none());
    assert!(!inspection.is_granted());
}

#[tokio::test]
async fn forbidden_message_includes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"message":"rate limited"}"#))
        .expect(1)
        .mount(&server)
        .await;
    forbid_enumeration(&server).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert_eq!(
        inspection.access,
        AccessResult::Forbidden {
            body: r#"{"message":"rate limited"}"#.to_string()
        }
    );
    assert!(inspection.message().contains(r#"{"message":"rate limited"}"#));
}

#[tokio::test]
async fn branch_transport_failure_falls_back_to_default_branch() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/branches"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&server)
        .await;
    mount_tree(&server, "main", &["README.md"], false, 1).await;

    let inspection = inspector_with_timeout(&server, Duration::from_millis(500))
        .inspect(&credentials())
        .await;

    assert!(inspection.is_granted());
    assert!(inspection.branches.is_none());
    assert_eq!(inspection.selected_branch.as_deref(), Some("main"));
    assert_eq!(inspection.files.unwrap().len(), 1);
    assert!(matches!(
        inspection.warnings.as_slice(),
        [Warning::BranchListingFailed { .. }]
    ));
}

#[tokio::test]
async fn branch_failure_without_default_branch_uses_head() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{broken"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/branches"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    mount_tree(&server, "HEAD", &["README.md"], false, 1).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert_eq!(
        inspection.access,
        AccessResult::Granted {
            default_branch: None,
            repository: Some(RepositoryDocument::Raw("{broken".to_string())),
        }
    );
    assert_eq!(inspection.selected_branch.as_deref(), Some("HEAD"));

    let message = inspection.message();
    assert!(message.starts_with("Token HAS access to owner/repo"));
    assert!(message.contains("warning: could not list branches"));
}

#[tokio::test]
async fn truncated_tree_is_reported() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &["main"]).await;
    mount_tree(&server, "main", &["a", "b"], true, 1).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert!(inspection.files.as_ref().unwrap().truncated);
    assert!(inspection.message().contains("truncated"));
}

#[tokio::test]
async fn empty_repository_skips_file_listing() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &[]).await;
    mount_tree(&server, "main", &[], false, 0).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert!(inspection.is_granted());
    assert!(inspection.selected_branch.is_none());
    assert_eq!(inspection.warnings, [Warning::NoBranches]);
}

#[tokio::test]
async fn file_listing_failure_is_a_warning() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &["main"]).await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/git/trees/main"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Git Repository is empty."))
        .expect(1)
        .mount(&server)
        .await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert!(inspection.is_granted());
    assert!(inspection.files.is_none());
    assert!(
        inspection
            .message()
            .contains("warning: could not list files on main")
    );
}

#[tokio::test]
async fn browse_lists_files_without_probing_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_tree(&server, "dev", &["x.rs", "y.rs"], false, 1).await;

    let tree = inspector(&server)
        .browse(&credentials(), "dev")
        .await
        .unwrap();

    assert_eq!(tree.len(), 2);
}

#[tokio::test]
async fn switching_branch_replaces_listing() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &["dev", "main"]).await;
    mount_tree(&server, "main", &["big"], true, 1).await;
    mount_tree(&server, "dev", &["one", "two"], false, 1).await;

    let inspector = inspector(&server);
    let inspection = inspector.inspect(&credentials()).await;
    assert!(matches!(
        inspection.warnings.as_slice(),
        [Warning::TreeTruncated { .. }]
    ));

    let listing = inspector.browse(&credentials(), "dev").await;
    let inspection = inspection.with_listing("dev", listing);

    assert_eq!(inspection.selected_branch.as_deref(), Some("dev"));
    assert_eq!(inspection.files.as_ref().map(FileTree::len), Some(2));
    assert!(inspection.warnings.is_empty());
}

#[test]
fn file_listing_warning_names_ref_and_error() {
    let error = TokenCheckError::UpstreamUnexpected {
        status: 502,
        body: "bad gateway".to_string(),
    };
    let warning = Warning::FileListingFailed {
        git_ref: "dev".to_string(),
        error: error.to_string(),
    };

    assert_eq!(
        warning.to_string(),
        "could not list files on dev: unexpected status code 502: bad gateway"
    );
}

#[test]
fn failed_listing_clears_previous_files() {
    let inspection = Inspection {
        repository: "owner/repo".to_string(),
        access: AccessResult::Granted {
            default_branch: Some("main".to_string()),
            repository: None,
        },
        branches: None,
        selected_branch: Some("main".to_string()),
        files: Some(FileTree::default()),
        warnings: Vec::new(),
    };

    let inspection = inspection.with_listing("dev", Err(TokenCheckError::Unauthenticated));

    assert_eq!(inspection.selected_branch.as_deref(), Some("dev"));
    assert!(inspection.files.is_none());
    assert!(matches!(
        inspection.warnings.as_slice(),
        [Warning::FileListingFailed { git_ref, .. }] if git_ref == "dev"
    ));
}

#[tokio::test]
async fn repository_document_is_kept_and_serialized() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    mount_branches(&server, &["main"]).await;
    mount_tree(&server, "main", &["README.md"], false, 1).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert_eq!(
        inspection.repository_info(),
        Some(&RepositoryDocument::Json(json!({"default_branch": "main"})))
    );

    let output = serde_json::to_value(&inspection).unwrap();
    assert_eq!(output["access"]["result"], "granted");
    assert_eq!(output["access"]["repository"]["default_branch"], "main");
}

#[tokio::test]
async fn full_branch_page_is_flagged_incomplete() {
    let server = MockServer::start().await;
    mount_repo(&server, "main").await;
    let names: Vec<String> = std::iter::once("main".to_string())
        .chain((1..100).map(|i| format!("feature-{i:03}")))
        .collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    mount_branches(&server, &names).await;
    mount_tree(&server, "main", &["README.md"], false, 1).await;

    let inspection = inspector(&server).inspect(&credentials()).await;

    assert_eq!(inspection.branches.as_ref().unwrap().len(), 100);
    assert_eq!(
        inspection.warnings,
        [Warning::BranchListIncomplete { shown: 100 }]
    );
    assert_eq!(inspection.selected_branch.as_deref(), Some("main"));
    assert!(inspection.message().contains("branch list may be incomplete"));
}
