//! Client behaviour against a mocked GitLab API

use glctl::commands::api_error;
use glctl::gitlab::{
    branches::ListBranchesOptions,
    classify,
    files::{DeleteFileOptions, UpdateFileOptions},
    projects::{EditProjectOptions, ListProjectsOptions},
    Credential, ErrorKind, GitlabClient, ResourceRef,
};
use glctl::pagination::{paginate, ListCursor};
use mockito::{Matcher, Server};
use serde_json::json;

fn branches_json(range: std::ops::Range<usize>) -> String {
    let items: Vec<_> = range.map(|i| json!({ "name": format!("b{i}") })).collect();
    serde_json::to_string(&items).unwrap()
}

#[tokio::test]
async fn private_token_is_sent_as_header() {
    //* Given
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v4/projects")
        .match_header("private-token", "glpat-secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("owned".into(), "true".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":1,"name":"api","path":"api","path_with_namespace":"team/api"}]"#)
        .expect(1)
        .create_async()
        .await;

    //* When
    let client =
        GitlabClient::new(&server.url(), Credential::PrivateToken("glpat-secret".into())).unwrap();
    let opts = ListProjectsOptions {
        owned: Some(true),
        ..Default::default()
    };
    let page = client
        .list_projects(&opts, ListCursor::new(1, 50))
        .await
        .unwrap();

    //* Then
    mock.assert_async().await;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].path_with_namespace, "team/api");
    assert!(page.is_last);
}

#[tokio::test]
async fn bearer_token_and_api_suffix() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/v4/projects/team%2Fapi")
        .match_header("authorization", "Bearer oauth-123")
        .match_body(Matcher::Json(json!({"description": "REST API"})))
        .with_status(200)
        .with_body(r#"{"id":7,"name":"api","path":"api","path_with_namespace":"team/api"}"#)
        .create_async()
        .await;

    let base = glctl::auth::normalize_base_url(&format!("{}/api", server.url()));
    let client = GitlabClient::new(&base, Credential::Bearer("oauth-123".into())).unwrap();
    let opts = EditProjectOptions {
        description: Some("REST API".into()),
        ..Default::default()
    };
    let project = client
        .edit_project(&ResourceRef::parse("team/api"), &opts)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(project.id, 7);
}

#[tokio::test]
async fn all_pages_walks_until_short_page() {
    //* Given
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for (page, range) in [(1, 0..100), (2, 100..200), (3, 200..237)] {
        let mock = server
            .mock("GET", "/api/v4/projects/42/repository/branches")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), page.to_string()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .with_status(200)
            .with_body(branches_json(range))
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    //* When
    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let project = ResourceRef::Id(42);
    let opts = ListBranchesOptions::default();
    let branches = paginate(true, ListCursor::new(1, 20), |c| {
        let client = &client;
        let project = project.clone();
        let opts = opts.clone();
        async move { client.list_branches(&project, &opts, c).await }
    })
    .await
    .unwrap();

    //* Then
    for mock in &mocks {
        mock.assert_async().await;
    }
    assert_eq!(branches.len(), 237);
    assert_eq!(branches[236].name, "b236");
}

#[tokio::test]
async fn empty_next_page_header_ends_listing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v4/projects/42/repository/branches")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_header("x-next-page", "")
        .with_body(branches_json(0..100))
        .expect(1)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let page = client
        .list_branches(&ResourceRef::Id(42), &ListBranchesOptions::default(), ListCursor::new(1, 100))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.items.len(), 100);
    assert!(page.is_last);
}

#[tokio::test]
async fn failed_page_fails_whole_listing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v4/projects")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(
            serde_json::to_string(
                &(0..100)
                    .map(|i| json!({"id": i, "name": "p", "path": "p", "path_with_namespace": "g/p"}))
                    .collect::<Vec<_>>(),
            )
            .unwrap(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/v4/projects")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .with_body(r#"{"message":"500 Internal Server Error"}"#)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let opts = ListProjectsOptions::default();
    let result = paginate(true, ListCursor::new(1, 20), |c| {
        let client = &client;
        let opts = opts.clone();
        async move { client.list_projects(&opts, c).await }
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn not_found_is_classified_by_resource() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/v4/projects/1/repository/branches/feature%2Fx")
        .with_status(404)
        .with_body(r#"{"message":"404 Branch Not Found"}"#)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let err = client
        .delete_branch(&ResourceRef::Id(1), "feature/x")
        .await
        .unwrap_err();

    assert_eq!(classify(&err), ErrorKind::NotFound("Branch".into()));
    assert_eq!(
        api_error(err, "1:feature/x").to_string(),
        "Branch not found: 1:feature/x"
    );
}

#[tokio::test]
async fn edit_sends_only_changed_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/v4/projects/5")
        .match_body(Matcher::Json(json!({"visibility": "private"})))
        .with_status(200)
        .with_body(r#"{"id":5,"name":"api","path":"api","path_with_namespace":"team/api","visibility":"private"}"#)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let opts = EditProjectOptions {
        visibility: Some("private".parse().unwrap()),
        ..Default::default()
    };
    client.edit_project(&ResourceRef::Id(5), &opts).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn file_update_and_delete_encode_path() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/api/v4/projects/5/repository/files/docs%2FREADME.md")
        .match_body(Matcher::Json(json!({
            "branch": "main",
            "content": "aGVsbG8=",
            "encoding": "base64",
            "commit_message": "Update docs/README.md"
        })))
        .with_status(200)
        .with_body(r#"{"file_path":"docs/README.md","branch":"main"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v4/projects/5/repository/files/docs%2Fold.md")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("branch".into(), "main".into()),
            Matcher::UrlEncoded("commit_message".into(), "Delete docs/old.md".into()),
        ]))
        .with_status(204)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let project = ResourceRef::Id(5);
    let commit = client
        .update_file(
            &project,
            "docs/README.md",
            &UpdateFileOptions {
                branch: "main".into(),
                content: "aGVsbG8=".into(),
                encoding: Some("base64".into()),
                commit_message: "Update docs/README.md".into(),
            },
        )
        .await
        .unwrap();
    client
        .delete_file(
            &project,
            "docs/old.md",
            &DeleteFileOptions {
                branch: "main".into(),
                commit_message: "Delete docs/old.md".into(),
            },
        )
        .await
        .unwrap();

    update.assert_async().await;
    delete.assert_async().await;
    assert_eq!(commit.file_path, "docs/README.md");
}

#[tokio::test]
async fn empty_repository_tree_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v4/projects/9/repository/tree")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message":"404 Tree Not Found"}"#)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), Credential::PrivateToken("t".into())).unwrap();
    let err = client
        .list_tree(&ResourceRef::Id(9), &Default::default(), ListCursor::new(1, 100))
        .await
        .unwrap_err();

    assert_eq!(classify(&err), ErrorKind::EmptyRef);
    assert!(api_error(err, "9").to_string().contains("has no files"));
}
