use crate::helpers::{ALLOWED_ORIGIN, spawn_app, spawn_app_with_token};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn structure_returns_metadata_and_sorted_tree() {
    // Arrange
    let app = spawn_app().await;
    app.mount_repository("octo", "demo", "main").await;
    app.mount_branch("octo", "demo", "main").await;
    app.mount_listing(
        "octo",
        "demo",
        "main",
        "",
        json!([
            {"name": "b.txt", "path": "b.txt", "type": "file", "size": 2},
            {"name": "A", "path": "A", "type": "dir", "size": 0},
            {"name": "a.txt", "path": "a.txt", "type": "file", "size": 1}
        ]),
    )
    .await;
    app.mount_listing(
        "octo",
        "demo",
        "main",
        "A",
        json!([{"name": "inner.rs", "path": "A/inner.rs", "type": "file", "size": 30}]),
    )
    .await;

    // Act
    let response = app.post_structure("https://github.com/octo/demo").await;

    // Assert
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "success",
            "repo_info": {
                "name": "demo",
                "description": "A test repository",
                "stars": 42,
                "forks": 7,
                "default_branch": "main"
            },
            "structure": [
                {
                    "name": "A",
                    "path": "A",
                    "type": "directory",
                    "children": [
                        {"name": "inner.rs", "path": "A/inner.rs", "type": "file", "size": 30}
                    ]
                },
                {"name": "a.txt", "path": "a.txt", "type": "file", "size": 1},
                {"name": "b.txt", "path": "b.txt", "type": "file", "size": 2}
            ]
        })
    );
}

#[tokio::test]
async fn empty_repository_returns_empty_structure() {
    let app = spawn_app().await;
    app.mount_repository("octo", "empty", "main").await;
    app.mount_branch("octo", "empty", "main").await;
    app.mount_listing("octo", "empty", "main", "", json!([])).await;

    let response = app.post_structure("octo/empty").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["structure"], json!([]));
}

#[tokio::test]
async fn unparseable_url_returns_400() {
    let app = spawn_app().await;

    let response = app.post_structure("not a url").await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid GitHub repository URL")
    );
}

#[tokio::test]
async fn body_without_url_returns_json_detail() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .client
        .post(app.get_url("/api/structure"))
        .json(&json!({ "link": "octo/demo" }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("missing field `url`")
    );
    assert!(
        app.github_server
            .received_requests()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn malformed_bodies_return_json_detail() {
    let app = spawn_app().await;
    let test_cases = vec![
        ("application/json", "{\"url\": ", 400),
        ("text/plain", "{\"url\": \"octo/demo\"}", 415),
    ];

    for (content_type, body, expected_status) in test_cases {
        let response = app
            .client
            .post(app.get_url("/api/structure"))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            expected_status,
            "unexpected status for {content_type} body {body}"
        );
        let body: Value = response.json().await.unwrap();
        assert!(body["detail"].as_str().is_some_and(|detail| !detail.is_empty()));
    }
}

#[tokio::test]
async fn missing_explicit_branch_returns_404_without_fallback() {
    // Arrange
    let app = spawn_app().await;
    app.mount_repository("octo", "demo", "main").await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/branches/main"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.github_server)
        .await;

    // Act
    let response = app
        .post_structure("https://github.com/octo/demo/tree/feature/sub")
        .await;

    // Assert
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Branch 'feature' not found in repository");
}

#[tokio::test]
async fn exhausted_branch_fallback_returns_404() {
    let app = spawn_app().await;
    app.mount_repository("octo", "demo", "trunk").await;

    let response = app.post_structure("https://github.com/octo/demo").await;

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["detail"],
        "Repository or specified branch not found. Please verify the repository and branch exist and are accessible."
    );
    let branch_probes: Vec<String> = app
        .github_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .filter(|path| path.contains("/branches/"))
        .collect();
    assert_eq!(
        branch_probes,
        vec![
            "/repos/octo/demo/branches/trunk",
            "/repos/octo/demo/branches/main",
            "/repos/octo/demo/branches/master",
            "/repos/octo/demo/branches/develop",
        ]
    );
}

#[tokio::test]
async fn fallback_finds_common_branch() {
    let app = spawn_app().await;
    app.mount_repository("octo", "demo", "trunk").await;
    app.mount_branch("octo", "demo", "develop").await;
    app.mount_listing(
        "octo",
        "demo",
        "develop",
        "",
        json!([{"name": "README.md", "path": "README.md", "type": "file", "size": 5}]),
    )
    .await;

    let response = app.post_structure("octo/demo").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["structure"][0]["name"], "README.md");
}

#[tokio::test]
async fn rate_limit_returns_403() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&app.github_server)
        .await;

    let response = app.post_structure("octo/demo").await;

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["detail"],
        "GitHub API rate limit exceeded or authentication required"
    );
}

#[tokio::test]
async fn missing_token_returns_403() {
    let app = spawn_app_with_token("").await;

    let response = app.post_structure("octo/demo").await;

    assert_eq!(response.status(), 403);
    assert!(
        app.github_server
            .received_requests()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn other_upstream_errors_pass_through() {
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(
            ResponseTemplate::new(451)
                .set_body_json(json!({"message": "Repository access blocked"})),
        )
        .mount(&app.github_server)
        .await;

    let response = app.post_structure("octo/demo").await;

    assert_eq!(response.status(), 451);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Repository access blocked");
}

#[tokio::test]
async fn allowed_origin_receives_cors_headers() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, app.get_url("/api/structure"))
        .header("Origin", ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        ALLOWED_ORIGIN
    );
}
