//! End-to-end tests of the HTTP surface against the in-memory store.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use devhabit_config::{GitHubConfig, JwtAuthConfig, ServerConfig};
use devhabit_core::DataShapingService;
use devhabit_repository::MemoryStore;
use devhabit_rest::{build_router, links::LinkService, AppState};
use devhabit_security::{EncryptionService, PasswordHasher, TokenProvider, TokenProviderInterface};
use devhabit_service::{
    sort_mapping_provider, AuthServiceComponent, GitHubAccessTokenService, GitHubAccessTokenServiceComponent,
    GitHubClient, GitHubServiceComponent, HabitServiceComponent, HabitTagServiceComponent, TagServiceComponent,
    UserContextComponent, UserServiceComponent,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const HATEOAS: &str = "application/vnd.dev-habit.hateoas+json";

fn jwt_config() -> JwtAuthConfig {
    JwtAuthConfig {
        key: "test-signing-key-that-is-long-enough-1234".to_string(),
        issuer: "devhabit.api".to_string(),
        audience: "devhabit.app".to_string(),
        expiration_in_minutes: 30,
        refresh_token_expiration_in_days: 7,
    }
}

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let tokens: Arc<dyn TokenProviderInterface> = Arc::new(TokenProvider::new(Arc::new(jwt_config())));
    let sort_mappings = Arc::new(sort_mapping_provider());
    let github_tokens: Arc<dyn GitHubAccessTokenService> = Arc::new(GitHubAccessTokenServiceComponent::new(
        store.clone(),
        Arc::new(EncryptionService::from_key([7u8; 32])),
    ));
    let github_api = Arc::new(GitHubClient::new(&GitHubConfig::default()).unwrap());

    let state = AppState {
        habit_service: Arc::new(HabitServiceComponent::new(store.clone(), sort_mappings.clone())),
        tag_service: Arc::new(TagServiceComponent::new(store.clone(), sort_mappings)),
        habit_tag_service: Arc::new(HabitTagServiceComponent::new(store.clone(), store.clone(), store.clone())),
        user_service: Arc::new(UserServiceComponent::new(store.clone())),
        auth_service: Arc::new(AuthServiceComponent::new(
            store.clone(),
            Arc::new(PasswordHasher::with_cost(1)),
            tokens.clone(),
        )),
        github_service: Arc::new(GitHubServiceComponent::new(github_tokens.clone(), github_api)),
        github_token_service: github_tokens,
        user_context: Arc::new(UserContextComponent::new(store)),
        token_provider: tokens,
        links: Arc::new(LinkService::new(None)),
        data_shaping: DataShapingService::new(),
        database: None,
    };

    build_router(state, &ServerConfig::default())
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse { status, headers, body }
}

fn request(method: Method, uri: &str, token: Option<&str>, accept: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(header::HOST, "localhost:8080");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn register(app: &Router, email: &str) -> String {
    let response = send(
        app,
        request(
            Method::POST,
            "/auth/register",
            None,
            None,
            Some(json!({
                "name": "Ada",
                "email": email,
                "password": "secret123",
                "confirmPassword": "secret123"
            })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["accessToken"].as_str().unwrap().to_string()
}

fn habit_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Daily practice",
        "type": 2,
        "frequency": { "type": 1, "timesPerPeriod": 1 },
        "target": { "value": 30, "unit": "minutes" }
    })
}

async fn create_habit(app: &Router, token: &str, name: &str) -> String {
    let response = send(app, request(Method::POST, "/habits", Some(token), None, Some(habit_body(name)))).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_habits_require_authentication() {
    let app = app();

    let response = send(&app, request(Method::GET, "/habits", None, None, None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(response.body["status"], 401);
    assert_eq!(response.body["instance"], "/habits");
    assert!(response.body["requestId"].is_string());
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = app();

    let response = send(&app, request(Method::GET, "/habits", Some("not-a-jwt"), None, None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_habit_lifecycle() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let id = create_habit(&app, &token, "Read books").await;

    let response = send(&app, request(Method::GET, &format!("/habits/{id}"), Some(&token), None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Read books");
    assert_eq!(response.body["tags"], json!([]));

    let patch = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/habits/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json-patch+json")
        .body(Body::from(
            json!([{ "op": "replace", "path": "/name", "value": "Read more books" }]).to_string(),
        ))
        .unwrap();
    assert_eq!(send(&app, patch).await.status, StatusCode::NO_CONTENT);

    let response = send(
        &app,
        request(Method::PUT, &format!("/habits/{id}"), Some(&token), None, Some(habit_body("Read papers"))),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(
        &app,
        request(Method::GET, &format!("/habits/{id}?fields=name"), Some(&token), None, None),
    )
    .await;
    assert_eq!(response.body, json!({ "id": id, "name": "Read papers" }));

    let response = send(&app, request(Method::DELETE, &format!("/habits/{id}"), Some(&token), None, None)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(&app, request(Method::GET, &format!("/habits/{id}"), Some(&token), None, None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_habit_validation_errors() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let response = send(&app, request(Method::POST, "/habits", Some(&token), None, Some(habit_body("ab")))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["errors"].is_array());
}

#[tokio::test]
async fn test_habits_are_private_to_their_owner() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let grace = register(&app, "grace@example.com").await;
    let id = create_habit(&app, &ada, "Read books").await;

    let response = send(&app, request(Method::GET, &format!("/habits/{id}"), Some(&grace), None, None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hateoas_collection_links() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    for name in ["Read books", "Run daily", "Meditate"] {
        create_habit(&app, &token, name).await;
    }

    let response = send(
        &app,
        request(Method::GET, "/habits?pageSize=2&fields=name", Some(&token), Some(HATEOAS), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers.get(header::CONTENT_TYPE).unwrap(), HATEOAS);
    assert_eq!(response.body["totalCount"], 3);
    assert_eq!(response.body["hasNextPage"], true);

    let rels: Vec<&str> = response.body["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["rel"].as_str().unwrap())
        .collect();
    assert_eq!(rels, vec!["self", "create", "next"]);

    let item = &response.body["items"][0];
    assert!(item["name"].is_string());
    assert!(item.get("description").is_none());
    assert_eq!(item["links"].as_array().unwrap().len(), 5);
}

fn link<'a>(body: &'a Value, rel: &str) -> Option<&'a Value> {
    body["links"].as_array().unwrap().iter().find(|l| l["rel"] == rel)
}

fn query_of(href: &str) -> Vec<(String, String)> {
    url::Url::parse(href).unwrap().query_pairs().into_owned().collect()
}

#[tokio::test]
async fn test_paging_links_follow_the_request() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    for n in 1..=25 {
        create_habit(&app, &token, &format!("Habit {n:02}")).await;
    }
    let query = "pageSize=10&fields=name,status&search=Habit&sort=-name,type&type=2";

    let first = send(
        &app,
        request(Method::GET, &format!("/habits?page=1&{query}"), Some(&token), Some(HATEOAS), None),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["totalPages"], 3);
    assert_eq!(first.body["hasPreviousPage"], false);
    assert!(link(&first.body, "next").is_some());
    assert!(link(&first.body, "previous").is_none());

    let last = send(
        &app,
        request(Method::GET, &format!("/habits?page=3&{query}"), Some(&token), Some(HATEOAS), None),
    )
    .await;
    assert_eq!(last.status, StatusCode::OK);
    assert_eq!(last.body["items"].as_array().unwrap().len(), 5);
    assert_eq!(last.body["items"][0]["name"], "Habit 05");
    assert_eq!(last.body["hasNextPage"], false);
    assert_eq!(last.body["hasPreviousPage"], true);

    let rels: Vec<&str> = last.body["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["rel"].as_str().unwrap())
        .collect();
    assert_eq!(rels, vec!["self", "create", "previous"]);

    let expected_tail = vec![
        ("pageSize".to_string(), "10".to_string()),
        ("fields".to_string(), "name,status".to_string()),
        ("search".to_string(), "Habit".to_string()),
        ("sort".to_string(), "-name,type".to_string()),
        ("type".to_string(), "2".to_string()),
    ];
    for (rel, page) in [("self", "3"), ("previous", "2")] {
        let href = link(&last.body, rel).unwrap()["href"].as_str().unwrap();
        let pairs = query_of(href);
        assert_eq!(pairs[0], ("page".to_string(), page.to_string()), "{rel}: {href}");
        assert_eq!(pairs[1..], expected_tail[..], "{rel}: {href}");
    }

    let previous = link(&last.body, "previous").unwrap()["href"].as_str().unwrap();
    let path = previous.trim_start_matches("http://localhost:8080");
    let followed = send(&app, request(Method::GET, path, Some(&token), Some(HATEOAS), None)).await;
    assert_eq!(followed.status, StatusCode::OK);
    assert_eq!(followed.body["page"], 2);
    assert_eq!(followed.body["items"][0]["name"], "Habit 15");
    assert!(followed.body["items"][0].get("description").is_none());
}

#[tokio::test]
async fn test_plain_json_has_no_links() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    create_habit(&app, &token, "Read books").await;

    let response = send(&app, request(Method::GET, "/habits", Some(&token), None, None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("links").is_none());
    assert!(response.body["items"][0].get("links").is_none());
}

#[tokio::test]
async fn test_v2_media_type_renames_timestamps() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    create_habit(&app, &token, "Read books").await;

    let response = send(
        &app,
        request(Method::GET, "/habits", Some(&token), Some("application/vnd.dev-habit.2+json"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let item = &response.body["items"][0];
    assert!(item.get("createdAt").is_some());
    assert!(item.get("createdAtUtc").is_none());
}

#[tokio::test]
async fn test_unsupported_version_is_bad_request() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let response = send(
        &app,
        request(Method::GET, "/habits", Some(&token), Some("application/vnd.dev-habit.3+json"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_sort_and_fields_are_bad_requests() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    for uri in ["/habits?sort=bogus", "/habits?fields=bogus"] {
        let response = send(&app, request(Method::GET, uri, Some(&token), None, None)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }
}

#[tokio::test]
async fn test_habit_tags_upsert_and_delete() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let habit_id = create_habit(&app, &token, "Read books").await;

    let response = send(
        &app,
        request(Method::POST, "/tags", Some(&token), None, Some(json!({ "name": "Learning" }))),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.headers.get(header::LOCATION).is_some());
    let tag_id = response.body["id"].as_str().unwrap().to_string();

    let upsert = || {
        request(
            Method::PUT,
            &format!("/habits/{habit_id}/tags"),
            Some(&token),
            None,
            Some(json!({ "tagIds": [tag_id] })),
        )
    };
    assert_eq!(send(&app, upsert()).await.status, StatusCode::OK);
    assert_eq!(send(&app, upsert()).await.status, StatusCode::NO_CONTENT);

    let response = send(&app, request(Method::GET, &format!("/habits/{habit_id}"), Some(&token), None, None)).await;
    assert_eq!(response.body["tags"].as_array().unwrap().len(), 1);

    let uri = format!("/habits/{habit_id}/tags/{tag_id}");
    assert_eq!(
        send(&app, request(Method::DELETE, &uri, Some(&token), None, None)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        send(&app, request(Method::DELETE, &uri, Some(&token), None, None)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_duplicate_tag_name_conflicts() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    let body = json!({ "name": "Learning" });

    send(&app, request(Method::POST, "/tags", Some(&token), None, Some(body.clone()))).await;
    let response = send(&app, request(Method::POST, "/tags", Some(&token), None, Some(body))).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_tags_collection_links() {
    let app = app();
    let token = register(&app, "ada@example.com").await;
    send(&app, request(Method::POST, "/tags", Some(&token), None, Some(json!({ "name": "Learning" })))).await;

    let response = send(&app, request(Method::GET, "/tags", Some(&token), Some(HATEOAS), None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["links"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["items"][0]["links"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_current_user() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let response = send(&app, request(Method::GET, "/users/me", Some(&token), Some(HATEOAS), None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "ada@example.com");
    assert_eq!(response.body["links"][0]["rel"], "self");
}

#[tokio::test]
async fn test_user_by_id_requires_admin() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let response = send(&app, request(Method::GET, "/users/u_anything", Some(&token), None, None)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_and_refresh() {
    let app = app();
    register(&app, "ada@example.com").await;

    let response = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            None,
            Some(json!({ "email": "ada@example.com", "password": "secret123" })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let refresh_token = response.body["refreshToken"].as_str().unwrap().to_string();

    let response = send(
        &app,
        request(
            Method::POST,
            "/auth/refresh",
            None,
            None,
            Some(json!({ "refreshToken": refresh_token })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["accessToken"].is_string());

    let response = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_github_profile_without_token_is_not_found() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let response = send(&app, request(Method::GET, "/github/profile", Some(&token), None, None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();

    for uri in ["/health", "/ready", "/live"] {
        let response = send(&app, request(Method::GET, uri, None, None, None)).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.headers.get("x-request-id").unwrap(), "req-42");
}
