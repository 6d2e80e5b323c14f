use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use roomble::{
    db::{MemoryChatStore, MemoryMatchStore},
    handlers::create_router,
    utils::issue_token,
    ChatService, Config, MatchResolver, StorePolicy,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Config) {
    let config = Config {
        jwt_secret: "integration-secret".to_string(),
        ..Config::default()
    };
    let policy = StorePolicy::from(&config);
    let resolver = Arc::new(MatchResolver::new(Arc::new(MemoryMatchStore::new()), policy));
    let chats = Arc::new(ChatService::new(Arc::new(MemoryChatStore::new()), policy));
    (create_router(resolver, chats, config.clone()), config)
}

fn bearer(config: &Config, user: &str) -> String {
    let token = issue_token(user, &config.jwt_secret, chrono::Duration::hours(1)).expect("token");
    format!("Bearer {}", token)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn post_json(app: &Router, config: &Config, path: &str, actor: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(path)
        .header(header::AUTHORIZATION, bearer(config, actor))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, req).await
}

async fn swipe(app: &Router, config: &Config, actor: &str, body: Value) -> (StatusCode, Value) {
    post_json(app, config, "/api/matches/swipe", actor, body).await
}

async fn get_as(app: &Router, config: &Config, path: &str, actor: &str) -> (StatusCode, Value) {
    let req = Request::get(path)
        .header(header::AUTHORIZATION, bearer(config, actor))
        .body(Body::empty())
        .expect("request");
    send(app, req).await
}

#[tokio::test]
async fn health_reports_service() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "service": "roomble-server" }));
}

#[tokio::test]
async fn like_like_back_then_like_again() {
    let (app, config) = test_app();

    let (status, created) = swipe(&app, &config, "u1", json!({ "targetUserId": "u2", "action": "like" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userA"], "u1");
    assert_eq!(created["userB"], "u2");
    assert_eq!(created["isMutual"], false);

    let (status, mutual) = swipe(&app, &config, "u2", json!({ "targetUserId": "u1", "action": "like" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mutual["id"], created["id"]);
    assert_eq!(mutual["userA"], "u1");
    assert_eq!(mutual["userB"], "u2");
    assert_eq!(mutual["isMutual"], true);

    let (status, again) = swipe(&app, &config, "u1", json!({ "targetUserId": "u2", "action": "like" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, mutual);
}

#[tokio::test]
async fn nope_is_acknowledged_without_payload() {
    let (app, config) = test_app();

    let (status, body) = swipe(&app, &config, "u1", json!({ "targetUserId": "u2", "action": "nope" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let req = Request::get("/api/matches/mine")
        .header(header::AUTHORIZATION, bearer(&config, "u1"))
        .body(Body::empty())
        .unwrap();
    let (status, mine) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine, json!([]));
}

#[tokio::test]
async fn invalid_swipes_are_client_errors() {
    let (app, config) = test_app();

    let cases = [
        json!({ "targetUserId": "u1", "action": "like" }),
        json!({ "targetUserId": "u2", "action": "maybe" }),
        json!({ "targetUserId": "", "action": "like" }),
        json!({ "action": "like" }),
        json!({ "targetUserId": "u2" }),
        json!({ "targetUserId": 123, "action": "like" }),
        json!("like"),
    ];
    for body in cases {
        let (status, response) = swipe(&app, &config, "u1", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let (app, config) = test_app();

    let no_content_type = Request::post("/api/matches/swipe")
        .header(header::AUTHORIZATION, bearer(&config, "u1"))
        .body(Body::from(json!({ "targetUserId": "u2", "action": "like" }).to_string()))
        .unwrap();
    let (status, body) = send(&app, no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let not_json = Request::post("/api/matches/swipe")
        .header(header::AUTHORIZATION, bearer(&config, "u1"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let (app, _) = test_app();

    let req = Request::post("/api/matches/swipe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing token");

    let req = Request::post("/api/chats/message")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() {
    let (app, _) = test_app();

    let req = Request::post("/api/matches/swipe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "targetUserId": "u2", "action": "like" }).to_string()))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing token");

    let req = Request::get("/api/matches/mine")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn mine_lists_only_callers_matches() {
    let (app, config) = test_app();

    swipe(&app, &config, "me", json!({ "targetUserId": "a", "action": "like" })).await;
    swipe(&app, &config, "b", json!({ "targetUserId": "me", "action": "super" })).await;
    swipe(&app, &config, "c", json!({ "targetUserId": "d", "action": "like" })).await;

    let req = Request::get("/api/matches/mine")
        .header(header::AUTHORIZATION, bearer(&config, "me"))
        .body(Body::empty())
        .unwrap();
    let (status, mine) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let mine = mine.as_array().expect("array");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|m| m["userA"] == "me" || m["userB"] == "me"));
}

#[tokio::test]
async fn messages_open_a_shared_chat() {
    let (app, config) = test_app();

    let (status, opened) = post_json(&app, &config, "/api/chats/message", "u2", json!({ "toUserId": "u1", "text": "hi" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(opened["userA"], "u1");
    assert_eq!(opened["userB"], "u2");
    assert_eq!(opened["messages"][0]["senderId"], "u2");
    assert_eq!(opened["messages"][0]["text"], "hi");

    let (status, reply) = post_json(&app, &config, "/api/chats/message", "u1", json!({ "toUserId": "u2", "text": "hey!" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["id"], opened["id"]);
    assert_eq!(reply["messages"].as_array().map(Vec::len), Some(2));

    let (status, listed) = get_as(&app, &config, "/api/chats", "u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["id"], opened["id"]);

    let (_, outsider) = get_as(&app, &config, "/api/chats", "u3").await;
    assert_eq!(outsider, json!([]));
}

#[tokio::test]
async fn invalid_messages_are_client_errors() {
    let (app, config) = test_app();

    let cases = [
        json!({ "toUserId": "u2" }),
        json!({ "text": "hi" }),
        json!({ "toUserId": "u1", "text": "hi" }),
        json!({ "toUserId": "u2", "text": "" }),
        json!({ "toUserId": "u2", "text": 5 }),
    ];
    for body in cases {
        let (status, response) = post_json(&app, &config, "/api/chats/message", "u1", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert!(response["error"].is_string());
    }
}
