/// Integration tests: drive the full router in-process against an in-memory
/// database, the same way a client would over HTTP.
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use jobhunt_api::token::TokenService;
use jobhunt_api::{AppStateInner, router};
use jobhunt_db::Database;

const SECRET: &str = "integration-test-secret";

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    let tokens = TokenService::new(SECRET, Duration::hours(1));
    router(AppStateInner::new(db, tokens))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register and log in, returning (token, user_id).
async fn sign_up(app: &Router, email: &str) -> (String, i64) {
    let creds = json!({ "email": email, "password": "pw123" });
    let (status, _) = send(app, "POST", "/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user_id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn register_then_login_yields_token_for_that_user() {
    let app = app();
    let creds = json!({ "email": "a@x.com", "password": "pw123" });

    let (status, body) = send(&app, "POST", "/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@x.com");
    let user_id = body["user_id"].as_i64().unwrap();

    let (status, body) = send(&app, "POST", "/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"].as_i64().unwrap(), user_id);

    let token = body["token"].as_str().unwrap();
    let verifier = TokenService::new(SECRET, Duration::hours(1));
    assert_eq!(verifier.verify(token).unwrap(), user_id);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = app();
    sign_up(&app, "a@x.com").await;

    let creds = json!({ "email": "A@x.com", "password": "other" });
    let (status, body) = send(&app, "POST", "/register", None, Some(creds)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already registered");
}

#[tokio::test]
async fn bad_login_does_not_say_why() {
    let app = app();
    sign_up(&app, "a@x.com").await;

    let wrong_pw = json!({ "email": "a@x.com", "password": "nope" });
    let (s1, b1) = send(&app, "POST", "/login", None, Some(wrong_pw)).await;
    let no_user = json!({ "email": "ghost@x.com", "password": "pw123" });
    let (s2, b2) = send(&app, "POST", "/login", None, Some(no_user)).await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn registration_body_is_validated() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn every_token_failure_looks_the_same() {
    let app = app();
    let (token, _) = sign_up(&app, "a@x.com").await;

    let expired = TokenService::new(SECRET, Duration::seconds(-30))
        .issue(1)
        .unwrap();
    let foreign = TokenService::new("some-other-secret", Duration::hours(1))
        .issue(1)
        .unwrap();

    let (missing_status, missing_body) = send(&app, "GET", "/company_lists", None, None).await;
    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);

    for bad in [expired.as_str(), foreign.as_str(), "garbage"] {
        let (status, body) = send(&app, "GET", "/company_lists", Some(bad), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, missing_body);
    }

    let req = Request::builder()
        .uri("/company_lists")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/company_lists", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn company_lists_are_scoped_to_their_owner() {
    let app = app();
    let (alice, alice_id) = sign_up(&app, "a@x.com").await;
    let (bob, _) = sign_up(&app, "b@x.com").await;

    let (status, created) = send(
        &app,
        "POST",
        "/company_lists",
        Some(&alice),
        Some(json!({ "company": "Acme", "member": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"].as_i64().unwrap(), alice_id);
    let id = created["id"].as_i64().unwrap();

    let (status, list) = send(&app, "GET", "/company_lists", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let update = json!({ "company": "Acme Corp", "member": 6, "selection": "final" });
    let uri = format!("/company_lists/{id}");

    let (status, _) = send(&app, "PUT", &uri, Some(&bob), Some(update.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", &uri, Some(&alice), Some(update)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/company_lists", Some(&alice), None).await;
    assert_eq!(list[0]["company"], "Acme Corp");
    assert_eq!(list[0]["selection"], "final");
    assert_eq!(list[0]["user_id"].as_i64().unwrap(), alice_id);

    let (status, _) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, "GET", "/company_lists", Some(&alice), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn company_list_rejects_client_supplied_owner() {
    let app = app();
    let (alice, _) = sign_up(&app, "a@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/company_lists",
        Some(&alice),
        Some(json!({ "company": "Acme", "member": 5, "user_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn internships_follow_the_same_rules() {
    let app = app();
    let (alice, alice_id) = sign_up(&app, "a@x.com").await;
    let (bob, _) = sign_up(&app, "b@x.com").await;

    let body = json!({
        "title": "Summer internship",
        "company": "Initech",
        "dailystart": 930,
        "dailyfinish": 1800,
        "selection": "applied"
    });
    let (status, created) = send(&app, "POST", "/internships", Some(&alice), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"].as_i64().unwrap(), alice_id);
    assert_eq!(created["joined"], false);

    let uri = format!("/internships/{}", created["id"]);
    let (status, _) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, "GET", "/internships", Some(&alice), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = send(&app, "GET", "/internships", Some(&bob), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn double_like_counts_once() {
    let app = app();
    let (u1, _) = sign_up(&app, "u1@x.com").await;
    let (u2, _) = sign_up(&app, "u2@x.com").await;

    let (status, post) = send(
        &app,
        "POST",
        "/posts",
        Some(&u1),
        Some(json!({ "title": "ES tips", "content": "Share yours", "display_name": "anon" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["like_count"], 0);
    assert_eq!(post["comment_count"], 0);
    let like_uri = format!("/posts/{}/like", post["id"]);
    let post_uri = format!("/posts/{}", post["id"]);

    let (status, _) = send(&app, "POST", &like_uri, Some(&u1), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", &like_uri, Some(&u1), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, seen_by_u1) = send(&app, "GET", &post_uri, Some(&u1), None).await;
    assert_eq!(seen_by_u1["post"]["like_count"], 1);
    assert_eq!(seen_by_u1["is_liked"], true);

    let (_, seen_by_u2) = send(&app, "GET", &post_uri, Some(&u2), None).await;
    assert_eq!(seen_by_u2["post"]["like_count"], 1);
    assert_eq!(seen_by_u2["is_liked"], false);

    // Unliking something never liked leaves the counter alone.
    let (status, _) = send(&app, "DELETE", &like_uri, Some(&u2), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &like_uri, Some(&u1), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = send(&app, "GET", &post_uri, Some(&u1), None).await;
    assert_eq!(after["post"]["like_count"], 0);
    assert_eq!(after["is_liked"], false);
}

#[tokio::test]
async fn comments_and_listing() {
    let app = app();
    let (u1, u1_id) = sign_up(&app, "u1@x.com").await;
    let (u2, _) = sign_up(&app, "u2@x.com").await;

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let (_, post) = send(
            &app,
            "POST",
            "/posts",
            Some(&u1),
            Some(json!({ "title": title, "content": "body", "display_name": "taro" })),
        )
        .await;
        ids.push(post["id"].as_i64().unwrap());
    }

    let comments_uri = format!("/posts/{}/comments", ids[0]);
    for (token, text) in [(&u2, "nice"), (&u1, "thanks")] {
        let (status, comment) = send(
            &app,
            "POST",
            &comments_uri,
            Some(token),
            Some(json!({ "content": text, "display_name": "hanako" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment["post_id"].as_i64().unwrap(), ids[0]);
    }

    let (_, detail) = send(&app, "GET", &format!("/posts/{}", ids[0]), Some(&u2), None).await;
    assert_eq!(detail["post"]["comment_count"], 2);
    assert_eq!(detail["post"]["user_id"].as_i64().unwrap(), u1_id);
    let texts: Vec<&str> = detail["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["nice", "thanks"]);

    let (status, page) = send(&app, "GET", "/posts", Some(&u2), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<i64> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
    assert_eq!(page[0]["is_liked"], false);

    let (_, page) = send(&app, "GET", "/posts?limit=1&offset=1", Some(&u2), None).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["id"].as_i64().unwrap(), ids[1]);

    let (status, _) = send(
        &app,
        "POST",
        "/posts/9999/comments",
        Some(&u1),
        Some(json!({ "content": "hello?", "display_name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/posts/9999", Some(&u1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_deletes_a_post() {
    let app = app();
    let (u1, _) = sign_up(&app, "u1@x.com").await;
    let (u2, _) = sign_up(&app, "u2@x.com").await;

    let (_, post) = send(
        &app,
        "POST",
        "/posts",
        Some(&u1),
        Some(json!({ "title": "t", "content": "c", "display_name": "n" })),
    )
    .await;
    let uri = format!("/posts/{}", post["id"]);

    let (status, _) = send(&app, "DELETE", &uri, Some(&u2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&u1), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, Some(&u1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn long_display_name_is_rejected() {
    let app = app();
    let (u1, _) = sign_up(&app, "u1@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/posts",
        Some(&u1),
        Some(json!({ "title": "t", "content": "c", "display_name": "x".repeat(21) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "display_name");
}

#[tokio::test]
async fn bad_path_and_query_are_field_errors() {
    let app = app();
    let (u1, _) = sign_up(&app, "u1@x.com").await;

    let (status, body) = send(&app, "GET", "/posts/abc", Some(&u1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");
    assert_eq!(body["fields"][0]["field"], "id");

    let (status, body) = send(&app, "DELETE", "/company_lists/xyz", Some(&u1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "id");

    let (status, body) = send(&app, "GET", "/posts?limit=-1", Some(&u1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");
    assert_eq!(body["fields"][0]["field"], "query");

    let (status, body) = send(&app, "GET", "/posts?limit=0", Some(&u1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "limit");
}

#[tokio::test]
async fn like_and_unlike_of_missing_post_are_not_found() {
    let app = app();
    let (u1, _) = sign_up(&app, "u1@x.com").await;

    let (status, body) = send(&app, "POST", "/posts/999/like", Some(&u1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");

    let (status, body) = send(&app, "DELETE", "/posts/999/like", Some(&u1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}
