use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum_test::{TestResponse, TestServer, TestServerConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use pageview_gate::{
    article::{InMemoryArticleStore, NewArticle},
    router,
    session::SESSION_COOKIE,
    AppState, PageviewQuota, SessionStore,
};

struct Harness {
    server: TestServer,
    sessions: SessionStore,
}

async fn catalog() -> InMemoryArticleStore {
    let store = InMemoryArticleStore::new();
    let user = store.create_user("author").await.unwrap();
    for n in 1..=2 {
        store
            .create_article(
                user.id,
                NewArticle {
                    title: format!("Article {n}"),
                    content: format!("Content {n}\nparagraph 1"),
                    minutes_to_read: 10,
                },
            )
            .await
            .unwrap();
    }
    store
}

async fn app_state(limit: u32) -> AppState {
    AppState::new(
        Arc::new(catalog().await),
        PageviewQuota::new(limit),
        SessionStore::default(),
    )
}

fn cookie_saving_server(app: axum::Router) -> TestServer {
    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    TestServer::new_with_config(app, config).unwrap()
}

async fn harness(limit: u32) -> Harness {
    let state = app_state(limit).await;
    let sessions = state.sessions.clone();
    let server = cookie_saving_server(router(state));

    Harness { server, sessions }
}

fn session_id(response: &TestResponse) -> Uuid {
    Uuid::parse_str(response.cookie(SESSION_COOKIE).value()).unwrap()
}

impl Harness {
    async fn remaining(&self, id: &Uuid) -> Option<i64> {
        self.sessions.state(id).await.unwrap().pageviews_remaining
    }

    /// Views article 1 `times` times in a new session; returns the last
    /// response and the session's remaining count.
    async fn view_article(&self, times: usize) -> (TestResponse, Option<i64>) {
        let first = self.server.get("/articles/1").await;
        let id = session_id(&first);

        let mut last = first;
        for _ in 1..times {
            last = self.server.get("/articles/1").await;
        }

        (last, self.remaining(&id).await)
    }
}

#[tokio::test]
async fn test_list_articles_newest_first() {
    let harness = harness(3).await;

    let response = harness.server.get("/articles").await;

    response.assert_status_ok();
    response.assert_json(&json!([
        { "id": 2, "title": "Article 2", "minutes_to_read": 10, "author": "author", "preview": "paragraph 1" },
        { "id": 1, "title": "Article 1", "minutes_to_read": 10, "author": "author", "preview": "paragraph 1" }
    ]));
}

#[tokio::test]
async fn test_listing_is_not_metered() {
    let harness = harness(1).await;

    let listing = harness.server.get("/articles").await;
    listing.assert_status_ok();
    let id = session_id(&listing);
    for _ in 0..4 {
        harness.server.get("/articles").await.assert_status_ok();
    }
    assert_eq!(harness.remaining(&id).await, None);

    harness.server.get("/articles/1").await.assert_status_ok();
    assert_eq!(harness.remaining(&id).await, Some(0));
}

#[tokio::test]
async fn test_one_pageview() {
    let harness = harness(3).await;

    let (response, remaining) = harness.view_article(1).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "id": 1,
        "title": "Article 1",
        "minutes_to_read": 10,
        "author": "author",
        "content": "Content 1\nparagraph 1"
    }));
    assert_eq!(remaining, Some(2));
}

#[tokio::test]
async fn test_three_pageviews() {
    let harness = harness(3).await;

    let (response, remaining) = harness.view_article(3).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["content"], "Content 1\nparagraph 1");
    assert_eq!(remaining, Some(0));
}

#[tokio::test]
async fn test_more_than_three_pageviews() {
    let harness = harness(3).await;

    let (response, remaining) = harness.view_article(4).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Maximum pageview limit reached" }));
    assert_eq!(remaining, Some(-1));
}

#[tokio::test]
async fn test_remaining_count_is_not_exposed() {
    let harness = harness(3).await;

    let (response, _) = harness.view_article(1).await;

    let body: Value = response.json();
    let mut fields: Vec<&str> = body
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec!["author", "content", "id", "minutes_to_read", "title"]
    );
}

#[tokio::test]
async fn test_missing_article_still_counts() {
    let harness = harness(3).await;

    let response = harness.server.get("/articles/99").await;
    let id = session_id(&response);

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Article not found" }));
    assert_eq!(
        harness.sessions.state(&id).await.unwrap().pageviews_remaining,
        Some(2)
    );
}

#[tokio::test]
async fn test_rejected_request_skips_article_lookup() {
    let harness = harness(1).await;

    harness.server.get("/articles/1").await.assert_status_ok();
    let response = harness.server.get("/articles/99").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let state = app_state(3).await;
    let sessions = state.sessions.clone();
    let app = router(state);

    let exhausted = cookie_saving_server(app.clone());
    for _ in 0..4 {
        exhausted.get("/articles/1").await;
    }
    exhausted
        .get("/articles/1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let fresh = cookie_saving_server(app);
    let response = fresh.get("/articles/2").await;

    response.assert_status_ok();
    let id = session_id(&response);
    assert_eq!(
        sessions.state(&id).await.unwrap().pageviews_remaining,
        Some(2)
    );
}

#[tokio::test]
async fn test_cookie_issued_once() {
    let app = router(app_state(3).await);

    let first = app
        .clone()
        .oneshot(Request::get("/articles/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap().to_string();
    let second = app
        .oneshot(
            Request::get("/articles/1")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::OK);
    assert!(second.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_unknown_session_cookie_gets_fresh_session() {
    let state = app_state(3).await;
    let sessions = state.sessions.clone();
    let app = router(state);

    let stale = Uuid::new_v4();
    let response = app
        .oneshot(
            Request::get("/articles/1")
                .header(header::COOKIE, format!("{SESSION_COOKIE}={stale}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());
    assert!(sessions.state(&stale).await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_views_in_one_session() {
    let state = app_state(3).await;
    let sessions = state.sessions.clone();
    let app = router(state);

    let listing = app
        .clone()
        .oneshot(Request::get("/articles").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = listing
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let id = Uuid::parse_str(cookie.split_once('=').unwrap().1).unwrap();

    let requests: Vec<_> = (0..40)
        .map(|_| {
            let app = app.clone();
            let cookie = cookie.clone();
            tokio::spawn(async move {
                let request = Request::get("/articles/1")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap();
                app.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    let mut ok = 0;
    let mut unauthorized = 0;
    for request in requests {
        match request.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::UNAUTHORIZED => unauthorized += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 3);
    assert_eq!(unauthorized, 37);
    assert_eq!(
        sessions.state(&id).await.unwrap().pageviews_remaining,
        Some(-37)
    );
}

#[tokio::test]
async fn test_invalid_article_id() {
    let harness = harness(3).await;

    let response = harness.server.get("/articles/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let harness = harness(3).await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
