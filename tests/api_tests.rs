use anireq::api::BoardOutcome;
use anireq::config::Config;
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use std::net::SocketAddr;
use tower::ServiceExt;

async fn spawn_app_with(config_fn: impl FnOnce(&mut Config)) -> Router {
    let db_path =
        std::env::temp_dir().join(format!("anireq-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config_fn(&mut config);

    let state = anireq::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    anireq::api::router(state)
}

async fn spawn_app() -> Router {
    spawn_app_with(|_| {}).await
}

fn peer(addr: &str) -> ConnectInfo<SocketAddr> {
    ConnectInfo(addr.parse().unwrap())
}

async fn get(app: &Router, uri: &str, from: &str) -> Response {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request.extensions_mut().insert(peer(from));
    app.clone().oneshot(request).await.unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    request.extensions_mut().insert(peer("127.0.0.1:40000"));
    app.clone().oneshot(request).await.unwrap()
}

async fn post_text(app: &Router, uri: &str, body: &str) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap();
    request.extensions_mut().insert(peer("127.0.0.1:40000"));
    app.clone().oneshot(request).await.unwrap()
}

fn outcome(response: &Response) -> Option<&'static str> {
    response.extensions().get::<BoardOutcome>().map(|o| o.0)
}

async fn json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], location);
}

async fn board(app: &Router) -> serde_json::Value {
    let response = get(app, "/", "127.0.0.1:40000").await;
    assert_eq!(response.status(), StatusCode::OK);
    json(response).await
}

#[tokio::test]
async fn test_empty_board() {
    let app = spawn_app().await;

    let body = board(&app).await;
    assert!(body["success"].as_bool().unwrap_or(false));
    assert_eq!(body["data"]["requests"], serde_json::json!([]));
    assert_eq!(body["data"]["request_count"], 0);
    assert_eq!(body["data"]["capacity"], 10);
    assert_eq!(body["data"]["is_full"], false);
}

#[tokio::test]
async fn test_add_and_vote_flow() {
    let app = spawn_app().await;

    let response = post_form(&app, "/add", "anime_name=Show+A&total_episodes=12").await;
    assert_redirect(&response, "/");

    let body = board(&app).await;
    let request = &body["data"]["requests"][0];
    assert_eq!(request["anime_name"], "Show A");
    assert_eq!(request["votes"], 1);
    assert_eq!(request["status"], "Pending");
    assert_eq!(request["total_episodes"], 12);
    assert_eq!(request["uploaded_episodes"], 0);

    let id = request["id"].as_i64().unwrap();
    let vote_uri = format!("/vote/{id}");

    assert_redirect(&get(&app, &vote_uri, "1.2.3.4:5000").await, "/");
    assert_redirect(&get(&app, &vote_uri, "1.2.3.4:6000").await, "/");
    assert_eq!(board(&app).await["data"]["requests"][0]["votes"], 2);

    assert_redirect(&get(&app, &vote_uri, "5.6.7.8:5000").await, "/");
    assert_eq!(board(&app).await["data"]["requests"][0]["votes"], 3);
}

#[tokio::test]
async fn test_rejected_add_still_redirects() {
    let app = spawn_app().await;

    assert_redirect(&post_form(&app, "/add", "anime_name=+++").await, "/");
    assert_redirect(&post_form(&app, "/add", "").await, "/");
    assert_eq!(board(&app).await["data"]["request_count"], 0);

    assert_redirect(
        &post_form(&app, "/add", "anime_name=Show&total_episodes=lots").await,
        "/",
    );
    assert_eq!(board(&app).await["data"]["requests"][0]["total_episodes"], 0);
}

#[tokio::test]
async fn test_board_reports_full() {
    let app = spawn_app_with(|config| config.board.max_requests = 2).await;

    post_form(&app, "/add", "anime_name=A").await;
    post_form(&app, "/add", "anime_name=B").await;
    assert_redirect(&post_form(&app, "/add", "anime_name=C").await, "/");

    let body = board(&app).await;
    assert_eq!(body["data"]["request_count"], 2);
    assert_eq!(body["data"]["is_full"], true);
}

#[tokio::test]
async fn test_owner_panel_flow() {
    let app = spawn_app().await;

    post_form(&app, "/add", "anime_name=Old&total_episodes=12").await;
    post_form(&app, "/add", "anime_name=New&total_episodes=24").await;

    let body = json(get(&app, "/owner_panel", "127.0.0.1:40000").await).await;
    assert_eq!(body["data"]["request_count"], 2);
    assert_eq!(body["data"]["requests"][0]["anime_name"], "New");
    let id = body["data"]["requests"][1]["id"].as_i64().unwrap();

    let response = get(&app, &format!("/update_status/{id}/Processing"), "127.0.0.1:1").await;
    assert_redirect(&response, "/owner_panel");

    let response = get(&app, &format!("/update_status/{id}/Done"), "127.0.0.1:1").await;
    assert_redirect(&response, "/owner_panel");

    let response = post_form(
        &app,
        &format!("/update_progress/{id}"),
        "total_episodes=12&uploaded_episodes=5",
    )
    .await;
    assert_redirect(&response, "/owner_panel");

    let response = post_form(
        &app,
        &format!("/update_progress/{id}"),
        "total_episodes=13&uploaded_episodes=x",
    )
    .await;
    assert_redirect(&response, "/owner_panel");

    let body = json(get(&app, "/owner_panel", "127.0.0.1:40000").await).await;
    let old = &body["data"]["requests"][1];
    assert_eq!(old["status"], "Processing");
    assert_eq!(old["total_episodes"], 12);
    assert_eq!(old["uploaded_episodes"], 5);

    let response = get(&app, &format!("/delete/{id}"), "127.0.0.1:1").await;
    assert_redirect(&response, "/owner_panel");

    let body = json(get(&app, "/owner_panel", "127.0.0.1:40000").await).await;
    assert_eq!(body["data"]["request_count"], 1);
    assert_eq!(body["data"]["requests"][0]["anime_name"], "New");
}

#[tokio::test]
async fn test_forwarded_for_requires_trusted_proxy() {
    let app = spawn_app_with(|config| {
        config.server.trusted_proxy_ips = vec!["10.0.0.1".to_string()];
    })
    .await;

    post_form(&app, "/add", "anime_name=Show").await;
    let id = board(&app).await["data"]["requests"][0]["id"]
        .as_i64()
        .unwrap();

    let vote_via = |proxy: &'static str, client: &'static str| {
        let mut request = Request::builder()
            .uri(format!("/vote/{id}"))
            .header("x-forwarded-for", client)
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(peer(proxy));
        app.clone().oneshot(request)
    };

    // Two clients behind the trusted proxy each get a vote.
    vote_via("10.0.0.1:1000", "1.1.1.1").await.unwrap();
    vote_via("10.0.0.1:1000", "2.2.2.2").await.unwrap();
    assert_eq!(board(&app).await["data"]["requests"][0]["votes"], 3);

    // An untrusted peer cannot mint identities with the header.
    vote_via("3.3.3.3:1000", "4.4.4.4").await.unwrap();
    vote_via("3.3.3.3:1000", "5.5.5.5").await.unwrap();
    assert_eq!(board(&app).await["data"]["requests"][0]["votes"], 4);
}

#[tokio::test]
async fn test_vote_on_unknown_request_redirects() {
    let app = spawn_app().await;

    assert_redirect(&get(&app, "/vote/999", "1.2.3.4:1").await, "/");
    assert_redirect(&get(&app, "/delete/999", "1.2.3.4:1").await, "/owner_panel");
    assert_eq!(board(&app).await["data"]["request_count"], 0);
}

#[tokio::test]
async fn test_responses_carry_board_outcome() {
    let app = spawn_app_with(|config| config.board.max_requests = 1).await;

    let response = post_form(&app, "/add", "anime_name=Show").await;
    assert_eq!(outcome(&response), Some("applied"));

    let response = post_form(&app, "/add", "anime_name=Other").await;
    assert_redirect(&response, "/");
    assert_eq!(outcome(&response), Some("capacity_reached"));

    let id = board(&app).await["data"]["requests"][0]["id"]
        .as_i64()
        .unwrap();
    let vote_uri = format!("/vote/{id}");

    let response = get(&app, &vote_uri, "1.2.3.4:5000").await;
    assert_eq!(outcome(&response), Some("applied"));

    let response = get(&app, &vote_uri, "1.2.3.4:5000").await;
    assert_redirect(&response, "/");
    assert_eq!(outcome(&response), Some("already_voted"));

    let response = get(&app, &format!("/update_status/{id}/Done"), "127.0.0.1:1").await;
    assert_redirect(&response, "/owner_panel");
    assert_eq!(outcome(&response), Some("invalid_status"));

    let response = get(&app, "/health/live", "127.0.0.1:1").await;
    assert_eq!(outcome(&response), None);
}

#[tokio::test]
async fn test_malformed_add_redirects_to_board() {
    let app = spawn_app().await;

    let response = post_text(&app, "/add", "anime_name=Show").await;
    assert_redirect(&response, "/");
    assert_eq!(outcome(&response), Some("malformed_form"));
    assert_eq!(board(&app).await["data"]["request_count"], 0);
}

#[tokio::test]
async fn test_malformed_progress_keeps_counters() {
    let app = spawn_app().await;

    post_form(&app, "/add", "anime_name=Show&total_episodes=12").await;
    let id = board(&app).await["data"]["requests"][0]["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/update_progress/{id}");

    post_form(&app, &uri, "total_episodes=12&uploaded_episodes=5").await;

    let response = post_text(&app, &uri, "total_episodes=1&uploaded_episodes=1").await;
    assert_redirect(&response, "/owner_panel");
    assert_eq!(outcome(&response), Some("malformed_form"));

    let request = &board(&app).await["data"]["requests"][0];
    assert_eq!(request["total_episodes"], 12);
    assert_eq!(request["uploaded_episodes"], 5);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = spawn_app().await;

    let response = get(&app, "/vote/abc", "1.2.3.4:1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "/vote/abc not found");

    let response = get(&app, "/delete/1x", "127.0.0.1:1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/update_status/abc/Done", "127.0.0.1:1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(&app, "/update_progress/abc", "total_episodes=1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_live() {
    let app = spawn_app().await;

    let response = get(&app, "/health/live", "127.0.0.1:1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert!(body["success"].as_bool().unwrap_or(false));
    assert_eq!(body["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let app = spawn_app().await;

    let response = get(&app, "/health/ready", "127.0.0.1:1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["data"]["ready"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_metrics_disabled_message() {
    let app = spawn_app().await;

    let response = get(&app, "/metrics", "127.0.0.1:1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Metrics not enabled or failed to initialize");
}
