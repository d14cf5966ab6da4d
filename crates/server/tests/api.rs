use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use settle_feed::{PollDraft, PollStore, PollSummary, seed};
use settle_server::{
    AppState, app,
    models::{CreatedPoll, FeedResponse, VoteOutcome},
};
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> Router {
    let store: PollStore = seed::demo_polls(Utc::now()).into_iter().collect();
    app(AppState::new(store, seed::demo_viewer(), seed::demo_location()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> T {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_seeded_polls() {
    let app = test_app();
    let health: serde_json::Value = get_json(&app, "/health").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["polls"], 7);
}

#[tokio::test]
async fn feed_defaults_to_for_you_and_is_ranked() {
    let app = test_app();
    let feed: FeedResponse = get_json(&app, "/feed").await;

    assert_eq!(feed.tab, settle_feed::Tab::ForYou);
    assert_eq!(feed.viewer.handle, "jordan");
    assert_eq!(feed.polls.len(), 7);
    let scores: Vec<f64> = feed.polls.iter().map(|p| p.score.unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
}

#[tokio::test]
async fn feed_filters_by_query() {
    let app = test_app();
    let feed: FeedResponse = get_json(&app, "/feed?tab=global&q=Sneakers").await;

    assert_eq!(feed.tab, settle_feed::Tab::Global);
    let titles: Vec<_> = feed.polls.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Everyday sneakers?"]);
}

#[tokio::test]
async fn feed_accepts_viewer_position() {
    let app = test_app();
    // standing on the SoHo polls puts them first on the nearby tab
    let feed: FeedResponse = get_json(&app, "/feed?tab=nearby&lat=40.7233&lon=-74.0030").await;
    assert_eq!(feed.polls[0].location, "SoHo");
}

#[tokio::test]
async fn unknown_tab_is_rejected() {
    let app = test_app();
    let request = Request::get("/feed?tab=trending").body(Body::empty()).unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn vote_then_duplicate_then_retract() {
    let app = test_app();
    let feed: FeedResponse = get_json(&app, "/feed?q=dinner").await;
    let poll = &feed.polls[0];
    let uri = format!("/polls/{}/vote", poll.id);

    let vote = serde_json::json!({ "option_id": poll.options[0].id });
    let (status, body) = send(&app, json_request("POST", &uri, vote)).await;
    assert_eq!(status, StatusCode::OK);
    let first: VoteOutcome = serde_json::from_slice(&body).unwrap();
    assert!(first.applied);
    assert_eq!(first.poll.total_votes, 1);
    assert_eq!(first.poll.chosen_option, Some(poll.options[0].id));
    assert_eq!(first.poll.options[0].percent, 100);

    let again = serde_json::json!({ "option_id": poll.options[1].id });
    let (status, body) = send(&app, json_request("POST", &uri, again)).await;
    assert_eq!(status, StatusCode::OK);
    let second: VoteOutcome = serde_json::from_slice(&body).unwrap();
    assert!(!second.applied);
    assert_eq!(second.poll, first.poll);

    let retract = Request::delete(&uri).body(Body::empty()).unwrap();
    let (status, body) = send(&app, retract).await;
    assert_eq!(status, StatusCode::OK);
    let retracted: VoteOutcome = serde_json::from_slice(&body).unwrap();
    assert!(retracted.applied);
    assert_eq!(retracted.poll.total_votes, 0);
    assert_eq!(retracted.poll.chosen_option, None);

    let retract = Request::delete(&uri).body(Body::empty()).unwrap();
    let (_, body) = send(&app, retract).await;
    let noop: VoteOutcome = serde_json::from_slice(&body).unwrap();
    assert!(!noop.applied);
}

#[tokio::test]
async fn vote_for_foreign_option_is_not_applied() {
    let app = test_app();
    let feed: FeedResponse = get_json(&app, "/feed").await;
    let uri = format!("/polls/{}/vote", feed.polls[0].id);

    let vote = serde_json::json!({ "option_id": Uuid::new_v4() });
    let (status, body) = send(&app, json_request("POST", &uri, vote)).await;
    assert_eq!(status, StatusCode::OK);
    let outcome: VoteOutcome = serde_json::from_slice(&body).unwrap();
    assert!(!outcome.applied);
    assert_eq!(outcome.poll.total_votes, 0);
}

#[tokio::test]
async fn vote_on_unknown_poll_is_not_found() {
    let app = test_app();
    let uri = format!("/polls/{}/vote", Uuid::new_v4());
    let vote = serde_json::json!({ "option_id": Uuid::new_v4() });

    let (status, _) = send(&app, json_request("POST", &uri, vote)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_poll_tops_search_once_voted() {
    let app = test_app();
    let draft = PollDraft::new("Which jacket?", "fashion", "a.jpg", "b.jpg");
    let (status, body) = send(
        &app,
        json_request("POST", "/polls", serde_json::to_value(&draft).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: CreatedPoll = serde_json::from_slice(&body).unwrap();

    let feed: FeedResponse = get_json(&app, "/feed?q=jacket").await;
    assert_eq!(feed.polls.len(), 1);
    assert_eq!(feed.polls[0].id, created.id);
    assert_eq!(feed.polls[0].author, "jordan");

    let uri = format!("/polls/{}/vote", created.id);
    let vote = serde_json::json!({ "option_id": feed.polls[0].options[1].id });
    send(&app, json_request("POST", &uri, vote)).await;

    let results: Vec<PollSummary> = get_json(&app, "/search?window_days=7").await;
    assert_eq!(results.len(), 8);
    assert_eq!(results[0].id, created.id);
    assert_eq!(results[0].total_votes, 1);
    assert_eq!(results[0].cover_image.as_deref(), Some("a.jpg"));
}

#[tokio::test]
async fn invalid_draft_is_bad_request() {
    let app = test_app();
    let draft = serde_json::json!({
        "title": "   ",
        "tag": "food",
        "option_a_image": "a.jpg",
        "option_b_image": "b.jpg"
    });

    let (status, body) = send(&app, json_request("POST", "/polls", draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), "poll title is empty");

    let health: serde_json::Value = get_json(&app, "/health").await;
    assert_eq!(health["polls"], 7);
}

#[tokio::test]
async fn refresh_keeps_every_poll() {
    let app = test_app();
    let before: FeedResponse = get_json(&app, "/feed").await;

    let (status, _) = send(&app, Request::post("/refresh").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let after: Vec<PollSummary> = get_json(&app, "/search?window_days=365").await;
    let mut before_ids: Vec<_> = before.polls.iter().map(|p| p.id).collect();
    let mut after_ids: Vec<_> = after.iter().map(|p| p.id).collect();
    before_ids.sort();
    after_ids.sort();
    assert_eq!(before_ids, after_ids);
}

#[tokio::test]
async fn widest_search_window_returns_everything() {
    let app = test_app();
    let results: Vec<PollSummary> = get_json(&app, "/search?window_days=4294967295").await;
    assert_eq!(results.len(), 7);

    let health: serde_json::Value = get_json(&app, "/health").await;
    assert_eq!(health["status"], "ok");
    let feed: FeedResponse = get_json(&app, "/feed").await;
    assert_eq!(feed.polls.len(), 7);
}

#[tokio::test]
async fn overlong_poll_duration_is_bad_request() {
    let app = test_app();
    let draft = serde_json::json!({
        "title": "Forever poll",
        "tag": "food",
        "option_a_image": "a.jpg",
        "option_b_image": "b.jpg",
        "ends_in_hours": u32::MAX
    });

    let (status, body) = send(&app, json_request("POST", "/polls", draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), "poll must run between 1 and 8760 hours");

    let health: serde_json::Value = get_json(&app, "/health").await;
    assert_eq!(health["polls"], 7);
}
