pub mod config;
pub mod models;

use chrono::Utc;
use models::*;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use settle_feed::{
    Author, Coordinate, DraftError, PollDraft, PollId, PollStore, PollSummary, PollView, api, seed,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const DEFAULT_WINDOW_DAYS: u32 = 7;

// ===== App State =====

/// One in-memory feed seen by one viewer.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<PollStore>>,
    viewer: Arc<Author>,
    location: Coordinate,
}

impl AppState {
    pub fn new(store: PollStore, viewer: Author, location: Coordinate) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            viewer: Arc::new(viewer),
            location,
        }
    }

    /// The demo viewer looking at the demo feed from `location`.
    pub fn seeded(location: Coordinate) -> Self {
        let store = seed::demo_polls(Utc::now()).into_iter().collect();
        Self::new(store, seed::demo_viewer(), location)
    }

    pub fn viewer(&self) -> &Author {
        &self.viewer
    }

    /// Every store mutation is a single step, so a panicking holder cannot
    /// leave it half-written and the lock is taken over.
    fn store(&self) -> MutexGuard<'_, PollStore> {
        self.store.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("poll store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

// ===== Router =====

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/feed", get(get_feed))
        .route("/search", get(search))
        .route("/polls", post(create_poll))
        .route("/polls/:id/vote", post(cast_vote).delete(retract_vote))
        .route("/refresh", post(refresh))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ===== Handlers =====

async fn root() -> &'static str {
    "Settle feed backend - Use /feed to see what people are asking"
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let polls = state.store().len();
    Json(serde_json::json!({
        "status": "ok",
        "polls": polls
    }))
}

async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    let tab = params.tab.unwrap_or_default();
    let query = params.q.unwrap_or_default();
    // a partial fix is ignored
    let here = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => state.location,
    };

    let polls = api::compute_feed(&*state.store(), &query, tab, &state.viewer, here, Utc::now());
    tracing::debug!(%tab, query = %query, count = polls.len(), "feed computed");

    Ok(Json(FeedResponse {
        tab,
        viewer: ViewerInfo {
            handle: state.viewer.handle.clone(),
            verified: state.viewer.verified,
            location: state.viewer.location.clone(),
        },
        polls,
    }))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<PollSummary>>, AppError> {
    let window_days = params.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let results = api::compute_search_results(&*state.store(), window_days, Utc::now());
    Ok(Json(results))
}

async fn create_poll(
    State(state): State<AppState>,
    Json(draft): Json<PollDraft>,
) -> Result<(StatusCode, Json<CreatedPoll>), AppError> {
    let id = api::create_poll(&mut *state.store(), &draft, &state.viewer, Utc::now())?;
    Ok((StatusCode::CREATED, Json(CreatedPoll { id })))
}

async fn cast_vote(
    State(state): State<AppState>,
    Path(poll_id): Path<PollId>,
    Json(vote_req): Json<VoteRequest>,
) -> Result<Json<VoteOutcome>, AppError> {
    let mut store = state.store();
    if store.get(poll_id).is_none() {
        return Err(AppError::NotFound(poll_id));
    }

    let applied = api::cast_vote(&mut store, poll_id, vote_req.option_id, &state.viewer);
    outcome(&store, poll_id, applied, &state.viewer)
}

async fn retract_vote(
    State(state): State<AppState>,
    Path(poll_id): Path<PollId>,
) -> Result<Json<VoteOutcome>, AppError> {
    let mut store = state.store();
    if store.get(poll_id).is_none() {
        return Err(AppError::NotFound(poll_id));
    }

    let applied = api::retract_vote(&mut store, poll_id, &state.viewer);
    outcome(&store, poll_id, applied, &state.viewer)
}

async fn refresh(State(state): State<AppState>) -> StatusCode {
    state.store().shuffle();
    StatusCode::NO_CONTENT
}

fn outcome(
    store: &PollStore,
    poll_id: PollId,
    applied: bool,
    viewer: &Author,
) -> Result<Json<VoteOutcome>, AppError> {
    let poll = store.get(poll_id).ok_or(AppError::NotFound(poll_id))?;
    Ok(Json(VoteOutcome {
        applied,
        poll: PollView::build(poll, viewer.id, Utc::now()),
    }))
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum AppError {
    NotFound(PollId),
    BadRequest(String),
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Poll {} not found", id)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, message).into_response()
    }
}
