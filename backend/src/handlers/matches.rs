use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::{
    error::MatchError,
    models::{Ack, Match, SwipeOutcome, SwipeRequest},
    services::{ChatService, MatchResolver},
    utils::{authenticate, Config},
};

pub type AppState = (Arc<MatchResolver>, Arc<ChatService>, Config);

/// Unwrap a JSON body, turning extractor rejections into `{"error": ...}` 400s.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MatchError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| MatchError::InvalidInput(rejection.body_text()))
}

/// `POST /api/matches/swipe`
pub async fn swipe(
    State((resolver, _chats, config)): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SwipeRequest>, JsonRejection>,
) -> Response {
    let caller = match authenticate(&headers, &config.jwt_secret) {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    let target = req.target_user_id.unwrap_or_default();
    let action = req.action.unwrap_or_default();

    match resolver.resolve_raw(&caller.id, &target, &action).await {
        Ok(SwipeOutcome::Passed) => (StatusCode::OK, Json(Ack { ok: true })).into_response(),
        Ok(SwipeOutcome::Created(record)) => (StatusCode::CREATED, Json(record)).into_response(),
        Ok(SwipeOutcome::BecameMutual(record)) | Ok(SwipeOutcome::Unchanged(record)) => {
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// `GET /api/matches/mine`
pub async fn my_matches(
    State((resolver, _chats, config)): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let caller = match authenticate(&headers, &config.jwt_secret) {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };

    match resolver.matches_for(&caller.id).await {
        Ok(matches) => Json::<Vec<Match>>(matches).into_response(),
        Err(e) => e.into_response(),
    }
}
