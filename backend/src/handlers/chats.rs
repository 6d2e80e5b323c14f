use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::{
    handlers::matches::{json_body, AppState},
    models::{Chat, SendMessageRequest},
    utils::authenticate,
};

/// `GET /api/chats`
pub async fn list_chats(
    State((_resolver, chats, config)): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let caller = match authenticate(&headers, &config.jwt_secret) {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };

    match chats.chats_for(&caller.id).await {
        Ok(list) => Json::<Vec<Chat>>(list).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /api/chats/message`
pub async fn send_message(
    State((_resolver, chats, config)): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let caller = match authenticate(&headers, &config.jwt_secret) {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    let to_user_id = req.to_user_id.unwrap_or_default();
    let text = req.text.unwrap_or_default();

    match chats.send_message(&caller.id, &to_user_id, &text).await {
        Ok(chat) => (StatusCode::CREATED, Json(chat)).into_response(),
        Err(e) => e.into_response(),
    }
}
