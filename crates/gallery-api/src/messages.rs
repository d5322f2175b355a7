use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use gallery_types::api::SendMessageRequest;
use gallery_types::models::{Message, SessionUser};

use crate::AppState;
use crate::error::ApiError;

/// POST /api/messages — sender comes from the session; the receiver is
/// stored by display name as given, unresolved.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = send(&state, &user, req)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/messages — every message where the session identity's
/// display name is either party, newest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<impl IntoResponse, ApiError> {
    let messages: Vec<Message> = state
        .db
        .list_messages_for(&user.name)?
        .into_iter()
        .map(|row| row.into_message())
        .collect();
    Ok(Json(messages))
}

pub fn send(
    state: &AppState,
    user: &SessionUser,
    req: SendMessageRequest,
) -> Result<Message, ApiError> {
    let receiver = req.receiver.trim();
    if receiver.is_empty() {
        return Err(ApiError::BadRequest("receiver is required".into()));
    }
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content is required".into()));
    }

    let message = Message {
        id: Uuid::new_v4(),
        sender_id: user.id,
        sender: user.name.clone(),
        receiver: receiver.to_string(),
        content: req.content,
        product_id: req.product_id.filter(|p| !p.is_empty()),
        read: false,
        created_at: Utc::now(),
    };

    state.db.insert_message(&message)?;
    Ok(message)
}
