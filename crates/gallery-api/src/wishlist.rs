use axum::{Extension, Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use gallery_types::api::{ToggleWishlistRequest, ToggleWishlistResponse};
use gallery_types::models::SessionUser;

use crate::AppState;
use crate::error::ApiError;
use crate::session::session_user;

/// POST /api/wishlist/toggle
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<ToggleWishlistRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let wishlisted = toggle(&state, &user, req.product_id)?;
    Ok(Json(ToggleWishlistResponse { wishlisted }))
}

/// GET /api/user/wishlist — unauthenticated callers get an empty list,
/// not an error, so the market page renders for everyone.
pub async fn get_wishlist(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let Some(user) = session_user(&jar, &state.session_secret) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(wishlist_ids(&state, &user)?))
}

pub fn toggle(state: &AppState, user: &SessionUser, product_id: Uuid) -> Result<bool, ApiError> {
    let wishlisted = state
        .db
        .toggle_wishlist(&user.id.to_string(), &product_id.to_string())?;
    Ok(wishlisted)
}

pub fn wishlist_ids(state: &AppState, user: &SessionUser) -> Result<Vec<Uuid>, ApiError> {
    let ids = state
        .db
        .wishlist_ids(&user.id.to_string())?
        .into_iter()
        .filter_map(|raw| raw.parse().ok())
        .collect();
    Ok(ids)
}
