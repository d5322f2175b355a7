use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Extension, Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};
use uuid::Uuid;

use gallery_types::api::{LoginForm, SignupForm};
use gallery_types::models::SessionUser;

use crate::AppState;
use crate::error::ApiError;
use crate::session::{issue_token, session_cookie};

/// POST /signup — create the identity if the email is unused, then send
/// the student to the login form. Entry pages report outcomes through
/// query flags rather than API errors.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, ApiError> {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
        return Ok(Redirect::to("/signup?error=missing"));
    }

    let email = form.email.trim().to_lowercase();
    if state.db.get_user_by_email(&email)?.is_some() {
        return Ok(Redirect::to("/signup?error=exists"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(form.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hash failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();
    state.db.create_user(
        &user_id.to_string(),
        form.name.trim(),
        &email,
        &password_hash,
        form.phone.trim(),
        form.room.trim(),
        form.block.trim(),
    )?;

    info!("New user created: {} <{}>", form.name.trim(), email);
    Ok(Redirect::to("/login?notice=registered"))
}

/// POST /login — verify credentials and establish the session. Two
/// logins with the same credentials yield the same identity id; a wrong
/// password yields the invalid-credentials outcome and no session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let email = form.email.trim().to_lowercase();
    let Some(user) = state.db.get_user_by_email(&email)? else {
        return Ok((jar, Redirect::to("/login?error=invalid")));
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored hash unreadable for {}: {}", email, e))?;
    if Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        warn!("Failed login for {}", email);
        return Ok((jar, Redirect::to("/login?error=invalid")));
    }

    let session = SessionUser {
        id: user
            .id
            .parse()
            .map_err(|e| anyhow::anyhow!("corrupt user id '{}': {}", user.id, e))?,
        name: user.name,
        block: user.block,
        room: user.room,
    };
    let token = issue_token(&state.session_secret, &session)?;

    Ok((jar.add(session_cookie(token)), Redirect::to("/market")))
}

/// GET /api/user/me — the session identity summary.
pub async fn me(Extension(user): Extension<SessionUser>) -> Json<SessionUser> {
    Json(user)
}
