use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gallery_types::models::SessionUser;

use crate::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "gallery_session";

/// Signed session claims: the identity summary derived at login. The
/// cookie carrying the token has no Max-Age, so the browser drops it
/// when the session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub block: String,
    pub room: String,
    pub exp: usize,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> SessionUser {
        SessionUser {
            id: claims.sub,
            name: claims.name,
            block: claims.block,
            room: claims.room,
        }
    }
}

pub fn issue_token(secret: &str, user: &SessionUser) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id,
        name: user.name.clone(),
        block: user.block.clone(),
        room: user.room.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::days(7)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Decode the session cookie into the current identity, if any.
/// Invalid or expired tokens read as no session.
pub fn session_user(jar: &CookieJar, secret: &str) -> Option<SessionUser> {
    let token = jar.get(SESSION_COOKIE)?.value();
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    Some(data.claims.into())
}

/// Middleware for the protected API routes: resolve the session cookie
/// and stash the identity as a request extension, or reject.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());
    let user = session_user(&jar, &state.session_secret).ok_or(ApiError::Unauthorized)?;

    let mut req = req;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            name: "Diya Sharma".into(),
            block: "Block B".into(),
            room: "204".into(),
        }
    }

    #[test]
    fn token_round_trips_the_session_summary() {
        let user = user();
        let token = issue_token("secret", &user).unwrap();

        let jar = CookieJar::new().add(session_cookie(token));
        let restored = session_user(&jar, "secret").unwrap();
        assert_eq!(restored, user);
    }

    #[test]
    fn wrong_secret_reads_as_no_session() {
        let token = issue_token("secret", &user()).unwrap();
        let jar = CookieJar::new().add(session_cookie(token));
        assert!(session_user(&jar, "other-secret").is_none());
    }

    #[test]
    fn missing_cookie_reads_as_no_session() {
        assert!(session_user(&CookieJar::new(), "secret").is_none());
    }

    #[test]
    fn session_cookie_is_scoped_to_the_browser_session() {
        let cookie = session_cookie("token".into());
        assert_eq!(cookie.max_age(), None);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
