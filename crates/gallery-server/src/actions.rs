//! Form targets behind the server-rendered pages. Each one gates on the
//! session, drives the same operation as the JSON API, then redirects
//! back into the market view.

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use gallery_api::error::ApiError;
use gallery_api::session::session_user;
use gallery_api::{AppState, messages, products, wishlist};
use gallery_types::api::{CreateProductRequest, SendMessageRequest, UpdateProductRequest};
use gallery_types::models::{Category, Mode, SessionUser};
use gallery_view::{Cart, Filters};

/// Cart contents live in this cookie: client-local, survives reloads,
/// gone with the browser session.
pub const CART_COOKIE: &str = "gallery_cart";

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl FilterParams {
    fn query_string(&self) -> String {
        Filters::from_params(self.category.as_deref(), self.search.as_deref()).query_string()
    }
}

fn require_session(state: &AppState, jar: &CookieJar) -> Result<SessionUser, Response> {
    session_user(jar, &state.session_secret)
        .ok_or_else(|| Redirect::to("/login").into_response())
}

fn cart_cookie(cart: &Cart) -> Cookie<'static> {
    Cookie::build((CART_COOKIE, cart.to_cookie_value()))
        .path("/")
        .same_site(SameSite::Lax)
        .build()
}

fn read_cart(jar: &CookieJar) -> Cart {
    jar.get(CART_COOKIE)
        .map(|c| Cart::from_cookie_value(c.value()))
        .unwrap_or_default()
}

/// POST /market/cart/{id} — add to the cart and reopen the market with
/// the cart modal showing, the way the storefront has always behaved.
pub async fn cart_add(
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let mut cart = read_cart(&jar);
    let added = cart.add(id);
    let q = params.query_string();
    let notice = if added { "&notice=added" } else { "" };
    (
        jar.add(cart_cookie(&cart)),
        Redirect::to(&format!("/market?{q}&modal=cart{notice}")),
    )
}

/// POST /market/cart/{id}/remove
pub async fn cart_remove(
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let mut cart = read_cart(&jar);
    cart.remove(id);
    let q = params.query_string();
    (
        jar.add(cart_cookie(&cart)),
        Redirect::to(&format!("/market?{q}&modal=cart")),
    )
}

#[derive(Debug, Deserialize)]
pub struct SellForm {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub mode: Option<String>,
}

/// POST /sell
pub async fn sell_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SellForm>,
) -> Result<Response, ApiError> {
    let user = match require_session(&state, &jar) {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    let req = CreateProductRequest {
        name: form.name,
        price: form.price,
        description: form.description,
        image: form.image,
        category: form.category.as_deref().map(Category::from_label).unwrap_or_default(),
        mode: form.mode.as_deref().map(Mode::from_str_or_default).unwrap_or_default(),
    };
    products::create_listing(&state, &user, req)?;
    Ok(Redirect::to("/market?notice=posted").into_response())
}

/// POST /market/buy/{id} — confirm a purchase: mark sold, back to the
/// refreshed market.
pub async fn buy_confirm(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    if let Err(redirect) = require_session(&state, &jar) {
        return Ok(redirect);
    }
    products::mark_product_sold(&state, id)?;
    Ok(Redirect::to("/market").into_response())
}

#[derive(Debug, Deserialize)]
pub struct RentForm {
    pub days: Option<u32>,
}

/// POST /market/rent/{id} — rent and borrow requests are advisory: the
/// seller arranges handover directly, nothing is reserved or persisted.
pub async fn rent_request(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Query(params): Query<FilterParams>,
    Form(form): Form<RentForm>,
) -> Result<Response, ApiError> {
    let user = match require_session(&state, &jar) {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    if state.db.get_product(&id.to_string())?.is_none() {
        return Err(ApiError::NotFound);
    }

    info!(
        "Rent request: {} wants product {} for {} day(s)",
        user.name,
        id,
        form.days.unwrap_or(1)
    );
    let q = params.query_string();
    Ok(Redirect::to(&format!("/market?{q}&notice=rent-requested")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub price: Option<f64>,
    pub description: Option<String>,
    pub rented: Option<String>,
    pub rented_till: Option<String>,
}

/// POST /market/edit/{id}
pub async fn edit_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Form(form): Form<EditForm>,
) -> Result<Response, ApiError> {
    let user = match require_session(&state, &jar) {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    // checkbox semantics: present means checked, absent means cleared
    let req = UpdateProductRequest {
        price: form.price,
        description: form.description,
        rented: Some(form.rented.as_deref() == Some("true")),
        rented_till: form.rented_till.filter(|t| !t.trim().is_empty()),
        ..Default::default()
    };
    products::edit_listing(&state, &user, id, req)?;
    Ok(Redirect::to("/market?notice=updated").into_response())
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    pub receiver: String,
    pub content: String,
    pub product_id: Option<String>,
}

/// POST /market/message — shared by the market chat modal and the
/// messages page compose form.
pub async fn message_send(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Result<Response, ApiError> {
    let user = match require_session(&state, &jar) {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    let from_market = form.product_id.is_some();
    let req = SendMessageRequest {
        receiver: form.receiver,
        content: form.content,
        product_id: form.product_id,
    };
    messages::send(&state, &user, req)?;

    let target = if from_market { "/market?notice=sent" } else { "/messages" };
    Ok(Redirect::to(target).into_response())
}

/// POST /market/wishlist/{id}
pub async fn wishlist_toggle(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Query(params): Query<FilterParams>,
) -> Result<Response, ApiError> {
    let user = match require_session(&state, &jar) {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    wishlist::toggle(&state, &user, id)?;
    let q = params.query_string();
    Ok(Redirect::to(&format!("/market?{q}")).into_response())
}
