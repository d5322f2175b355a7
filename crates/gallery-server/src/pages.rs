//! Server-rendered HTML shells. The market grid itself comes from
//! gallery-view; these handlers only gather the snapshots, gate on the
//! session and wrap the fragment in the page chrome.

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use gallery_api::error::ApiError;
use gallery_api::session::session_user;
use gallery_api::{AppState, wishlist};
use gallery_types::models::{Category, Mode, Product, SessionUser};
use gallery_view::render::escape_html;
use gallery_view::{Cart, Filters, MarketView, ModalState};

use crate::actions::CART_COOKIE;

pub async fn home() -> Redirect {
    Redirect::to("/market")
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn shell(title: &str, viewer: Option<&SessionUser>, body: &str) -> Html<String> {
    let nav = match viewer {
        Some(user) => format!(
            "<a href=\"/market\">Market</a>\
             <a href=\"/sell\">Sell</a>\
             <a href=\"/messages\">Messages</a>\
             <span class=\"nav-user\">Hi, {}</span>",
            escape_html(&user.name)
        ),
        None => "<a href=\"/login\">Login</a><a href=\"/signup\">Sign up</a>".to_string(),
    };

    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} · Girls Goods Gallery</title>\n\
         <link rel=\"stylesheet\" href=\"/static/style.css\">\n\
         </head>\n<body>\n\
         <header class=\"site-header\">\n\
         <a class=\"brand\" href=\"/market\">Girls Goods Gallery</a>\n\
         <nav>{nav}</nav>\n\
         </header>\n\
         <main>\n{body}</main>\n\
         </body>\n</html>\n"
    ))
}

#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

fn entry_banner(query: &EntryQuery) -> String {
    let text = match query.error.as_deref() {
        Some("invalid") => Some("Invalid credentials."),
        Some("missing") => Some("Please fill all required fields."),
        Some("exists") => Some("User already exists."),
        _ => match query.notice.as_deref() {
            Some("registered") => Some("Account created. Log in to continue."),
            _ => None,
        },
    };
    match text {
        Some(text) => format!("<p class=\"entry-banner\">{text}</p>\n"),
        None => String::new(),
    }
}

pub async fn login_page(Query(query): Query<EntryQuery>) -> Html<String> {
    let body = format!(
        "<section class=\"entry-card\">\n\
         <h1>Log in</h1>\n{banner}\
         <form method=\"post\" action=\"/login\">\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <p>New here? <a href=\"/signup\">Create an account</a></p>\n\
         </section>\n",
        banner = entry_banner(&query)
    );
    shell("Login", None, &body)
}

pub async fn signup_page(Query(query): Query<EntryQuery>) -> Html<String> {
    let body = format!(
        "<section class=\"entry-card\">\n\
         <h1>Sign up</h1>\n{banner}\
         <form method=\"post\" action=\"/signup\">\n\
         <label>Name <input type=\"text\" name=\"name\" required></label>\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <label>Phone <input type=\"tel\" name=\"phone\"></label>\n\
         <label>Block <input type=\"text\" name=\"block\"></label>\n\
         <label>Room <input type=\"text\" name=\"room\"></label>\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>\n\
         <p>Already registered? <a href=\"/login\">Log in</a></p>\n\
         </section>\n",
        banner = entry_banner(&query)
    );
    shell("Sign up", None, &body)
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub modal: Option<String>,
    pub target: Option<String>,
    pub notice: Option<String>,
}

pub async fn market_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<MarketQuery>,
) -> Result<Response, ApiError> {
    let Some(user) = session_user(&jar, &state.session_secret) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let catalog: Vec<Product> = state
        .db
        .list_products()?
        .into_iter()
        .map(|row| row.into_product())
        .collect();
    let wishlist: HashSet<Uuid> = wishlist::wishlist_ids(&state, &user)?.into_iter().collect();

    let filters = Filters::from_params(query.category.as_deref(), query.search.as_deref());
    let modal = ModalState::from_params(query.modal.as_deref(), query.target.as_deref());
    let cart = jar
        .get(CART_COOKIE)
        .map(|c| Cart::from_cookie_value(c.value()))
        .unwrap_or_default();

    let view = MarketView {
        catalog: &catalog,
        viewer: Some(&user),
        wishlist: &wishlist,
        filters: &filters,
        cart: &cart,
        modal: &modal,
        notice: query.notice.as_deref(),
    };

    Ok(shell("Market", Some(&user), &view.render()).into_response())
}

pub async fn sell_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(user) = session_user(&jar, &state.session_secret) else {
        return Redirect::to("/login").into_response();
    };

    let mut categories = String::new();
    for c in Category::ALL {
        categories.push_str(&format!("<option value=\"{0}\">{0}</option>", c.label()));
    }
    let mut modes = String::new();
    for m in [Mode::Buy, Mode::Rent, Mode::Borrow] {
        modes.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            m.as_str(),
            m.action_label()
        ));
    }

    let body = format!(
        "<section class=\"entry-card\">\n\
         <h1>List an item</h1>\n\
         <form method=\"post\" action=\"/sell\">\n\
         <label>Name <input type=\"text\" name=\"name\" required></label>\n\
         <label>Price <input type=\"number\" name=\"price\" min=\"0\" step=\"0.01\" required></label>\n\
         <label>Description <textarea name=\"description\"></textarea></label>\n\
         <label>Image URL <input type=\"url\" name=\"image\" placeholder=\"leave empty for a placeholder\"></label>\n\
         <label>Category <select name=\"category\">{categories}</select></label>\n\
         <label>Mode <select name=\"mode\">{modes}</select></label>\n\
         <button type=\"submit\">Post listing</button>\n\
         </form>\n\
         </section>\n"
    );
    shell("Sell", Some(&user), &body).into_response()
}

pub async fn messages_page(State(state): State<AppState>, jar: CookieJar) -> Result<Response, ApiError> {
    let Some(user) = session_user(&jar, &state.session_secret) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let messages = state.db.list_messages_for(&user.name)?;
    let mut items = String::new();
    if messages.is_empty() {
        items.push_str("<p class=\"no-results\">No messages yet.</p>\n");
    }
    for row in messages {
        let message = row.into_message();
        items.push_str(&format!(
            "<div class=\"message\">\n\
             <span class=\"msg-meta\">{} &rarr; {} · {}</span>\n\
             <p>{}</p>\n\
             </div>\n",
            escape_html(&message.sender),
            escape_html(&message.receiver),
            message.created_at.format("%d %b %Y %H:%M"),
            escape_html(&message.content),
        ));
    }

    let body = format!(
        "<section class=\"messages-page\">\n\
         <h1>Messages</h1>\n\
         {items}\
         <form method=\"post\" action=\"/market/message\" class=\"compose\">\n\
         <label>To <input type=\"text\" name=\"receiver\" required></label>\n\
         <label>Message <textarea name=\"content\" required></textarea></label>\n\
         <button type=\"submit\">Send</button>\n\
         </form>\n\
         </section>\n"
    );
    Ok(shell("Messages", Some(&user), &body).into_response())
}
