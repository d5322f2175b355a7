pub mod actions;
pub mod pages;

use axum::{
    Router,
    middleware,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use gallery_api::{AppState, auth, messages, products, session, wishlist};

/// Assemble the full application router. Pulled out of `main` so the
/// integration tests can drive the exact surface the binary serves.
pub fn app(state: AppState, static_dir: &str) -> Router {
    let page_routes = Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login_page))
        .route("/signup", get(pages::signup_page))
        .route("/market", get(pages::market_page))
        .route("/sell", get(pages::sell_page))
        .route("/messages", get(pages::messages_page))
        .route("/health", get(pages::health))
        .with_state(state.clone());

    // Plain-HTML form targets. These gate on the session themselves
    // (redirecting to /login) and drive the same operations as the API.
    let action_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/sell", post(actions::sell_submit))
        .route("/market/cart/{id}", post(actions::cart_add))
        .route("/market/cart/{id}/remove", post(actions::cart_remove))
        .route("/market/buy/{id}", post(actions::buy_confirm))
        .route("/market/rent/{id}", post(actions::rent_request))
        .route("/market/edit/{id}", post(actions::edit_submit))
        .route("/market/message", post(actions::message_send))
        .route("/market/wishlist/{id}", post(actions::wishlist_toggle))
        .with_state(state.clone());

    let public_api = Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/user/wishlist", get(wishlist::get_wishlist))
        .with_state(state.clone());

    let protected_api = Router::new()
        .route("/api/products", post(products::create_product))
        .route("/api/products/{id}/sold", patch(products::mark_sold))
        .route("/api/products/{id}", patch(products::update_product))
        .route("/api/wishlist/toggle", post(wishlist::toggle_wishlist))
        .route("/api/user/me", get(auth::me))
        .route(
            "/api/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(page_routes)
        .merge(action_routes)
        .merge(public_api)
        .merge(protected_api)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
