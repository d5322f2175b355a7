//! End-to-end tests over the assembled router: entry flows, the JSON
//! API contract, and the server-rendered market page.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use gallery_api::AppStateInner;

fn test_app() -> Router {
    let db = gallery_db::Database::open_in_memory().expect("in-memory db");
    let state = Arc::new(AppStateInner {
        db,
        session_secret: "test-secret".into(),
    });
    gallery_server::app(state, "static")
}

fn form(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn signup(app: &Router, name: &str, email: &str) {
    let body = format!(
        "name={}&email={email}&password=sesame123&phone=&room=204&block=Block+B",
        name.replace(' ', "+"),
    );
    let mut req = form(body);
    *req.uri_mut() = "/signup".parse().unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

async fn login(app: &Router, email: &str, password: &str) -> axum::response::Response {
    let mut req = form(format!("email={email}&password={password}"));
    *req.uri_mut() = "/login".parse().unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// Register + log in, returning the session cookie pair.
async fn session_for(app: &Router, name: &str, email: &str) -> String {
    signup(app, name, email).await;
    let response = login(app, email, "sesame123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/market");
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn create_product(app: &Router, cookie: &str, payload: Value) -> axum::response::Response {
    let req = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(payload.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn get_json(app: &Router, uri: &str, cookie: Option<&str>) -> Value {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn anonymous_market_redirects_to_login() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/market").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn protected_api_rejects_missing_session() {
    let app = test_app();

    for (method, uri) in [
        ("POST", "/api/products"),
        ("POST", "/api/wishlist/toggle"),
        ("GET", "/api/user/me"),
        ("GET", "/api/messages"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} must require a session"
        );
    }
}

#[tokio::test]
async fn repeat_logins_yield_the_same_identity() {
    let app = test_app();
    let cookie_a = session_for(&app, "Diya Sharma", "diya@campus.edu").await;

    let response = login(&app, "diya@campus.edu", "sesame123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie_b = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let me_a = get_json(&app, "/api/user/me", Some(&cookie_a)).await;
    let me_b = get_json(&app, "/api/user/me", Some(&cookie_b)).await;
    assert_eq!(me_a["id"], me_b["id"]);
    assert_eq!(me_a["name"], "Diya Sharma");
    assert_eq!(me_a["block"], "Block B");
}

#[tokio::test]
async fn wrong_password_establishes_no_session() {
    let app = test_app();
    signup(&app, "Riya Singh", "riya@campus.edu").await;

    let response = login(&app, "riya@campus.edu", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=invalid");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn duplicate_email_cannot_sign_up_twice() {
    let app = test_app();
    signup(&app, "Pooja Verma", "pooja@campus.edu").await;

    let mut req = form("name=Impostor&email=pooja@campus.edu&password=sesame123".into());
    *req.uri_mut() = "/signup".parse().unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(location(&response), "/signup?error=exists");
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let app = test_app();
    let cookie = session_for(&app, "Khyati Bajaj", "khyati@campus.edu").await;

    let response = create_product(
        &app,
        &cookie,
        json!({"name": "Kettle", "price": 50.0, "category": "Electronics", "mode": "rent"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert!(created["id"].is_string());

    let listed = get_json(&app, "/api/products", None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    let entry = &listed[0];
    assert_eq!(entry["id"], created["id"]);
    assert_eq!(entry["name"], "Kettle");
    assert_eq!(entry["price"], 50.0);
    assert_eq!(entry["category"], "Electronics");
    assert_eq!(entry["mode"], "rent");
    assert_eq!(entry["sold"], false);
    assert_eq!(entry["seller"]["name"], "Khyati Bajaj");
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = test_app();
    let cookie = session_for(&app, "Ananya Gupta", "ananya@campus.edu").await;

    for name in ["first", "second", "third"] {
        let response =
            create_product(&app, &cookie, json!({"name": name, "price": 10.0, "image": null}))
                .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed = get_json(&app, "/api/products", None).await;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["third", "second", "first"]);
}

#[tokio::test]
async fn invalid_listings_are_rejected() {
    let app = test_app();
    let cookie = session_for(&app, "Sneha Reddy", "sneha@campus.edu").await;

    let response =
        create_product(&app, &cookie, json!({"name": "  ", "price": 10.0, "image": null})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        create_product(&app, &cookie, json!({"name": "Lamp", "price": -5.0, "image": null})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn any_buyer_may_mark_sold_and_the_card_goes_terminal() {
    let app = test_app();
    let seller = session_for(&app, "Diya Sharma", "diya@campus.edu").await;
    let buyer = session_for(&app, "Riya Singh", "riya@campus.edu").await;

    let response = create_product(
        &app,
        &seller,
        json!({"name": "Denim Jacket", "price": 450.0, "image": null}),
    )
    .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    // the buyer is not the seller: mark-sold has no ownership gate
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/products/{id}/sold"))
                .header(header::COOKIE, &buyer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["sold"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/market")
                .header(header::COOKIE, &buyer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Item Sold"));
    assert!(!html.contains(&format!("modal=buy&target={id}")));
    assert!(!html.contains(&format!("/market/cart/{id}?")));
}

#[tokio::test]
async fn marking_an_unknown_product_sold_is_not_found() {
    let app = test_app();
    let cookie = session_for(&app, "Diya Sharma", "diya@campus.edu").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/products/{}/sold", uuid::Uuid::new_v4()))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edits_are_gated_on_the_seller_identity() {
    let app = test_app();
    let seller = session_for(&app, "Ananya Gupta", "ananya@campus.edu").await;
    let stranger = session_for(&app, "Pooja Verma", "pooja@campus.edu").await;

    let response = create_product(
        &app,
        &seller,
        json!({"name": "Lamp", "price": 300.0, "description": "warm light", "image": null}),
    )
    .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let patch = |cookie: &str, body: Value| {
        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/api/products/{id}"))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(req)
    };

    // a non-owner is rejected and nothing is applied
    let response = patch(&stranger, json!({"price": 1.0})).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let listed = get_json(&app, "/api/products", None).await;
    assert_eq!(listed[0]["price"], 300.0);

    // the owner's partial edit lands and leaves other fields alone
    let response = patch(&seller, json!({"price": 250.0})).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["price"], 250.0);
    assert_eq!(updated["description"], "warm light");
}

#[tokio::test]
async fn wishlist_toggle_round_trips() {
    let app = test_app();
    let cookie = session_for(&app, "Khyati Bajaj", "khyati@campus.edu").await;

    let response =
        create_product(&app, &cookie, json!({"name": "Kettle", "price": 50.0, "image": null}))
            .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let toggle = || {
        let req = Request::builder()
            .method("POST")
            .uri("/api/wishlist/toggle")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(json!({"product_id": id}).to_string()))
            .unwrap();
        app.clone().oneshot(req)
    };

    let body = body_json(toggle().await.unwrap()).await;
    assert_eq!(body["wishlisted"], true);
    let ids = get_json(&app, "/api/user/wishlist", Some(&cookie)).await;
    assert_eq!(ids.as_array().unwrap().len(), 1);

    // a second toggle restores the original membership
    let body = body_json(toggle().await.unwrap()).await;
    assert_eq!(body["wishlisted"], false);
    let ids = get_json(&app, "/api/user/wishlist", Some(&cookie)).await;
    assert!(ids.as_array().unwrap().is_empty());

    // anonymous callers get an empty list, not an error
    let ids = get_json(&app, "/api/user/wishlist", None).await;
    assert!(ids.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn messages_reach_either_party_newest_first() {
    let app = test_app();
    let diya = session_for(&app, "Diya Sharma", "diya@campus.edu").await;
    let riya = session_for(&app, "Riya Singh", "riya@campus.edu").await;
    let other = session_for(&app, "Sneha Reddy", "sneha@campus.edu").await;

    let send = |cookie: &str, content: &str| {
        let req = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(
                json!({"receiver": "Riya Singh", "content": content, "product_id": null})
                    .to_string(),
            ))
            .unwrap();
        app.clone().oneshot(req)
    };

    let response = send(&diya, "is the kettle free?").await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = send(&diya, "any update?").await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let inbox = get_json(&app, "/api/messages", Some(&riya)).await;
    let contents: Vec<&str> = inbox
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["any update?", "is the kettle free?"]);

    let unrelated = get_json(&app, "/api/messages", Some(&other)).await;
    assert!(unrelated.as_array().unwrap().is_empty());

    // empty content is a validation failure
    let req = Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &diya)
        .body(Body::from(
            json!({"receiver": "Riya Singh", "content": "  ", "product_id": null}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cart_cookie_dedups_and_reopens_the_cart_modal() {
    let app = test_app();
    let id = uuid::Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/market/cart/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("modal=cart"));
    assert!(location(&response).contains("notice=added"));
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.contains(&id.to_string()));

    // re-adding the same id is a no-op: no "added" toast this time
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/market/cart/{id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!location(&response).contains("notice=added"));
}
