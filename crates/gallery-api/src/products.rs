use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use gallery_db::queries::ProductPatch;
use gallery_types::api::{CreateProductRequest, UpdateProductRequest};
use gallery_types::models::{Product, Seller, SessionUser};

use crate::AppState;
use crate::error::ApiError;

pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";

/// GET /api/products — the whole catalog, newest first.
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products: Vec<Product> = state
        .db
        .list_products()?
        .into_iter()
        .map(|row| row.into_product())
        .collect();
    Ok(Json(products))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = create_listing(&state, &user, req)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/products/{id}/sold
pub async fn mark_sold(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = mark_product_sold(&state, id)?;
    Ok(Json(product))
}

/// PATCH /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = edit_listing(&state, &user, id, req)?;
    Ok(Json(product))
}

/// Validate and persist a new listing. The seller snapshot is frozen
/// from the session identity, never taken from the payload.
pub fn create_listing(
    state: &AppState,
    user: &SessionUser,
    req: CreateProductRequest,
) -> Result<Product, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    validate_price(req.price)?;

    let image = match req.image {
        Some(image) if !image.trim().is_empty() => image,
        _ => PLACEHOLDER_IMAGE.to_string(),
    };

    let product = Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price: req.price,
        description: req.description,
        image,
        category: req.category,
        mode: req.mode,
        seller: Seller {
            id: user.id,
            name: user.name.clone(),
            hostel: user.block.clone(),
            room: user.room.clone(),
        },
        sold: false,
        rented: false,
        rented_till: None,
        created_at: Utc::now(),
    };

    state.db.insert_product(&product)?;
    info!("Listing created: {} by {}", product.name, user.name);
    Ok(product)
}

/// Flip the sold flag. Any authenticated caller may do this — a buyer
/// completing a purchase is not the seller, so there is deliberately no
/// ownership gate here.
pub fn mark_product_sold(state: &AppState, id: Uuid) -> Result<Product, ApiError> {
    let row = state
        .db
        .mark_sold(&id.to_string())?
        .ok_or(ApiError::NotFound)?;
    info!("Product {} marked sold", id);
    Ok(row.into_product())
}

/// Apply a partial edit, gated on ownership. Ownership compares the
/// stable seller id against the session id; display names are not
/// unique and play no part in the check.
pub fn edit_listing(
    state: &AppState,
    user: &SessionUser,
    id: Uuid,
    req: UpdateProductRequest,
) -> Result<Product, ApiError> {
    if let Some(price) = req.price {
        validate_price(price)?;
    }

    let existing = state
        .db
        .get_product(&id.to_string())?
        .ok_or(ApiError::NotFound)?;
    if existing.seller_id != user.id.to_string() {
        return Err(ApiError::Forbidden(
            "only the seller can edit a listing".into(),
        ));
    }

    let patch = ProductPatch {
        price: req.price,
        description: req.description,
        image: req.image,
        category: req.category.map(|c| c.label().to_string()),
        mode: req.mode.map(|m| m.as_str().to_string()),
        rented: req.rented,
        rented_till: req.rented_till,
    };

    let row = state
        .db
        .update_product(&id.to_string(), &patch)?
        .ok_or(ApiError::NotFound)?;
    Ok(row.into_product())
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::BadRequest(
            "price must be a non-negative number".into(),
        ));
    }
    Ok(())
}
