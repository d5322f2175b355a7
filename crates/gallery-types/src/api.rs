use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Category, Mode};

// -- Auth --

#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub block: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// -- Products --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub mode: Mode,
}

/// Partial update. Absent fields are left untouched; the store applies
/// the whole patch in a single statement so an edit never half-lands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub mode: Option<Mode>,
    pub rented: Option<bool>,
    pub rented_till: Option<String>,
}

impl UpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.mode.is_none()
            && self.rented.is_none()
            && self.rented_till.is_none()
    }
}

// -- Wishlist --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleWishlistRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleWishlistResponse {
    /// Membership after the toggle.
    pub wishlisted: bool,
}

// -- Messages --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    /// Receiver display name, stored as given.
    pub receiver: String,
    pub content: String,
    pub product_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_fills_defaults() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Kettle","price":50.0,"image":null}"#).unwrap();
        assert_eq!(req.category, Category::Other);
        assert_eq!(req.mode, Mode::Buy);
        assert!(req.description.is_empty());
    }

    #[test]
    fn update_request_rejects_unknown_fields() {
        let res: Result<UpdateProductRequest, _> =
            serde_json::from_str(r#"{"price":10.0,"sold":true}"#);
        assert!(res.is_err(), "sold is not editable through the patch surface");
    }

    #[test]
    fn empty_patch_detected() {
        let patch = UpdateProductRequest::default();
        assert!(patch.is_empty());
        let patch = UpdateProductRequest { price: Some(1.0), ..Default::default() };
        assert!(!patch.is_empty());
    }
}
