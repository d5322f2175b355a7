use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product category. Labels are fixed and shown verbatim in the UI,
/// so the serde names carry the spaces and hyphens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Category {
    Clothing,
    Food,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    Electronics,
    #[serde(rename = "Pre-Loved")]
    PreLoved,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Clothing,
        Category::Food,
        Category::PersonalCare,
        Category::Electronics,
        Category::PreLoved,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Food => "Food",
            Category::PersonalCare => "Personal Care",
            Category::Electronics => "Electronics",
            Category::PreLoved => "Pre-Loved",
            Category::Other => "Other",
        }
    }

    /// Parse a stored or user-supplied label. Unknown labels fall back
    /// to `Other`, matching the store default.
    pub fn from_label(label: &str) -> Category {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .unwrap_or(Category::Other)
    }
}

/// Transaction type for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Buy,
    Rent,
    Borrow,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Buy => "buy",
            Mode::Rent => "rent",
            Mode::Borrow => "borrow",
        }
    }

    /// Button label on a product card.
    pub fn action_label(&self) -> &'static str {
        match self {
            Mode::Buy => "Buy",
            Mode::Rent => "Rent",
            Mode::Borrow => "Borrow",
        }
    }

    pub fn from_str_or_default(s: &str) -> Mode {
        match s {
            "rent" => Mode::Rent,
            "borrow" => Mode::Borrow,
            _ => Mode::Buy,
        }
    }
}

/// Denormalized seller snapshot embedded in each product. The stable
/// `id` is what ownership checks compare; the rest is display data
/// frozen at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: Uuid,
    pub name: String,
    pub hostel: String,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub image: String,
    pub category: Category,
    pub mode: Mode,
    pub seller: Seller,
    pub sold: bool,
    pub rented: bool,
    /// Free-text date label, e.g. "Sunday evening". Only meaningful
    /// while `rented` is set.
    pub rented_till: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A direct message between two students, optionally linked to a
/// product. The link is an unvalidated id string, not a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub product_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// The identity summary held in the session for the duration of one
/// browser session. Derived from the user record at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub block: String,
    pub room: String,
}
