//! Row types mapping directly to SQLite rows, kept separate from the
//! API-facing models in gallery-types.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use gallery_types::models::{Category, Message, Mode, Product, Seller};

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub room: String,
    pub block: String,
    pub created_at: String,
}

pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub category: String,
    pub mode: String,
    pub seller_id: String,
    pub seller_name: String,
    pub seller_hostel: String,
    pub seller_room: String,
    pub sold: bool,
    pub rented: bool,
    pub rented_till: Option<String>,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub sender_id: String,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub product_id: Option<String>,
    pub read: bool,
    pub created_at: String,
}

/// Parse a stored id, logging and substituting the nil uuid on corrupt
/// data rather than failing the whole listing.
fn parse_id(raw: &str, table: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}' in {}: {}", raw, table, e);
        Uuid::nil()
    })
}

fn parse_timestamp(raw: &str, table: &str, id: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // datetime('now') rows carry no timezone suffix
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' in {} row '{}': {}", raw, table, id, e);
            DateTime::default()
        })
}

impl ProductRow {
    pub fn into_product(self) -> Product {
        Product {
            id: parse_id(&self.id, "products"),
            name: self.name,
            price: self.price,
            description: self.description,
            image: self.image,
            category: Category::from_label(&self.category),
            mode: Mode::from_str_or_default(&self.mode),
            seller: Seller {
                id: parse_id(&self.seller_id, "products.seller"),
                name: self.seller_name,
                hostel: self.seller_hostel,
                room: self.seller_room,
            },
            sold: self.sold,
            rented: self.rented,
            rented_till: self.rented_till,
            created_at: parse_timestamp(&self.created_at, "products", &self.id),
        }
    }
}

impl MessageRow {
    pub fn into_message(self) -> Message {
        Message {
            id: parse_id(&self.id, "messages"),
            sender_id: parse_id(&self.sender_id, "messages.sender"),
            sender: self.sender,
            receiver: self.receiver,
            content: self.content,
            product_id: self.product_id,
            read: self.read,
            created_at: parse_timestamp(&self.created_at, "messages", &self.id),
        }
    }
}
