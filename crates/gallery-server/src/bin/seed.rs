//! Reload the catalog with demo listings for local development:
//! `cargo run --bin seed`

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use gallery_types::models::{Category, Mode, Product, Seller};

fn listing(
    name: &str,
    price: f64,
    description: &str,
    category: Category,
    mode: Mode,
    image: &str,
    seller_name: &str,
    hostel: &str,
    room: &str,
) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price,
        description: description.to_string(),
        image: image.to_string(),
        category,
        mode,
        seller: Seller {
            id: Uuid::new_v4(),
            name: seller_name.to_string(),
            hostel: hostel.to_string(),
            room: room.to_string(),
        },
        sold: false,
        rented: false,
        rented_till: None,
        created_at: Utc::now(),
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery=info".into()),
        )
        .init();

    let db_path = std::env::var("GALLERY_DB_PATH").unwrap_or_else(|_| "gallery.db".into());
    let db = gallery_db::Database::open(&PathBuf::from(&db_path))?;

    let removed = db.clear_products()?;
    info!("Cleared {} existing products", removed);

    let products = [
        listing(
            "Philips Hair Straightener",
            100.0,
            "Used only twice, good condition. Renting out because I don't use it often.",
            Category::Electronics,
            Mode::Rent,
            "https://images.unsplash.com/photo-1562362002-3860bb79c3d4?q=80&w=600&auto=format&fit=crop",
            "Diya Sharma",
            "Block B",
            "204",
        ),
        listing(
            "Blue Denim Jacket",
            450.0,
            "Vintage style, size M. Super comfortable.",
            Category::Clothing,
            Mode::Buy,
            "https://images.unsplash.com/photo-1523381210434-271e8be1f52b?q=80&w=600&auto=format&fit=crop",
            "Ananya Gupta",
            "Block C",
            "101",
        ),
        listing(
            "Maggie Pack (6-pack)",
            80.0,
            "Extra stock, selling at cost price.",
            Category::Food,
            Mode::Buy,
            "https://images.unsplash.com/photo-1612929633738-8fe44f7ec841?q=80&w=600&auto=format&fit=crop",
            "Riya Singh",
            "Block B",
            "305",
        ),
        listing(
            "Electric Kettle",
            50.0,
            "Available for rent on weekends. Perfect for late night coffee.",
            Category::Electronics,
            Mode::Rent,
            "https://images.unsplash.com/photo-1594213114663-d94db9b17126?q=80&w=600&auto=format&fit=crop",
            "Khyati Bajaj",
            "Block C",
            "402",
        ),
        listing(
            "Scientific Calculator",
            0.0,
            "Borrow for your exams! Just treat it with care.",
            Category::Electronics,
            Mode::Borrow,
            "https://images.unsplash.com/photo-1587145820266-a5951ee1f620?q=80&w=600&auto=format&fit=crop",
            "Sneha Reddy",
            "Block B",
            "112",
        ),
        listing(
            "Dove Body Lotion",
            150.0,
            "Unopened seal pack. Bought extra by mistake.",
            Category::PersonalCare,
            Mode::Buy,
            "https://images.unsplash.com/photo-1620916566398-39f1143ab7be?q=80&w=600&auto=format&fit=crop",
            "Pooja Verma",
            "Block C",
            "210",
        ),
    ];

    for product in &products {
        db.insert_product(product)?;
    }
    info!("Seeded {} products", products.len());

    Ok(())
}
