pub mod auth;
pub mod error;
pub mod messages;
pub mod products;
pub mod session;
pub mod wishlist;

use std::sync::Arc;

use gallery_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
}
