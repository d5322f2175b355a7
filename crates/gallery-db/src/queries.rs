use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::models::{MessageRow, ProductRow, UserRow};
use gallery_types::models::{Message, Product};

/// Field-by-field patch for a product row. `None` leaves the stored
/// value untouched; the whole patch lands in one UPDATE statement.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub rented: Option<bool>,
    pub rented_till: Option<String>,
}

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        name: &str,
        email: &str,
        password_hash: &str,
        phone: &str,
        room: &str,
        block: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password, phone, room, block)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, name, email, password_hash, phone, room, block],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Products --

    pub fn insert_product(&self, product: &Product) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO products (id, name, price, description, image, category, mode,
                                       seller_id, seller_name, seller_hostel, seller_room,
                                       sold, rented, rented_till, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    product.id.to_string(),
                    product.name,
                    product.price,
                    product.description,
                    product.image,
                    product.category.label(),
                    product.mode.as_str(),
                    product.seller.id.to_string(),
                    product.seller.name,
                    product.seller.hostel,
                    product.seller.room,
                    product.sold,
                    product.rented,
                    product.rented_till,
                    product.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// All products, newest first. rowid breaks ties between rows
    /// created within the same timestamp granularity.
    pub fn list_products(&self) -> Result<Vec<ProductRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLS} FROM products ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([], product_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_product(&self, id: &str) -> Result<Option<ProductRow>> {
        self.with_conn(|conn| query_product(conn, id))
    }

    /// Flip the sold flag. Returns the updated row, or None if the id
    /// does not exist.
    pub fn mark_sold(&self, id: &str) -> Result<Option<ProductRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute("UPDATE products SET sold = 1 WHERE id = ?1", [id])?;
            if changed == 0 {
                return Ok(None);
            }
            query_product(conn, id)
        })
    }

    /// Apply a partial update in a single statement. Fields absent from
    /// the patch keep their stored value, so a rejected or failed edit
    /// never half-lands.
    pub fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Option<ProductRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE products SET
                     price       = COALESCE(?2, price),
                     description = COALESCE(?3, description),
                     image       = COALESCE(?4, image),
                     category    = COALESCE(?5, category),
                     mode        = COALESCE(?6, mode),
                     rented      = COALESCE(?7, rented),
                     rented_till = COALESCE(?8, rented_till)
                 WHERE id = ?1",
                params![
                    id,
                    patch.price,
                    patch.description,
                    patch.image,
                    patch.category,
                    patch.mode,
                    patch.rented,
                    patch.rented_till,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_product(conn, id)
        })
    }

    /// Wipe the catalog. Used by the seed tool before reloading demo
    /// listings.
    pub fn clear_products(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM products", [])?;
            Ok(removed)
        })
    }

    // -- Wishlist --

    /// Toggle membership: removes if present, inserts if not.
    /// Returns the membership after the toggle.
    pub fn toggle_wishlist(&self, user_id: &str, product_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT product_id FROM wishlist WHERE user_id = ?1 AND product_id = ?2",
                    params![user_id, product_id],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                conn.execute(
                    "DELETE FROM wishlist WHERE user_id = ?1 AND product_id = ?2",
                    params![user_id, product_id],
                )?;
                Ok(false)
            } else {
                conn.execute(
                    "INSERT INTO wishlist (user_id, product_id) VALUES (?1, ?2)",
                    params![user_id, product_id],
                )?;
                Ok(true)
            }
        })
    }

    pub fn wishlist_ids(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT product_id FROM wishlist WHERE user_id = ?1 ORDER BY added_at",
            )?;
            let ids = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, message: &Message) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, sender_id, sender, receiver, content, product_id, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    message.id.to_string(),
                    message.sender_id.to_string(),
                    message.sender,
                    message.receiver,
                    message.content,
                    message.product_id,
                    message.read,
                    message.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Every message where the given display name is either party,
    /// newest first.
    pub fn list_messages_for(&self, name: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, sender, receiver, content, product_id, read, created_at
                 FROM messages
                 WHERE sender = ?1 OR receiver = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([name], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        sender_id: row.get(1)?,
                        sender: row.get(2)?,
                        receiver: row.get(3)?,
                        content: row.get(4)?,
                        product_id: row.get(5)?,
                        read: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const PRODUCT_COLS: &str = "id, name, price, description, image, category, mode, \
                            seller_id, seller_name, seller_hostel, seller_room, \
                            sold, rented, rented_till, created_at";

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        image: row.get(4)?,
        category: row.get(5)?,
        mode: row.get(6)?,
        seller_id: row.get(7)?,
        seller_name: row.get(8)?,
        seller_hostel: row.get(9)?,
        seller_room: row.get(10)?,
        sold: row.get(11)?,
        rented: row.get(12)?,
        rented_till: row.get(13)?,
        created_at: row.get(14)?,
    })
}

fn query_product(conn: &Connection, id: &str) -> Result<Option<ProductRow>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {PRODUCT_COLS} FROM products WHERE id = ?1"))?;
    let row = stmt.query_row([id], product_from_row).optional()?;
    Ok(row)
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // column is a compile-time constant at every call site
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, email, password, phone, room, block, created_at
         FROM users WHERE {column} = ?1"
    ))?;
    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                phone: row.get(4)?,
                room: row.get(5)?,
                block: row.get(6)?,
                created_at: row.get(7)?,
            })
        })
        .optional()?;
    Ok(row)
}
