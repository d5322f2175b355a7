use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            phone       TEXT NOT NULL DEFAULT '',
            room        TEXT NOT NULL DEFAULT '',
            block       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS products (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            price         REAL NOT NULL,
            description   TEXT NOT NULL DEFAULT '',
            image         TEXT NOT NULL,
            category      TEXT NOT NULL DEFAULT 'Other',
            mode          TEXT NOT NULL DEFAULT 'buy',
            seller_id     TEXT NOT NULL,
            seller_name   TEXT NOT NULL,
            seller_hostel TEXT NOT NULL DEFAULT '',
            seller_room   TEXT NOT NULL DEFAULT '',
            sold          INTEGER NOT NULL DEFAULT 0,
            rented        INTEGER NOT NULL DEFAULT 0,
            rented_till   TEXT,
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_products_created
            ON products(created_at);

        CREATE TABLE IF NOT EXISTS wishlist (
            user_id     TEXT NOT NULL REFERENCES users(id),
            product_id  TEXT NOT NULL,
            added_at    TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            sender_id   TEXT NOT NULL,
            sender      TEXT NOT NULL,
            receiver    TEXT NOT NULL,
            content     TEXT NOT NULL,
            product_id  TEXT,
            read        INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_parties
            ON messages(sender, receiver);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
