use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The cart: an ordered list of product ids with append-only dedup.
/// Persisted in a cookie so it survives reloads while staying entirely
/// client-local.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<Uuid>,
}

impl Cart {
    /// Append an id; adding one already present is a no-op.
    /// Returns whether the cart changed.
    pub fn add(&mut self, id: Uuid) -> bool {
        if self.items.contains(&id) {
            return false;
        }
        self.items.push(id);
        true
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| *item != id);
        self.items.len() != before
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.items.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_cookie_value(&self) -> String {
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_string())
    }

    /// Tolerant parse: a missing or mangled cookie yields an empty cart
    /// rather than an error.
    pub fn from_cookie_value(value: &str) -> Cart {
        let items: Vec<Uuid> = serde_json::from_str(value).unwrap_or_default();
        Cart { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_order_and_dedups() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut cart = Cart::default();

        assert!(cart.add(a));
        assert!(cart.add(b));
        assert!(!cart.add(a), "re-adding a present id is a no-op");

        let items: Vec<Uuid> = cart.iter().collect();
        assert_eq!(items, [a, b]);
    }

    #[test]
    fn remove_is_idempotent() {
        let a = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(a);

        assert!(cart.remove(a));
        assert!(!cart.remove(a));
        assert!(cart.is_empty());
    }

    #[test]
    fn cookie_round_trip() {
        let mut cart = Cart::default();
        cart.add(Uuid::new_v4());
        cart.add(Uuid::new_v4());

        let restored = Cart::from_cookie_value(&cart.to_cookie_value());
        assert_eq!(restored, cart);
    }

    #[test]
    fn mangled_cookie_yields_empty_cart() {
        assert!(Cart::from_cookie_value("not json").is_empty());
        assert!(Cart::from_cookie_value("").is_empty());
        assert!(Cart::from_cookie_value("{\"items\":1}").is_empty());
    }
}
