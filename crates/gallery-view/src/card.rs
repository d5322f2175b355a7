use gallery_types::models::{Mode, Product, SessionUser};

/// What a product card may render as, mutually exclusive by priority.
/// A rented listing shows its badge even if `sold` is also set — the
/// two flags are not contractually exclusive and rented wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState<'a> {
    Rented { till: &'a str },
    Sold,
    Available { mode: Mode, owned: bool },
}

/// Action affordances a card exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    AddToCart,
    Transact(Mode),
    WishlistToggle,
    Chat,
    Edit,
}

pub fn card_state<'a>(product: &'a Product, viewer: Option<&SessionUser>) -> CardState<'a> {
    if product.rented {
        return CardState::Rented {
            till: product.rented_till.as_deref().unwrap_or("soon"),
        };
    }
    if product.sold {
        return CardState::Sold;
    }
    let owned = viewer.is_some_and(|v| v.id == product.seller.id);
    CardState::Available {
        mode: product.mode,
        owned,
    }
}

impl CardState<'_> {
    /// Actions for this card. Terminal states expose none.
    pub fn actions(&self) -> Vec<CardAction> {
        match self {
            CardState::Sold | CardState::Rented { .. } => vec![],
            CardState::Available { mode, owned } => {
                let mut actions = vec![
                    CardAction::AddToCart,
                    CardAction::Transact(*mode),
                    CardAction::WishlistToggle,
                    CardAction::Chat,
                ];
                if *owned {
                    actions.push(CardAction::Edit);
                }
                actions
            }
        }
    }
}
