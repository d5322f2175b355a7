//! The market view engine: a pure, synchronous mapping from
//! (catalog snapshot, wishlist snapshot, filter state, session identity)
//! to rendered HTML, plus the ephemeral interaction state (cart, modals)
//! that drives it. Nothing here talks to the network or the store; all
//! gating computed here is advisory and re-enforced at the controller.

pub mod card;
pub mod cart;
pub mod filters;
pub mod modal;
pub mod render;

pub use card::{CardAction, CardState, card_state};
pub use cart::Cart;
pub use filters::{CategoryFilter, Filters};
pub use modal::{Modal, ModalKind, ModalState};
pub use render::MarketView;
