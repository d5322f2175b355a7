//! HTML rendering for the market grid and its modal overlays. Pure
//! string building over the view state; the server wraps the result in
//! the page shell.

use std::collections::HashSet;

use uuid::Uuid;

use gallery_types::models::{Category, Mode, Product, SessionUser};

use crate::card::{CardAction, CardState, card_state};
use crate::cart::Cart;
use crate::filters::{CategoryFilter, Filters};
use crate::modal::{Modal, ModalKind, ModalState};

/// Escape text for interpolation into HTML bodies and attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a price in rupees with Indian digit grouping, the way the
/// storefront has always shown it (₹1,23,456).
pub fn format_price(price: f64) -> String {
    let negative = price < 0.0;
    let value = price.abs();
    let rupees = value.trunc() as u64;
    let paise = ((value - value.trunc()) * 100.0).round() as u64;

    let digits = rupees.to_string();
    let mut grouped = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        grouped.push(c);
        let remaining = len - i - 1;
        // last group of three, then groups of two
        if remaining > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
    }

    let sign = if negative { "-" } else { "" };
    if paise == 0 {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{paise:02}")
    }
}

fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "added" => Some("Added to cart!"),
        "posted" => Some("Posted!"),
        "updated" => Some("Listing updated."),
        "sent" => Some("Message sent!"),
        "rent-requested" => Some("Request sent! The seller will get back to you."),
        _ => None,
    }
}

/// Everything the market fragment is a function of. Rendering reads
/// only these snapshots; it never reaches back to the store.
pub struct MarketView<'a> {
    pub catalog: &'a [Product],
    pub viewer: Option<&'a SessionUser>,
    pub wishlist: &'a HashSet<Uuid>,
    pub filters: &'a Filters,
    pub cart: &'a Cart,
    pub modal: &'a ModalState,
    pub notice: Option<&'a str>,
}

impl MarketView<'_> {
    pub fn render(&self) -> String {
        let mut html = String::new();

        if let Some(text) = self.notice.and_then(notice_text) {
            html.push_str(&format!("<div class=\"toast-message\">{text}</div>\n"));
        }

        html.push_str(&self.render_toolbar());
        html.push_str(&self.render_grid());

        if let Some(modal) = self.modal.current() {
            html.push_str(&self.render_modal(modal));
        }

        html
    }

    fn href(&self, extra: &str) -> String {
        let q = self.filters.query_string();
        if extra.is_empty() {
            format!("/market?{q}")
        } else {
            format!("/market?{q}&{extra}")
        }
    }

    fn render_toolbar(&self) -> String {
        let search = escape_html(&self.filters.search);
        let category = escape_html(self.filters.category_param());

        let mut cats = String::new();
        let all_active = if self.filters.category == CategoryFilter::All { " active" } else { "" };
        let search_q = if self.filters.search.is_empty() {
            String::new()
        } else {
            format!("&search={}", crate::filters::percent_encode(&self.filters.search))
        };
        cats.push_str(&format!(
            "<a class=\"cat-btn{all_active}\" href=\"/market?category=all{search_q}\">All</a>"
        ));
        for c in Category::ALL {
            let active = if self.filters.category == CategoryFilter::Only(c) { " active" } else { "" };
            cats.push_str(&format!(
                "<a class=\"cat-btn{active}\" href=\"/market?category={}{search_q}\">{}</a>",
                crate::filters::percent_encode(c.label()),
                c.label()
            ));
        }

        format!(
            "<div class=\"filter-bar\">\n\
             <form method=\"get\" action=\"/market\" class=\"search-form\">\n\
             <input type=\"hidden\" name=\"category\" value=\"{category}\">\n\
             <input type=\"search\" name=\"search\" value=\"{search}\" placeholder=\"Search products...\">\n\
             <button type=\"submit\">Search</button>\n\
             </form>\n\
             <nav class=\"cat-nav\">{cats}</nav>\n\
             <a class=\"cart-link\" href=\"{}\">Cart ({})</a>\n\
             </div>\n",
            self.href("modal=cart"),
            self.cart.len()
        )
    }

    fn render_grid(&self) -> String {
        let products = self.filters.apply(self.catalog);
        if products.is_empty() {
            return "<div class=\"no-results\">No products found.</div>\n".to_string();
        }

        let mut html = String::from("<div class=\"product-grid\">\n");
        for product in products {
            html.push_str(&self.render_card(product));
        }
        html.push_str("</div>\n");
        html
    }

    fn render_card(&self, product: &Product) -> String {
        let state = card_state(product, self.viewer);
        let id = product.id;
        let name = escape_html(&product.name);
        let image = escape_html(&product.image);
        let sold_class = if matches!(state, CardState::Sold) { " sold-item" } else { "" };
        let heart_active = if self.wishlist.contains(&id) { " active" } else { "" };

        let mut actions = String::new();
        match &state {
            CardState::Rented { till } => {
                actions.push_str(&format!(
                    "<div class=\"rent-timer-badge\">Rented till: {}</div>",
                    escape_html(till)
                ));
            }
            CardState::Sold => {
                actions.push_str("<div class=\"sold-badge\">Item Sold</div>");
            }
            CardState::Available { .. } => {
                for action in state.actions() {
                    match action {
                        CardAction::AddToCart => actions.push_str(&format!(
                            "<form method=\"post\" action=\"/market/cart/{id}?{}\">\
                             <button class=\"btn btn-cart\" type=\"submit\">Add</button></form>",
                            self.filters.query_string()
                        )),
                        CardAction::Transact(mode) => {
                            let modal = match mode {
                                Mode::Buy => "buy",
                                Mode::Rent | Mode::Borrow => "rent",
                            };
                            actions.push_str(&format!(
                                "<a class=\"btn btn-{}\" href=\"{}\">{}</a>",
                                mode.as_str(),
                                self.href(&format!("modal={modal}&target={id}")),
                                mode.action_label()
                            ));
                        }
                        // the heart renders in the image wrapper, not the action row
                        CardAction::WishlistToggle => {}
                        CardAction::Chat => actions.push_str(&format!(
                            "<a class=\"btn-enquiry\" href=\"{}\">Is this available?</a>",
                            self.href(&format!("modal=message&target={id}"))
                        )),
                        CardAction::Edit => actions.push_str(&format!(
                            "<a class=\"btn-edit\" href=\"{}\">Edit</a>",
                            self.href(&format!("modal=edit&target={id}"))
                        )),
                    }
                }
            }
        }

        format!(
            "<article class=\"product-card{sold_class}\">\n\
             <div class=\"image-wrapper\">\n\
             <img src=\"{image}\" alt=\"{name}\" class=\"card-image\">\n\
             <form method=\"post\" action=\"/market/wishlist/{id}?{q}\">\
             <button class=\"wishlist-icon{heart_active}\" type=\"submit\" aria-label=\"Toggle wishlist\">&#9829;</button>\
             </form>\n\
             </div>\n\
             <div class=\"card-content\">\n\
             <div class=\"card-meta\"><span class=\"category-tag\">{category}</span></div>\n\
             <h3 class=\"card-title\">{name}</h3>\n\
             <div class=\"card-price\">{price}</div>\n\
             <p class=\"card-seller\">{seller}</p>\n\
             <div class=\"card-actions-container\">{actions}</div>\n\
             </div>\n\
             </article>\n",
            q = self.filters.query_string(),
            category = product.category.label(),
            price = format_price(product.price),
            seller = escape_html(&format!(
                "{} · {} · {}",
                product.seller.name, product.seller.hostel, product.seller.room
            )),
        )
    }

    fn find(&self, id: Uuid) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == id)
    }

    fn render_modal(&self, modal: Modal) -> String {
        let close = self.href("");
        let body = match modal.kind {
            ModalKind::Cart => self.render_cart_body(),
            kind => {
                // target-keyed modals render nothing if the product is gone
                let Some(product) = modal.target.and_then(|t| self.find(t)) else {
                    return String::new();
                };
                match kind {
                    ModalKind::Buy => render_buy_body(product),
                    ModalKind::Rent => render_rent_body(product, &self.filters.query_string()),
                    ModalKind::Edit => render_edit_body(product),
                    ModalKind::Message => render_message_body(product),
                    ModalKind::Cart => unreachable!(),
                }
            }
        };

        format!(
            "<div class=\"modal-overlay\">\n\
             <div class=\"modal-box\">\n\
             <a class=\"modal-close\" href=\"{close}\">&times;</a>\n\
             {body}\
             </div>\n\
             </div>\n"
        )
    }

    fn render_cart_body(&self) -> String {
        if self.cart.is_empty() {
            return "<h2>Your Cart</h2><p>Your cart is empty.</p>".to_string();
        }

        let mut items = String::new();
        for id in self.cart.iter() {
            // ids whose product vanished from the catalog are skipped
            let Some(product) = self.find(id) else { continue };
            items.push_str(&format!(
                "<div class=\"cart-item\">\n\
                 <img src=\"{}\" alt=\"\">\n\
                 <div><h4>{}</h4><p>{}</p></div>\n\
                 <form method=\"post\" action=\"/market/cart/{id}/remove?{}\">\
                 <button type=\"submit\">Remove</button></form>\n\
                 </div>\n",
                escape_html(&product.image),
                escape_html(&product.name),
                format_price(product.price),
                self.filters.query_string(),
            ));
        }
        format!("<h2>Your Cart</h2>\n{items}")
    }
}

fn render_buy_body(product: &Product) -> String {
    format!(
        "<h2>Buy {name}</h2>\n\
         <p>Confirm purchase for {price}? The listing will be marked sold.</p>\n\
         <form method=\"post\" action=\"/market/buy/{id}\">\
         <button class=\"btn btn-buy\" type=\"submit\">Confirm Buy</button></form>\n",
        name = escape_html(&product.name),
        price = format_price(product.price),
        id = product.id,
    )
}

fn render_rent_body(product: &Product, query: &str) -> String {
    let verb = product.mode.action_label();
    format!(
        "<h2>{verb} {name}</h2>\n\
         <form method=\"post\" action=\"/market/rent/{id}?{query}\">\n\
         <label>Days <input type=\"number\" name=\"days\" value=\"1\" min=\"1\"></label>\n\
         <button type=\"submit\">Send Request</button>\n\
         </form>\n\
         <p class=\"modal-note\">The seller arranges handover directly; nothing is reserved.</p>\n",
        name = escape_html(&product.name),
        id = product.id,
    )
}

fn render_edit_body(product: &Product) -> String {
    let rented_checked = if product.rented { " checked" } else { "" };
    format!(
        "<h2>Edit {name}</h2>\n\
         <form method=\"post\" action=\"/market/edit/{id}\">\n\
         <label>Price <input type=\"number\" name=\"price\" value=\"{price}\" min=\"0\" step=\"0.01\" required></label>\n\
         <label>Description <textarea name=\"description\">{description}</textarea></label>\n\
         <label>Rented out <input type=\"checkbox\" name=\"rented\" value=\"true\"{rented_checked}></label>\n\
         <label>Rented till <input type=\"text\" name=\"rented_till\" value=\"{rented_till}\"></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n",
        name = escape_html(&product.name),
        id = product.id,
        price = product.price,
        description = escape_html(&product.description),
        rented_till = escape_html(product.rented_till.as_deref().unwrap_or("")),
    )
}

fn render_message_body(product: &Product) -> String {
    format!(
        "<h2>Message {seller}</h2>\n\
         <form method=\"post\" action=\"/market/message\">\n\
         <input type=\"hidden\" name=\"receiver\" value=\"{seller}\">\n\
         <input type=\"hidden\" name=\"product_id\" value=\"{id}\">\n\
         <textarea name=\"content\" placeholder=\"Is this still available?\"></textarea>\n\
         <button type=\"submit\">Send</button>\n\
         </form>\n",
        seller = escape_html(&product.seller.name),
        id = product.id,
    )
}
