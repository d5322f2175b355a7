use gallery_types::models::{Category, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// User-entered filter state for the market grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub category: CategoryFilter,
    pub search: String,
}

impl Filters {
    /// Parse filter state from query parameters. "all", an absent value
    /// and an unknown label all mean no category filter.
    pub fn from_params(category: Option<&str>, search: Option<&str>) -> Filters {
        let category = match category {
            None | Some("all") | Some("") => CategoryFilter::All,
            Some(label) => match Category::ALL.into_iter().find(|c| c.label() == label) {
                Some(c) => CategoryFilter::Only(c),
                None => CategoryFilter::All,
            },
        };
        Filters {
            category,
            search: search.unwrap_or_default().to_string(),
        }
    }

    /// A product passes iff the category matches (or no category filter
    /// is set) and its name contains the search text case-insensitively
    /// (or the search is empty). No other field is searched.
    pub fn passes(&self, product: &Product) -> bool {
        if let CategoryFilter::Only(c) = self.category {
            if product.category != c {
                return false;
            }
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Filter a catalog snapshot, preserving its order.
    pub fn apply<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|p| self.passes(p)).collect()
    }

    pub fn category_param(&self) -> &'static str {
        match self.category {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c.label(),
        }
    }

    /// Re-encode the filter state as query parameters, so links and
    /// form targets keep the current view.
    pub fn query_string(&self) -> String {
        let mut q = format!("category={}", percent_encode(self.category_param()));
        if !self.search.is_empty() {
            q.push_str("&search=");
            q.push_str(&percent_encode(&self.search));
        }
        q
    }
}

/// Minimal percent-encoding for query component values.
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gallery_types::models::{Mode, Seller};
    use uuid::Uuid;

    fn product(name: &str, category: Category) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: 100.0,
            description: String::new(),
            image: String::new(),
            category,
            mode: Mode::Buy,
            seller: Seller {
                id: Uuid::new_v4(),
                name: "Diya".into(),
                hostel: "Block B".into(),
                room: "204".into(),
            },
            sold: false,
            rented: false,
            rented_till: None,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Electric Kettle", Category::Electronics),
            product("Denim Jacket", Category::Clothing),
            product("Maggie Pack", Category::Food),
            product("kettle descaler", Category::Other),
        ]
    }

    #[test]
    fn no_filters_pass_everything() {
        let catalog = catalog();
        let filters = Filters::default();
        assert_eq!(filters.apply(&catalog).len(), catalog.len());
    }

    #[test]
    fn category_filter_is_exact() {
        let catalog = catalog();
        let filters = Filters::from_params(Some("Electronics"), None);
        let names: Vec<&str> = filters.apply(&catalog).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Electric Kettle"]);
    }

    #[test]
    fn search_is_case_insensitive_substring_on_name_only() {
        let mut catalog = catalog();
        // search text must not match against descriptions
        catalog[1].description = "goes well with a kettle".into();
        let filters = Filters::from_params(None, Some("KETTLE"));
        let names: Vec<&str> = filters.apply(&catalog).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Electric Kettle", "kettle descaler"]);
    }

    #[test]
    fn category_and_search_combine_conjunctively() {
        let catalog = catalog();
        let filters = Filters::from_params(Some("Other"), Some("kettle"));
        let names: Vec<&str> = filters.apply(&catalog).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["kettle descaler"]);
    }

    #[test]
    fn filter_result_matches_set_definition() {
        // exactly {p : (C == all or p.category == C) and (S == "" or S ⊑ name)}
        let catalog = catalog();
        for cat_param in ["all", "Electronics", "Food"] {
            for search in ["", "kettle", "zzz"] {
                let filters = Filters::from_params(Some(cat_param), Some(search));
                let expected: Vec<&Product> = catalog
                    .iter()
                    .filter(|p| {
                        (cat_param == "all" || p.category.label() == cat_param)
                            && (search.is_empty()
                                || p.name.to_lowercase().contains(&search.to_lowercase()))
                    })
                    .collect();
                assert_eq!(filters.apply(&catalog), expected);
            }
        }
    }

    #[test]
    fn unknown_category_param_means_all() {
        assert_eq!(
            Filters::from_params(Some("Furniture"), None).category,
            CategoryFilter::All
        );
    }

    #[test]
    fn query_string_round_trips_through_from_params() {
        let filters = Filters {
            category: CategoryFilter::Only(Category::PersonalCare),
            search: "dove lotion".into(),
        };
        let q = filters.query_string();
        assert_eq!(q, "category=Personal%20Care&search=dove%20lotion");
    }
}
