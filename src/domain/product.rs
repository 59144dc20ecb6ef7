use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::discount::Discount;
use crate::domain::sorting::{ProductColumn, SortDirection};

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Base price with two fractional digits.
    pub price: Decimal,
    /// Attached discounts in application order.
    #[serde(default)]
    pub discounts: Vec<Discount>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Product carrying the prices derived from its discounts. Never persisted.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnrichedProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Price after every attached discount, floored at zero.
    pub final_price: Decimal,
    /// `price - final_price`.
    pub savings: Decimal,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Base price with two fractional digits.
    pub price: Decimal,
}

impl NewProduct {
    /// Build a new product payload with the supplied details.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional description update.
    pub description: Option<Option<String>>,
    /// Optional price update.
    pub price: Option<Decimal>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: None,
            description: None,
            price: None,
            updated_at: now,
        }
    }

    /// Update the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the product description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    /// Update the product price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}

/// Query definition used to fetch the product batch for a listing.
///
/// There is no pagination here: listings are paginated after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListQuery {
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Storage ordering. `None` means insertion order.
    pub order: Option<(ProductColumn, SortDirection)>,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self {
            search: None,
            order: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Push an `ORDER BY` on a stored column down to storage.
    pub fn order_by(mut self, column: ProductColumn, direction: SortDirection) -> Self {
        self.order = Some((column, direction));
        self
    }
}
