use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::sorting::SortDirection;

/// How a discount reduces the running price.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Removes `value` percent of the running price.
    Percentage,
    /// Removes a fixed amount from the running price.
    Fixed,
    /// A stored type this build does not know how to apply.
    Unknown,
}

impl DiscountType {
    /// Wire and storage representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
            DiscountType::Unknown => "unknown",
        }
    }

    /// Parse a user supplied type, rejecting anything outside the known set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percentage" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

impl From<&str> for DiscountType {
    fn from(value: &str) -> Self {
        DiscountType::parse(value).unwrap_or(DiscountType::Unknown)
    }
}

impl From<DiscountType> for &'static str {
    fn from(value: DiscountType) -> Self {
        value.as_str()
    }
}

/// Domain representation of a discount that can be attached to products.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Discount {
    /// Unique identifier of the discount.
    pub id: i32,
    /// Human-readable title.
    pub title: String,
    /// Kind of reduction applied by the discount.
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    /// Percent for percentage discounts, amount for fixed ones. Two fractional digits.
    pub value: Decimal,
    /// Whether the discount is currently offered.
    pub is_active: bool,
    /// Timestamp for when the discount record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the discount record.
    pub updated_at: NaiveDateTime,
}

/// Discount together with the products it is attached to.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DiscountDetails {
    #[serde(flatten)]
    pub discount: Discount,
    /// Identifiers of the products carrying this discount.
    pub product_ids: Vec<i32>,
}

/// Payload required to insert a new discount.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscount {
    pub title: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub is_active: bool,
}

impl NewDiscount {
    /// Build an active discount payload.
    pub fn new(title: impl Into<String>, discount_type: DiscountType, value: Decimal) -> Self {
        Self {
            title: title.into(),
            discount_type,
            value,
            is_active: true,
        }
    }

    /// Override the default active flag.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Patch data applied when updating an existing discount.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDiscount {
    /// Optional title update.
    pub title: Option<String>,
    /// Optional type update.
    pub discount_type: Option<DiscountType>,
    /// Optional value update.
    pub value: Option<Decimal>,
    /// Optional activation toggle.
    pub is_active: Option<bool>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateDiscount {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateDiscount {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            title: None,
            discount_type: None,
            value: None,
            is_active: None,
            updated_at: now,
        }
    }

    /// Update the discount title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Update the discount type.
    pub fn discount_type(mut self, discount_type: DiscountType) -> Self {
        self.discount_type = Some(discount_type);
        self
    }

    /// Update the discount value.
    pub fn value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Activate or deactivate the discount.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Stored columns a discount listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountColumn {
    Id,
    Title,
    DiscountType,
    Value,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl DiscountColumn {
    /// Resolve a request field name, accepting `type` as an alias of `discount_type`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(DiscountColumn::Id),
            "title" => Some(DiscountColumn::Title),
            "type" | "discount_type" => Some(DiscountColumn::DiscountType),
            "value" => Some(DiscountColumn::Value),
            "is_active" => Some(DiscountColumn::IsActive),
            "created_at" => Some(DiscountColumn::CreatedAt),
            "updated_at" => Some(DiscountColumn::UpdatedAt),
            _ => None,
        }
    }
}

/// Query definition used to list discounts.
#[derive(Debug, Clone)]
pub struct DiscountListQuery {
    /// Optional substring matched against the title.
    pub search: Option<String>,
    /// Optional exact type filter.
    pub discount_type: Option<DiscountType>,
    /// Restrict the results to active discounts.
    pub active_only: bool,
    /// Storage ordering.
    pub order: (DiscountColumn, SortDirection),
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl Default for DiscountListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountListQuery {
    /// Construct a query over every discount, newest first.
    pub fn new() -> Self {
        Self {
            search: None,
            discount_type: None,
            active_only: false,
            order: (DiscountColumn::CreatedAt, SortDirection::Desc),
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the title.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by discount type.
    pub fn discount_type(mut self, discount_type: DiscountType) -> Self {
        self.discount_type = Some(discount_type);
        self
    }

    /// Only return active discounts.
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Order the results by the given column.
    pub fn order_by(mut self, column: DiscountColumn, direction: SortDirection) -> Self {
        self.order = (column, direction);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stored_type_is_kept_as_unknown() {
        assert_eq!(DiscountType::from("bogo"), DiscountType::Unknown);
        assert_eq!(DiscountType::from("Fixed"), DiscountType::Fixed);
        assert_eq!(DiscountType::parse("bogo"), None);
    }

    #[test]
    fn type_alias_resolves_to_discount_type_column() {
        assert_eq!(
            DiscountColumn::from_name("type"),
            Some(DiscountColumn::DiscountType)
        );
        assert_eq!(DiscountColumn::from_name("products"), None);
    }
}
