//! Sort field classification and the two-phase product sort.
//!
//! Stored columns are ordered by the database before the batch is fetched.
//! Computed fields only exist after enrichment, so they are ordered in memory
//! over the whole enriched batch, before pagination.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::domain::product::EnrichedProduct;

/// Requested ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` in any letter case. Anything else falls back to ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(value) if value.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(value) => {
                log::debug!("Unknown sort direction `{value}`, using ascending");
                SortDirection::Asc
            }
            None => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Columns stored on the product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductColumn {
    Id,
    Name,
    Description,
    Price,
    CreatedAt,
    UpdatedAt,
}

/// Fields derived from business rules at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedField {
    FinalPrice,
    Savings,
    /// Alias of the stored `price` column.
    OriginalPrice,
}

impl ComputedField {
    /// Stored column backing this field, if storage can sort by it.
    pub fn storage_column(self) -> Option<ProductColumn> {
        match self {
            ComputedField::OriginalPrice => Some(ProductColumn::Price),
            ComputedField::FinalPrice | ComputedField::Savings => None,
        }
    }

    /// Typed accessor reading this field from an enriched product.
    pub fn accessor(self) -> fn(&EnrichedProduct) -> Decimal {
        match self {
            ComputedField::FinalPrice => final_price_of,
            ComputedField::Savings => savings_of,
            ComputedField::OriginalPrice => original_price_of,
        }
    }

    /// Read the field from an enriched product.
    pub fn value(self, product: &EnrichedProduct) -> Decimal {
        (self.accessor())(product)
    }
}

fn final_price_of(product: &EnrichedProduct) -> Decimal {
    product.final_price
}

fn savings_of(product: &EnrichedProduct) -> Decimal {
    product.savings
}

fn original_price_of(product: &EnrichedProduct) -> Decimal {
    product.product.price
}

/// Classification of a requested sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    Native(ProductColumn),
    Computed(ComputedField),
    Unknown,
}

/// Sortable product fields by request name.
pub const PRODUCT_SORT_FIELDS: &[(&str, FieldClass)] = &[
    ("id", FieldClass::Native(ProductColumn::Id)),
    ("name", FieldClass::Native(ProductColumn::Name)),
    ("description", FieldClass::Native(ProductColumn::Description)),
    ("price", FieldClass::Native(ProductColumn::Price)),
    ("created_at", FieldClass::Native(ProductColumn::CreatedAt)),
    ("updated_at", FieldClass::Native(ProductColumn::UpdatedAt)),
    ("final_price", FieldClass::Computed(ComputedField::FinalPrice)),
    ("savings", FieldClass::Computed(ComputedField::Savings)),
    (
        "original_price",
        FieldClass::Computed(ComputedField::OriginalPrice),
    ),
];

/// A resolved sort key: either a stored column or a computed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Native(ProductColumn),
    Computed(ComputedField),
}

/// Validated sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Decide where the ordering happens.
    pub fn plan(&self) -> SortPlan {
        match self.field {
            SortField::Native(column) => SortPlan::PushDown {
                column,
                direction: self.direction,
            },
            SortField::Computed(field) => match field.storage_column() {
                Some(column) => SortPlan::PushDown {
                    column,
                    direction: self.direction,
                },
                None => SortPlan::InMemory {
                    field,
                    direction: self.direction,
                },
            },
        }
    }
}

/// Where a listing gets ordered, decided once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPlan {
    /// `ORDER BY column direction` in the storage query.
    PushDown {
        column: ProductColumn,
        direction: SortDirection,
    },
    /// Stable sort of the enriched batch.
    InMemory {
        field: ComputedField,
        direction: SortDirection,
    },
}

impl SortPlan {
    /// Storage ordering to request before fetching, if any.
    pub fn storage_order(&self) -> Option<(ProductColumn, SortDirection)> {
        match *self {
            SortPlan::PushDown { column, direction } => Some((column, direction)),
            SortPlan::InMemory { .. } => None,
        }
    }

    /// Order the enriched batch. A no-op when storage already ordered it.
    pub fn apply(&self, products: Vec<EnrichedProduct>) -> Vec<EnrichedProduct> {
        match *self {
            SortPlan::PushDown { .. } => products,
            SortPlan::InMemory { field, direction } => sort_in_memory(products, field, direction),
        }
    }
}

/// Stable sort by a computed field. Ties keep their incoming order.
pub fn sort_in_memory(
    mut products: Vec<EnrichedProduct>,
    field: ComputedField,
    direction: SortDirection,
) -> Vec<EnrichedProduct> {
    let key = field.accessor();
    products.sort_by(|a, b| direction.apply(key(a).cmp(&key(b))));
    products
}

/// Maps raw request fields onto sortable product fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldClassifier {
    fields: &'static [(&'static str, FieldClass)],
    default_column: ProductColumn,
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new(PRODUCT_SORT_FIELDS, ProductColumn::Name)
    }
}

impl FieldClassifier {
    pub fn new(
        fields: &'static [(&'static str, FieldClass)],
        default_column: ProductColumn,
    ) -> Self {
        Self {
            fields,
            default_column,
        }
    }

    /// Column used when the requested field is missing or unknown.
    pub fn default_column(&self) -> ProductColumn {
        self.default_column
    }

    /// Look up a field name in the allow-list.
    pub fn classify(&self, field: &str) -> FieldClass {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, class)| *class)
            .unwrap_or(FieldClass::Unknown)
    }

    /// Turn raw request values into a sort spec, never failing.
    pub fn resolve(&self, field: Option<&str>, direction: Option<&str>) -> SortSpec {
        let field = match field.map(|name| (name, self.classify(name))) {
            Some((_, FieldClass::Native(column))) => SortField::Native(column),
            Some((_, FieldClass::Computed(computed))) => SortField::Computed(computed),
            Some((name, FieldClass::Unknown)) => {
                log::debug!(
                    "Unknown sort field `{name}`, using {:?}",
                    self.default_column
                );
                SortField::Native(self.default_column)
            }
            None => SortField::Native(self.default_column),
        };

        SortSpec {
            field,
            direction: SortDirection::parse(direction),
        }
    }
}
