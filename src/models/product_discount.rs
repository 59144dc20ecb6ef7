use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Link between a product and a discount. `position` fixes the application order.
#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::product_discounts,
    belongs_to(super::product::Product, foreign_key = product_id),
    belongs_to(super::discount::Discount, foreign_key = discount_id)
)]
pub struct ProductDiscount {
    pub id: i32,
    pub product_id: i32,
    pub discount_id: i32,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_discounts)]
pub struct NewProductDiscount {
    pub product_id: i32,
    pub discount_id: i32,
    pub position: i32,
}

impl NewProductDiscount {
    pub fn new(product_id: i32, discount_id: i32, position: i32) -> Self {
        Self {
            product_id,
            discount_id,
            position,
        }
    }
}
