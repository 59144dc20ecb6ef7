use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::discount::{
    Discount as DomainDiscount, DiscountType, NewDiscount as DomainNewDiscount,
    UpdateDiscount as DomainUpdateDiscount,
};
use crate::models::{decimal_from_hundredths, hundredths_from_decimal};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::discounts)]
pub struct Discount {
    pub id: i32,
    pub title: String,
    pub discount_type: String,
    pub value_hundredths: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::discounts)]
pub struct NewDiscount<'a> {
    pub title: &'a str,
    pub discount_type: &'a str,
    pub value_hundredths: i64,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::discounts)]
pub struct UpdateDiscount<'a> {
    pub title: Option<&'a str>,
    pub discount_type: Option<&'a str>,
    pub value_hundredths: Option<i64>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Discount> for DomainDiscount {
    fn from(value: Discount) -> Self {
        Self {
            id: value.id,
            title: value.title,
            discount_type: DiscountType::from(value.discount_type.as_str()),
            value: decimal_from_hundredths(value.value_hundredths),
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewDiscount> for NewDiscount<'a> {
    fn from(value: &'a DomainNewDiscount) -> Self {
        Self {
            title: value.title.as_str(),
            discount_type: value.discount_type.as_str(),
            value_hundredths: hundredths_from_decimal(value.value),
            is_active: value.is_active,
        }
    }
}

impl<'a> From<&'a DomainUpdateDiscount> for UpdateDiscount<'a> {
    fn from(value: &'a DomainUpdateDiscount) -> Self {
        Self {
            title: value.title.as_deref(),
            discount_type: value.discount_type.map(|kind| kind.as_str()),
            value_hundredths: value.value.map(hundredths_from_decimal),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
