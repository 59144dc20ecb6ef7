use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::repository::errors::RepositoryResult;
use rust_decimal::Decimal;

use crate::domain::discount::{
    Discount, DiscountListQuery, DiscountType, NewDiscount, UpdateDiscount,
};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::repository::mock::{
    MockDiscountReader, MockDiscountWriter, MockProductReader, MockProductWriter,
};
use crate::repository::{DiscountReader, DiscountWriter, ProductReader, ProductWriter};

pub(crate) fn datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub(crate) fn user_with_role(role: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user".to_string(),
        email: "user@example.com".to_string(),
        hub_id: 1,
        name: "User".to_string(),
        roles: vec![role.to_string()],
        exp: 0,
    }
}

pub(crate) fn user_without_roles() -> AuthenticatedUser {
    AuthenticatedUser {
        roles: Vec::new(),
        ..user_with_role("")
    }
}

pub(crate) fn sample_discount(
    id: i32,
    discount_type: DiscountType,
    value: Decimal,
    is_active: bool,
) -> Discount {
    Discount {
        id,
        title: format!("Discount {id}"),
        discount_type,
        value,
        is_active,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub(crate) fn sample_product(
    id: i32,
    name: &str,
    price: Decimal,
    discounts: Vec<Discount>,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: None,
        price,
        discounts,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub(crate) struct FakeRepo {
    pub product_reader: MockProductReader,
    pub product_writer: MockProductWriter,
    pub discount_reader: MockDiscountReader,
    pub discount_writer: MockDiscountWriter,
}

impl FakeRepo {
    pub(crate) fn new() -> Self {
        Self {
            product_reader: MockProductReader::new(),
            product_writer: MockProductWriter::new(),
            discount_reader: MockDiscountReader::new(),
            discount_writer: MockDiscountWriter::new(),
        }
    }
}

impl ProductReader for FakeRepo {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        self.product_reader.get_product_by_id(id)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        self.product_reader.list_products(query)
    }

    fn find_existing_product_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>> {
        self.product_reader.find_existing_product_ids(ids)
    }
}

impl ProductWriter for FakeRepo {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        self.product_writer.create_product(new_product)
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        self.product_writer.update_product(product_id, updates)
    }

    fn update_product_with_discounts(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
        discount_ids: &[i32],
    ) -> RepositoryResult<Product> {
        self.product_writer
            .update_product_with_discounts(product_id, updates, discount_ids)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        self.product_writer.delete_product(product_id)
    }

    fn replace_product_discounts(
        &self,
        product_id: i32,
        discount_ids: &[i32],
    ) -> RepositoryResult<()> {
        self.product_writer
            .replace_product_discounts(product_id, discount_ids)
    }
}

impl DiscountReader for FakeRepo {
    fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<Discount>> {
        self.discount_reader.get_discount_by_id(id)
    }

    fn list_discounts(
        &self,
        query: DiscountListQuery,
    ) -> RepositoryResult<(usize, Vec<Discount>)> {
        self.discount_reader.list_discounts(query)
    }

    fn list_discounts_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Discount>> {
        self.discount_reader.list_discounts_by_ids(ids)
    }

    fn list_product_discounts(
        &self,
        product_id: i32,
        active_only: bool,
    ) -> RepositoryResult<Vec<Discount>> {
        self.discount_reader
            .list_product_discounts(product_id, active_only)
    }

    fn list_discount_product_ids(&self, discount_id: i32) -> RepositoryResult<Vec<i32>> {
        self.discount_reader.list_discount_product_ids(discount_id)
    }

    fn list_product_ids_for_discounts(
        &self,
        discount_ids: &[i32],
    ) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
        self.discount_reader
            .list_product_ids_for_discounts(discount_ids)
    }
}

impl DiscountWriter for FakeRepo {
    fn create_discount(&self, new_discount: &NewDiscount) -> RepositoryResult<Discount> {
        self.discount_writer.create_discount(new_discount)
    }

    fn update_discount(
        &self,
        discount_id: i32,
        updates: &UpdateDiscount,
    ) -> RepositoryResult<Discount> {
        self.discount_writer.update_discount(discount_id, updates)
    }

    fn update_discount_with_products(
        &self,
        discount_id: i32,
        updates: &UpdateDiscount,
        product_ids: &[i32],
    ) -> RepositoryResult<Discount> {
        self.discount_writer
            .update_discount_with_products(discount_id, updates, product_ids)
    }

    fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()> {
        self.discount_writer.delete_discount(discount_id)
    }

    fn sync_discount_products(
        &self,
        discount_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<()> {
        self.discount_writer
            .sync_discount_products(discount_id, product_ids)
    }
}
