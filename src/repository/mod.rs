use std::collections::HashMap;

use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    discount::{Discount, DiscountListQuery, NewDiscount, UpdateDiscount},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};

pub mod discount;
pub mod product;

#[cfg(test)]
pub mod mock;

/// Keeps `IN (...)` lists below SQLite's bind parameter limit.
const ID_CHUNK_SIZE: usize = 500;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
///
/// Products are always returned with their discounts attached in application order.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    /// Subset of `ids` that refer to existing products.
    fn find_existing_product_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    /// Apply `updates` and replace the product's discounts in one transaction.
    ///
    /// Fails with `NotFound`, leaving the row untouched, when any discount id is unknown.
    fn update_product_with_discounts(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
        discount_ids: &[i32],
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    /// Replace the product's discounts, applying them in the order given.
    fn replace_product_discounts(
        &self,
        product_id: i32,
        discount_ids: &[i32],
    ) -> RepositoryResult<()>;
}

/// Read-only operations over discount records.
pub trait DiscountReader {
    fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<Discount>>;
    fn list_discounts(
        &self,
        query: DiscountListQuery,
    ) -> RepositoryResult<(usize, Vec<Discount>)>;
    fn list_discounts_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Discount>>;
    /// Discounts attached to a product, in application order.
    fn list_product_discounts(
        &self,
        product_id: i32,
        active_only: bool,
    ) -> RepositoryResult<Vec<Discount>>;
    fn list_discount_product_ids(&self, discount_id: i32) -> RepositoryResult<Vec<i32>>;
    /// Linked product ids keyed by discount id. Discounts without links are absent.
    fn list_product_ids_for_discounts(
        &self,
        discount_ids: &[i32],
    ) -> RepositoryResult<HashMap<i32, Vec<i32>>>;
}

/// Write operations over discount records.
pub trait DiscountWriter {
    fn create_discount(&self, new_discount: &NewDiscount) -> RepositoryResult<Discount>;
    fn update_discount(
        &self,
        discount_id: i32,
        updates: &UpdateDiscount,
    ) -> RepositoryResult<Discount>;
    /// Apply `updates` and sync the linked products in one transaction.
    fn update_discount_with_products(
        &self,
        discount_id: i32,
        updates: &UpdateDiscount,
        product_ids: &[i32],
    ) -> RepositoryResult<Discount>;
    fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()>;
    /// Attach the discount to exactly `product_ids`.
    ///
    /// Existing links keep their position; new links go after the product's last discount.
    fn sync_discount_products(
        &self,
        discount_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<()>;
}
