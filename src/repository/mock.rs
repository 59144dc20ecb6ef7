use std::collections::HashMap;

use mockall::mock;

use super::{DiscountReader, DiscountWriter, ProductReader, ProductWriter};
use crate::domain::{
    discount::{Discount, DiscountListQuery, NewDiscount, UpdateDiscount},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
        fn find_existing_product_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn update_product_with_discounts(&self, product_id: i32, updates: &UpdateProduct, discount_ids: &[i32]) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
        fn replace_product_discounts(&self, product_id: i32, discount_ids: &[i32]) -> RepositoryResult<()>;
    }
}

mock! {
    pub DiscountReader {}

    impl DiscountReader for DiscountReader {
        fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<Discount>>;
        fn list_discounts(&self, query: DiscountListQuery) -> RepositoryResult<(usize, Vec<Discount>)>;
        fn list_discounts_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Discount>>;
        fn list_product_discounts(&self, product_id: i32, active_only: bool) -> RepositoryResult<Vec<Discount>>;
        fn list_discount_product_ids(&self, discount_id: i32) -> RepositoryResult<Vec<i32>>;
        fn list_product_ids_for_discounts(&self, discount_ids: &[i32]) -> RepositoryResult<HashMap<i32, Vec<i32>>>;
    }
}

mock! {
    pub DiscountWriter {}

    impl DiscountWriter for DiscountWriter {
        fn create_discount(&self, new_discount: &NewDiscount) -> RepositoryResult<Discount>;
        fn update_discount(&self, discount_id: i32, updates: &UpdateDiscount) -> RepositoryResult<Discount>;
        fn update_discount_with_products(&self, discount_id: i32, updates: &UpdateDiscount, product_ids: &[i32]) -> RepositoryResult<Discount>;
        fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()>;
        fn sync_discount_products(&self, discount_id: i32, product_ids: &[i32]) -> RepositoryResult<()>;
    }
}
