use std::collections::HashSet;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Deserialize;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::{
    discount::Discount,
    pagination::{Page, PageSpec, paginate},
    pricing::{enrich, enrich_product},
    product::{EnrichedProduct, ProductListQuery},
    sorting::FieldClassifier,
};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::{DiscountReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductsQuery {
    /// Substring matched against the name or description.
    pub search: Option<String>,
    /// Stored column or computed field to order by.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    #[validate(range(min = 1))]
    pub per_page: Option<usize>,
    /// Page requested by the client (1-based).
    #[validate(range(min = 1))]
    pub page: Option<usize>,
}

/// Lists products with their derived prices.
///
/// Stored columns are ordered by the database, computed fields are ordered
/// over the whole enriched batch. Pagination always runs last.
pub fn list_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<Page<EnrichedProduct>>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    query
        .validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let ProductsQuery {
        search,
        sort_by,
        sort_order,
        per_page,
        page,
    } = query;

    let plan = FieldClassifier::default()
        .resolve(sort_by.as_deref(), sort_order.as_deref())
        .plan();

    let mut list_query = ProductListQuery::new();

    if let Some(term) = search.as_deref().map(str::trim).filter(|term| !term.is_empty()) {
        list_query = list_query.search(term);
    }

    if let Some((column, direction)) = plan.storage_order() {
        list_query = list_query.order_by(column, direction);
    }

    let products = repo.list_products(list_query).map_err(ServiceError::from)?;
    let ordered = plan.apply(enrich(products));

    Ok(paginate(ordered, PageSpec::from_request(per_page, page)))
}

/// Fetches one product with its derived prices.
pub fn get_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<EnrichedProduct>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_enriched(repo, product_id)
}

/// Creates a product and attaches the submitted discounts in order.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<EnrichedProduct>
where
    R: ProductReader + ProductWriter + DiscountReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    ensure_discounts_exist(repo, &payload.discount_ids)?;

    let created = repo
        .create_product(&payload.product)
        .map_err(ServiceError::from)?;

    if payload.discount_ids.is_empty() {
        return Ok(enrich_product(created));
    }

    if let Err(err) = repo.replace_product_discounts(created.id, &payload.discount_ids) {
        log::error!(
            "Failed to attach discounts to product {}: {err}",
            created.id
        );
        if let Err(delete_err) = repo.delete_product(created.id) {
            log::error!(
                "Failed to roll back product {} after discount error: {delete_err}",
                created.id
            );
        }
        return Err(ServiceError::from(err));
    }

    load_enriched(repo, created.id)
}

/// Updates a product. Submitted discounts replace the attached ones.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<EnrichedProduct>
where
    R: ProductReader + ProductWriter + DiscountReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(discount_ids) = payload.discount_ids.as_deref() {
        ensure_discounts_exist(repo, discount_ids)?;
    }

    let updated = match payload.discount_ids.as_deref() {
        Some(discount_ids) => {
            repo.update_product_with_discounts(product_id, &payload.updates, discount_ids)
        }
        None => repo.update_product(product_id, &payload.updates),
    }
    .map_err(ServiceError::from)?;

    Ok(enrich_product(updated))
}

/// Deletes a product together with its discount links.
pub fn delete_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_product(product_id).map_err(ServiceError::from)
}

/// Active discounts attached to a product, in application order.
pub fn list_product_discounts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Vec<Discount>>
where
    R: ProductReader + DiscountReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let existing = repo
        .find_existing_product_ids(&[product_id])
        .map_err(ServiceError::from)?;
    if existing.is_empty() {
        return Err(ServiceError::NotFound);
    }

    repo.list_product_discounts(product_id, true)
        .map_err(ServiceError::from)
}

fn load_enriched<R>(repo: &R, product_id: i32) -> ServiceResult<EnrichedProduct>
where
    R: ProductReader + ?Sized,
{
    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(enrich_product(product)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(err) => Err(ServiceError::from(err)),
    }
}

fn ensure_discounts_exist<R>(repo: &R, discount_ids: &[i32]) -> ServiceResult<()>
where
    R: DiscountReader + ?Sized,
{
    if discount_ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<i32> = repo
        .list_discounts_by_ids(discount_ids)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|discount| discount.id)
        .collect();

    let missing: Vec<String> = discount_ids
        .iter()
        .filter(|id| !found.contains(*id))
        .map(ToString::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Form(format!(
            "unknown discount ids: {}",
            missing.join(", ")
        )))
    }
}
