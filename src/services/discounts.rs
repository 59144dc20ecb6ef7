use std::collections::HashSet;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Deserialize;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::{
    discount::{Discount, DiscountColumn, DiscountDetails, DiscountListQuery, DiscountType},
    pagination::{Page, PageSpec, PaginationMeta},
    sorting::SortDirection,
};
use crate::forms::discounts::{AddDiscountForm, EditDiscountForm, validate_discount_value};
use crate::repository::{DiscountReader, DiscountWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the discount listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DiscountsQuery {
    /// Substring matched against the title.
    pub search: Option<String>,
    /// Exact type filter.
    #[serde(rename = "type")]
    pub discount_type: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[validate(range(min = 1))]
    pub per_page: Option<usize>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
}

/// Lists discounts. Ordering and pagination both happen in storage.
pub fn list_discounts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DiscountsQuery,
) -> ServiceResult<Page<DiscountDetails>>
where
    R: DiscountReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    query
        .validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let DiscountsQuery {
        search,
        discount_type,
        sort_by,
        sort_order,
        per_page,
        page,
    } = query;

    let column = match sort_by.as_deref() {
        Some(name) => DiscountColumn::from_name(name).unwrap_or_else(|| {
            log::debug!("Unknown discount sort field `{name}`, using created_at");
            DiscountColumn::CreatedAt
        }),
        None => DiscountColumn::CreatedAt,
    };
    let direction = match sort_order.as_deref() {
        Some(raw) => SortDirection::parse(Some(raw)),
        None => SortDirection::Desc,
    };

    let spec = PageSpec::from_request(per_page, page);
    let mut list_query = DiscountListQuery::new()
        .order_by(column, direction)
        .paginate(spec.page, spec.per_page);

    if let Some(term) = search.as_deref().map(str::trim).filter(|term| !term.is_empty()) {
        list_query = list_query.search(term);
    }

    if let Some(raw) = discount_type.as_deref() {
        let parsed = DiscountType::parse(raw)
            .ok_or_else(|| ServiceError::Form(format!("unknown discount type `{raw}`")))?;
        list_query = list_query.discount_type(parsed);
    }

    let (total, discounts) = repo.list_discounts(list_query).map_err(ServiceError::from)?;

    Ok(Page::new(
        with_product_id_lists(repo, discounts)?,
        PaginationMeta::new(total, spec),
    ))
}

/// Every active discount, newest first.
pub fn list_active_discounts<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<DiscountDetails>>
where
    R: DiscountReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, discounts) = repo
        .list_discounts(DiscountListQuery::new().active_only())
        .map_err(ServiceError::from)?;

    with_product_id_lists(repo, discounts)
}

/// Fetches a discount with the products it is attached to.
pub fn get_discount<R>(
    repo: &R,
    user: &AuthenticatedUser,
    discount_id: i32,
) -> ServiceResult<DiscountDetails>
where
    R: DiscountReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let discount = match repo.get_discount_by_id(discount_id) {
        Ok(Some(discount)) => discount,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(err) => return Err(ServiceError::from(err)),
    };

    with_product_ids(repo, discount)
}

/// Creates a discount and attaches it to the submitted products.
pub fn create_discount<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddDiscountForm,
) -> ServiceResult<DiscountDetails>
where
    R: DiscountReader + DiscountWriter + ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_new_discount()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    ensure_products_exist(repo, &payload.product_ids)?;

    let created = repo
        .create_discount(&payload.discount)
        .map_err(ServiceError::from)?;

    if payload.product_ids.is_empty() {
        return Ok(DiscountDetails {
            discount: created,
            product_ids: Vec::new(),
        });
    }

    if let Err(err) = repo.sync_discount_products(created.id, &payload.product_ids) {
        log::error!(
            "Failed to attach discount {} to products: {err}",
            created.id
        );
        if let Err(delete_err) = repo.delete_discount(created.id) {
            log::error!(
                "Failed to roll back discount {} after product error: {delete_err}",
                created.id
            );
        }
        return Err(ServiceError::from(err));
    }

    with_product_ids(repo, created)
}

/// Updates a discount. Submitted products replace the attached set.
pub fn update_discount<R>(
    repo: &R,
    user: &AuthenticatedUser,
    discount_id: i32,
    form: EditDiscountForm,
) -> ServiceResult<DiscountDetails>
where
    R: DiscountReader + DiscountWriter + ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_discount()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    // Type and value are range-checked together against what is stored.
    if payload.updates.discount_type.is_some() || payload.updates.value.is_some() {
        let current = match repo.get_discount_by_id(discount_id) {
            Ok(Some(discount)) => discount,
            Ok(None) => return Err(ServiceError::NotFound),
            Err(err) => return Err(ServiceError::from(err)),
        };

        validate_discount_value(
            payload.updates.discount_type.unwrap_or(current.discount_type),
            payload.updates.value.unwrap_or(current.value),
        )
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    }

    if let Some(product_ids) = payload.product_ids.as_deref() {
        ensure_products_exist(repo, product_ids)?;
    }

    let updated = match payload.product_ids.as_deref() {
        Some(product_ids) => {
            repo.update_discount_with_products(discount_id, &payload.updates, product_ids)
        }
        None => repo.update_discount(discount_id, &payload.updates),
    }
    .map_err(ServiceError::from)?;

    with_product_ids(repo, updated)
}

/// Deletes a discount and detaches it from every product.
pub fn delete_discount<R>(
    repo: &R,
    user: &AuthenticatedUser,
    discount_id: i32,
) -> ServiceResult<()>
where
    R: DiscountWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_discount(discount_id)
        .map_err(ServiceError::from)
}

fn with_product_ids<R>(repo: &R, discount: Discount) -> ServiceResult<DiscountDetails>
where
    R: DiscountReader + ?Sized,
{
    let product_ids = repo
        .list_discount_product_ids(discount.id)
        .map_err(ServiceError::from)?;

    Ok(DiscountDetails {
        discount,
        product_ids,
    })
}

fn with_product_id_lists<R>(
    repo: &R,
    discounts: Vec<Discount>,
) -> ServiceResult<Vec<DiscountDetails>>
where
    R: DiscountReader + ?Sized,
{
    if discounts.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = discounts.iter().map(|discount| discount.id).collect();
    let mut linked = repo
        .list_product_ids_for_discounts(&ids)
        .map_err(ServiceError::from)?;

    Ok(discounts
        .into_iter()
        .map(|discount| DiscountDetails {
            product_ids: linked.remove(&discount.id).unwrap_or_default(),
            discount,
        })
        .collect())
}

fn ensure_products_exist<R>(repo: &R, product_ids: &[i32]) -> ServiceResult<()>
where
    R: ProductReader + ?Sized,
{
    if product_ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<i32> = repo
        .find_existing_product_ids(product_ids)
        .map_err(ServiceError::from)?
        .into_iter()
        .collect();

    let missing: Vec<String> = product_ids
        .iter()
        .filter(|id| !found.contains(*id))
        .map(ToString::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Form(format!(
            "unknown product ids: {}",
            missing.join(", ")
        )))
    }
}
