use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::discount::Discount as DomainDiscount,
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    domain::sorting::{ProductColumn, SortDirection},
    models::discount::Discount as DbDiscount,
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    models::product_discount::NewProductDiscount,
    repository::{DieselRepository, ID_CHUNK_SIZE, ProductReader, ProductWriter},
    schema::{discounts, product_discounts, products},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        if let Some(db_product) = product {
            let mut domain: DomainProduct = db_product.into();
            let mut discounts = load_discounts_for_products(&mut conn, &[domain.id])?;
            domain.discounts = discounts.remove(&domain.id).unwrap_or_default();
            Ok(Some(domain))
        } else {
            Ok(None)
        }
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        items = match query.order {
            Some((column, direction)) => {
                order_by_column(items, column, direction).then_order_by(products::id.asc())
            }
            None => items.order(products::id.asc()),
        };

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut discount_map = load_discounts_for_products(&mut conn, &product_ids)?;

        let mut domain_products = Vec::with_capacity(db_products.len());
        for db_product in db_products {
            let mut domain: DomainProduct = db_product.into();
            domain.discounts = discount_map.remove(&domain.id).unwrap_or_default();
            domain_products.push(domain);
        }

        Ok(domain_products)
    }

    fn find_existing_product_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<i32>> {
        let mut conn = self.conn()?;

        let mut existing = Vec::new();
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let found = products::table
                .filter(products::id.eq_any(chunk))
                .select(products::id)
                .load::<i32>(&mut conn)?;
            existing.extend(found);
        }

        Ok(existing)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let target = products::table.filter(products::id.eq(product_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        let mut domain: DomainProduct = updated.into();
        let mut discounts = load_discounts_for_products(&mut conn, &[domain.id])?;
        domain.discounts = discounts.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(
                product_discounts::table.filter(product_discounts::product_id.eq(product_id)),
            )
            .execute(conn)?;

            diesel::delete(products::table.filter(products::id.eq(product_id))).execute(conn)
        })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn update_product_with_discounts(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
        discount_ids: &[i32],
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            write_product_discounts(conn, product_id, discount_ids)?;

            Ok(updated)
        })?;

        let mut domain: DomainProduct = updated.into();
        let mut discounts = load_discounts_for_products(&mut conn, &[domain.id])?;
        domain.discounts = discounts.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn replace_product_discounts(
        &self,
        product_id: i32,
        discount_ids: &[i32],
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let exists = products::table
                .filter(products::id.eq(product_id))
                .count()
                .get_result::<i64>(conn)?;
            if exists == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            write_product_discounts(conn, product_id, discount_ids)
        })
        .map_err(Into::into)
    }
}

/// Rewrite the product's links at positions `0..n`. Unknown discount ids abort with `NotFound`.
fn write_product_discounts(
    conn: &mut SqliteConnection,
    product_id: i32,
    discount_ids: &[i32],
) -> QueryResult<()> {
    let mut seen = HashSet::new();
    let ordered: Vec<i32> = discount_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut found = 0;
    for chunk in ordered.chunks(ID_CHUNK_SIZE) {
        found += discounts::table
            .filter(discounts::id.eq_any(chunk))
            .count()
            .get_result::<i64>(conn)?;
    }
    if found != ordered.len() as i64 {
        return Err(diesel::result::Error::NotFound);
    }

    diesel::delete(product_discounts::table.filter(product_discounts::product_id.eq(product_id)))
        .execute(conn)?;

    for (position, discount_id) in ordered.into_iter().enumerate() {
        let link = NewProductDiscount::new(product_id, discount_id, position as i32);
        diesel::insert_into(product_discounts::table)
            .values(&link)
            .execute(conn)?;
    }

    Ok(())
}

fn order_by_column(
    query: products::BoxedQuery<'static, Sqlite>,
    column: ProductColumn,
    direction: SortDirection,
) -> products::BoxedQuery<'static, Sqlite> {
    match (column, direction) {
        (ProductColumn::Id, SortDirection::Asc) => query.order(products::id.asc()),
        (ProductColumn::Id, SortDirection::Desc) => query.order(products::id.desc()),
        (ProductColumn::Name, SortDirection::Asc) => query.order(products::name.asc()),
        (ProductColumn::Name, SortDirection::Desc) => query.order(products::name.desc()),
        (ProductColumn::Description, SortDirection::Asc) => {
            query.order(products::description.asc())
        }
        (ProductColumn::Description, SortDirection::Desc) => {
            query.order(products::description.desc())
        }
        (ProductColumn::Price, SortDirection::Asc) => query.order(products::price_cents.asc()),
        (ProductColumn::Price, SortDirection::Desc) => query.order(products::price_cents.desc()),
        (ProductColumn::CreatedAt, SortDirection::Asc) => query.order(products::created_at.asc()),
        (ProductColumn::CreatedAt, SortDirection::Desc) => {
            query.order(products::created_at.desc())
        }
        (ProductColumn::UpdatedAt, SortDirection::Asc) => query.order(products::updated_at.asc()),
        (ProductColumn::UpdatedAt, SortDirection::Desc) => {
            query.order(products::updated_at.desc())
        }
    }
}

/// Load discounts for the given products, grouped by product in application order.
pub(crate) fn load_discounts_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainDiscount>>> {
    let mut map: HashMap<i32, Vec<DomainDiscount>> = HashMap::new();

    for chunk in product_ids.chunks(ID_CHUNK_SIZE) {
        let rows = product_discounts::table
            .inner_join(discounts::table)
            .filter(product_discounts::product_id.eq_any(chunk))
            .order((
                product_discounts::position.asc(),
                product_discounts::id.asc(),
            ))
            .select((product_discounts::product_id, DbDiscount::as_select()))
            .load::<(i32, DbDiscount)>(conn)?;

        for (product_id, discount) in rows {
            map.entry(product_id).or_default().push(discount.into());
        }
    }

    Ok(map)
}
