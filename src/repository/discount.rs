use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::discount::{
        Discount as DomainDiscount, DiscountColumn, DiscountListQuery,
        NewDiscount as DomainNewDiscount, UpdateDiscount as DomainUpdateDiscount,
    },
    domain::sorting::SortDirection,
    models::discount::{
        Discount as DbDiscount, NewDiscount as DbNewDiscount, UpdateDiscount as DbUpdateDiscount,
    },
    models::product_discount::NewProductDiscount,
    repository::{DieselRepository, DiscountReader, DiscountWriter, ID_CHUNK_SIZE},
    schema::{discounts, product_discounts, products},
};

impl DiscountReader for DieselRepository {
    fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<DomainDiscount>> {
        let mut conn = self.conn()?;
        let discount = discounts::table
            .filter(discounts::id.eq(id))
            .first::<DbDiscount>(&mut conn)
            .optional()?;

        Ok(discount.map(Into::into))
    }

    fn list_discounts(
        &self,
        query: DiscountListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainDiscount>)> {
        let mut conn = self.conn()?;

        let total = filtered_discounts(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let (column, direction) = query.order;
        let mut items = order_by_column(filtered_discounts(&query), column, direction)
            .then_order_by(discounts::id.asc());

        if let Some(pagination) = &query.pagination {
            let skipped = (pagination.page.max(1) - 1).saturating_mul(pagination.per_page);
            let offset = i64::try_from(skipped).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let db_discounts = items.load::<DbDiscount>(&mut conn)?;

        Ok((total, db_discounts.into_iter().map(Into::into).collect()))
    }

    fn list_discounts_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainDiscount>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let db_discounts = discounts::table
            .filter(discounts::id.eq_any(ids))
            .order(discounts::id.asc())
            .load::<DbDiscount>(&mut conn)?;

        Ok(db_discounts.into_iter().map(Into::into).collect())
    }

    fn list_product_discounts(
        &self,
        product_id: i32,
        active_only: bool,
    ) -> RepositoryResult<Vec<DomainDiscount>> {
        let mut conn = self.conn()?;

        let mut items = product_discounts::table
            .inner_join(discounts::table)
            .filter(product_discounts::product_id.eq(product_id))
            .select(DbDiscount::as_select())
            .into_boxed::<Sqlite>();

        if active_only {
            items = items.filter(discounts::is_active.eq(true));
        }

        let db_discounts = items
            .order((
                product_discounts::position.asc(),
                product_discounts::id.asc(),
            ))
            .load::<DbDiscount>(&mut conn)?;

        Ok(db_discounts.into_iter().map(Into::into).collect())
    }

    fn list_discount_product_ids(&self, discount_id: i32) -> RepositoryResult<Vec<i32>> {
        let mut conn = self.conn()?;

        let ids = product_discounts::table
            .filter(product_discounts::discount_id.eq(discount_id))
            .select(product_discounts::product_id)
            .order(product_discounts::product_id.asc())
            .load::<i32>(&mut conn)?;

        Ok(ids)
    }

    fn list_product_ids_for_discounts(
        &self,
        discount_ids: &[i32],
    ) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
        let mut conn = self.conn()?;
        let mut map: HashMap<i32, Vec<i32>> = HashMap::new();

        for chunk in discount_ids.chunks(ID_CHUNK_SIZE) {
            let rows = product_discounts::table
                .filter(product_discounts::discount_id.eq_any(chunk))
                .select((product_discounts::discount_id, product_discounts::product_id))
                .order((
                    product_discounts::discount_id.asc(),
                    product_discounts::product_id.asc(),
                ))
                .load::<(i32, i32)>(&mut conn)?;

            for (discount_id, product_id) in rows {
                map.entry(discount_id).or_default().push(product_id);
            }
        }

        Ok(map)
    }
}

impl DiscountWriter for DieselRepository {
    fn create_discount(
        &self,
        new_discount: &DomainNewDiscount,
    ) -> RepositoryResult<DomainDiscount> {
        let mut conn = self.conn()?;
        let db_new = DbNewDiscount::from(new_discount);

        let created = diesel::insert_into(discounts::table)
            .values(&db_new)
            .get_result::<DbDiscount>(&mut conn)?;

        Ok(created.into())
    }

    fn update_discount(
        &self,
        discount_id: i32,
        updates: &DomainUpdateDiscount,
    ) -> RepositoryResult<DomainDiscount> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateDiscount::from(updates);

        let target = discounts::table.filter(discounts::id.eq(discount_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbDiscount>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_discount_with_products(
        &self,
        discount_id: i32,
        updates: &DomainUpdateDiscount,
        product_ids: &[i32],
    ) -> RepositoryResult<DomainDiscount> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateDiscount::from(updates);

        let updated = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let updated = diesel::update(discounts::table.filter(discounts::id.eq(discount_id)))
                .set(&db_updates)
                .get_result::<DbDiscount>(conn)?;

            sync_links(conn, discount_id, product_ids)?;

            Ok(updated)
        })?;

        Ok(updated.into())
    }

    fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(
                product_discounts::table.filter(product_discounts::discount_id.eq(discount_id)),
            )
            .execute(conn)?;

            diesel::delete(discounts::table.filter(discounts::id.eq(discount_id))).execute(conn)
        })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn sync_discount_products(
        &self,
        discount_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let exists = discounts::table
                .filter(discounts::id.eq(discount_id))
                .count()
                .get_result::<i64>(conn)?;
            if exists == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            sync_links(conn, discount_id, product_ids)
        })
        .map_err(Into::into)
    }
}

/// Link the discount to exactly `product_ids`. Unknown product ids abort with `NotFound`.
fn sync_links(
    conn: &mut SqliteConnection,
    discount_id: i32,
    product_ids: &[i32],
) -> QueryResult<()> {
    let wanted: HashSet<i32> = product_ids.iter().copied().collect();
    let wanted_ids: Vec<i32> = wanted.iter().copied().collect();

    let mut found = 0;
    for chunk in wanted_ids.chunks(ID_CHUNK_SIZE) {
        found += products::table
            .filter(products::id.eq_any(chunk))
            .count()
            .get_result::<i64>(conn)?;
    }
    if found != wanted.len() as i64 {
        return Err(diesel::result::Error::NotFound);
    }

    let linked: HashSet<i32> = product_discounts::table
        .filter(product_discounts::discount_id.eq(discount_id))
        .select(product_discounts::product_id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();

    for stale in linked.difference(&wanted) {
        diesel::delete(
            product_discounts::table
                .filter(product_discounts::discount_id.eq(discount_id))
                .filter(product_discounts::product_id.eq(*stale)),
        )
        .execute(conn)?;
    }

    let mut attached = HashSet::new();
    for product_id in product_ids {
        if linked.contains(product_id) || !attached.insert(*product_id) {
            continue;
        }

        let last_position = product_discounts::table
            .filter(product_discounts::product_id.eq(*product_id))
            .select(diesel::dsl::max(product_discounts::position))
            .first::<Option<i32>>(conn)?;
        let position = last_position.map_or(0, |last| last + 1);

        diesel::insert_into(product_discounts::table)
            .values(&NewProductDiscount::new(*product_id, discount_id, position))
            .execute(conn)?;
    }

    Ok(())
}

fn filtered_discounts(query: &DiscountListQuery) -> discounts::BoxedQuery<'static, Sqlite> {
    let mut items = discounts::table.into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(discounts::title.like(pattern));
    }

    if let Some(discount_type) = query.discount_type {
        items = items.filter(discounts::discount_type.eq(discount_type.as_str()));
    }

    if query.active_only {
        items = items.filter(discounts::is_active.eq(true));
    }

    items
}

fn order_by_column(
    query: discounts::BoxedQuery<'static, Sqlite>,
    column: DiscountColumn,
    direction: SortDirection,
) -> discounts::BoxedQuery<'static, Sqlite> {
    match (column, direction) {
        (DiscountColumn::Id, SortDirection::Asc) => query.order(discounts::id.asc()),
        (DiscountColumn::Id, SortDirection::Desc) => query.order(discounts::id.desc()),
        (DiscountColumn::Title, SortDirection::Asc) => query.order(discounts::title.asc()),
        (DiscountColumn::Title, SortDirection::Desc) => query.order(discounts::title.desc()),
        (DiscountColumn::DiscountType, SortDirection::Asc) => {
            query.order(discounts::discount_type.asc())
        }
        (DiscountColumn::DiscountType, SortDirection::Desc) => {
            query.order(discounts::discount_type.desc())
        }
        (DiscountColumn::Value, SortDirection::Asc) => {
            query.order(discounts::value_hundredths.asc())
        }
        (DiscountColumn::Value, SortDirection::Desc) => {
            query.order(discounts::value_hundredths.desc())
        }
        (DiscountColumn::IsActive, SortDirection::Asc) => query.order(discounts::is_active.asc()),
        (DiscountColumn::IsActive, SortDirection::Desc) => {
            query.order(discounts::is_active.desc())
        }
        (DiscountColumn::CreatedAt, SortDirection::Asc) => {
            query.order(discounts::created_at.asc())
        }
        (DiscountColumn::CreatedAt, SortDirection::Desc) => {
            query.order(discounts::created_at.desc())
        }
        (DiscountColumn::UpdatedAt, SortDirection::Asc) => {
            query.order(discounts::updated_at.asc())
        }
        (DiscountColumn::UpdatedAt, SortDirection::Desc) => {
            query.order(discounts::updated_at.desc())
        }
    }
}
