//! Variant grouping: which products count as colorways of one logical item.

use sea_query::{Expr, Query as Qsql, SqliteQueryBuilder as QueryBuilder};
use sqlx::SqlitePool as Pool;

use super::models::{ProductDraft, ProductGroup};
use super::schema::ProductGroups;
use super::slug::slugify;
use super::CatalogError;
use crate::{bind_query, bind_query_as, Id};

/// Decides which group a new product joins: the slug of the explicit group
/// label, or of the product name when no usable label was given. Two
/// unrelated names normalizing to the same slug share one group.
///
/// The insert goes first and the unique constraint on the slug column
/// arbitrates: losing a concurrent race means adopting the row the winner
/// stored, never a second group with the same slug.
pub(crate) async fn resolve_group(
    pool: &Pool,
    draft: &ProductDraft,
) -> Result<ProductGroup, CatalogError> {
    let label = draft
        .group
        .as_deref()
        .filter(|label| !label.trim().is_empty())
        .unwrap_or(&draft.name);
    let slug = slugify(label);
    if slug.is_empty() {
        return Err(CatalogError::InvalidInput(format!(
            "`{}` does not contain any slug characters",
            label
        )));
    }

    if let Some(existing) = find_by_slug(pool, &slug).await? {
        return Ok(existing);
    }

    let group = ProductGroup {
        id: rand::random::<Id>(),
        slug,
    };
    let (sql, values) = Qsql::insert()
        .into_table(ProductGroups::Table)
        .columns(vec![ProductGroups::Id, ProductGroups::Slug])
        .values_panic(vec![group.id.into(), group.slug.clone().into()])
        .build(QueryBuilder);
    let mut conn = pool.acquire().await.map_err(|_| CatalogError::Storage)?;
    let inserted = bind_query(sqlx::query(&sql), &values).execute(&mut conn).await;
    drop(conn);
    match inserted {
        Ok(_) => Ok(group),
        // rejected by the slug constraint: a concurrent create won the race
        Err(sqlx::Error::Database(_)) => find_by_slug(pool, &group.slug)
            .await?
            .ok_or(CatalogError::Storage),
        Err(_) => Err(CatalogError::Storage),
    }
}

pub(crate) async fn find_by_slug(
    pool: &Pool,
    slug: &str,
) -> Result<Option<ProductGroup>, CatalogError> {
    let (sql, values) = Qsql::select()
        .expr(Expr::asterisk())
        .from(ProductGroups::Table)
        .and_where(Expr::col(ProductGroups::Slug).eq(slug))
        .build(QueryBuilder);
    let mut conn = pool.acquire().await.map_err(|_| CatalogError::Storage)?;
    bind_query_as(sqlx::query_as(&sql), &values)
        .fetch_optional(&mut conn)
        .await
        .map_err(|_| CatalogError::Storage)
}

/// Member order within a group for grouped views: lexicographic color name,
/// then product id. The first member under this order is the group's
/// representative.
pub(crate) fn member_order(color_name: &str, product_id: Id) -> (String, Id) {
    (color_name.to_owned(), product_id)
}
