use sea_query::{Expr, Query as Qsql, SqliteQueryBuilder as QueryBuilder};
use sqlx::SqlitePool as Pool;

use super::models::{Category, Color, ProductDraft, ProductType, Size};
use super::schema::{Categories, Colors, ProductTypes, Sizes};
use super::CatalogError;
use crate::{bind_query_as, Id};

/// Attribute names resolved to their stored rows.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedAttributes {
    pub category: Category,
    pub kind: ProductType,
    pub size: Size,
    pub color: Color,
}

/// Resolves the draft's human-entered attribute names, enforcing that the
/// size belongs to the resolved type. Read-only: every failure is reported
/// before anything is written.
pub(crate) async fn resolve_attributes(
    pool: &Pool,
    draft: &ProductDraft,
) -> Result<ResolvedAttributes, CatalogError> {
    let category = find_category(pool, &draft.category)
        .await?
        .ok_or_else(|| CatalogError::NotFound("category", draft.category.clone()))?;
    let kind = find_product_type(pool, &draft.kind)
        .await?
        .ok_or_else(|| CatalogError::NotFound("type", draft.kind.clone()))?;
    let size =
        find_size(pool, kind.id, &draft.size)
            .await?
            .ok_or_else(|| CatalogError::InvalidSize {
                size: draft.size.clone(),
                kind: kind.name.clone(),
            })?;
    let color = find_color(pool, &draft.color)
        .await?
        .ok_or_else(|| CatalogError::NotFound("color", draft.color.clone()))?;

    Ok(ResolvedAttributes {
        category,
        kind,
        size,
        color,
    })
}

async fn find_category(pool: &Pool, name: &str) -> Result<Option<Category>, CatalogError> {
    let (sql, values) = Qsql::select()
        .expr(Expr::asterisk())
        .from(Categories::Table)
        .and_where(Expr::col(Categories::Name).eq(name))
        .build(QueryBuilder);
    let mut conn = pool.acquire().await.map_err(|_| CatalogError::Storage)?;
    bind_query_as(sqlx::query_as(&sql), &values)
        .fetch_optional(&mut conn)
        .await
        .map_err(|_| CatalogError::Storage)
}

async fn find_product_type(pool: &Pool, name: &str) -> Result<Option<ProductType>, CatalogError> {
    let (sql, values) = Qsql::select()
        .expr(Expr::asterisk())
        .from(ProductTypes::Table)
        .and_where(Expr::col(ProductTypes::Name).eq(name))
        .build(QueryBuilder);
    let mut conn = pool.acquire().await.map_err(|_| CatalogError::Storage)?;
    bind_query_as(sqlx::query_as(&sql), &values)
        .fetch_optional(&mut conn)
        .await
        .map_err(|_| CatalogError::Storage)
}

async fn find_size(pool: &Pool, kind_id: Id, name: &str) -> Result<Option<Size>, CatalogError> {
    let (sql, values) = Qsql::select()
        .expr(Expr::asterisk())
        .from(Sizes::Table)
        .and_where(Expr::col(Sizes::ProductTypeId).eq(kind_id))
        .and_where(Expr::col(Sizes::Name).eq(name))
        .build(QueryBuilder);
    let mut conn = pool.acquire().await.map_err(|_| CatalogError::Storage)?;
    bind_query_as(sqlx::query_as(&sql), &values)
        .fetch_optional(&mut conn)
        .await
        .map_err(|_| CatalogError::Storage)
}

pub(crate) async fn find_color(pool: &Pool, name: &str) -> Result<Option<Color>, CatalogError> {
    let (sql, values) = Qsql::select()
        .expr(Expr::asterisk())
        .from(Colors::Table)
        .and_where(Expr::col(Colors::Name).eq(name))
        .build(QueryBuilder);
    let mut conn = pool.acquire().await.map_err(|_| CatalogError::Storage)?;
    bind_query_as(sqlx::query_as(&sql), &values)
        .fetch_optional(&mut conn)
        .await
        .map_err(|_| CatalogError::Storage)
}
