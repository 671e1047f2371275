use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use sea_query::{Expr, Iden, Query as Qsql, SqliteQueryBuilder as QueryBuilder};
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool as Pool};

use super::models::{
    AvailableColor, Category, Color, Dependencies, GroupedProduct, Product, ProductDraft,
    ProductGroup, ProductType, ProductTypeWithSizes, Size,
};
use super::schema::{Categories, Colors, ProductGroups, ProductTypes, Products, Sizes};
use super::{group, validator, CatalogError, CatalogService};
use crate::{bind_query, bind_query_as, Id};

#[derive(Clone)]
pub struct CatalogSqlService {
    pool: Pool,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub(crate) struct ProductRow {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub category_id: Id,
    pub product_type_id: Id,
    pub size_id: Id,
    pub color_id: Id,
    pub product_group_id: Id,
    pub created_at: NaiveDateTime,
}

fn validate_draft(draft: &ProductDraft) -> Result<(), CatalogError> {
    if draft.name.trim().is_empty() {
        return Err(CatalogError::InvalidInput(
            "name must not be blank".to_string(),
        ));
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(CatalogError::InvalidInput(
            "price must be a non-negative number".to_string(),
        ));
    }
    if draft.stock < 0 {
        return Err(CatalogError::InvalidInput(
            "stock must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn index_by<T>(rows: Vec<T>, key: impl Fn(&T) -> Id) -> HashMap<Id, T> {
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

impl CatalogSqlService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<sqlx::Sqlite>, CatalogError> {
        self.pool.acquire().await.map_err(|_| CatalogError::Storage)
    }

    async fn load_table<R, T>(&self, table: T) -> Result<Vec<R>, CatalogError>
    where
        T: Iden + 'static,
        R: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let (sql, _) = Qsql::select()
            .expr(Expr::asterisk())
            .from(table)
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        sqlx::query_as(&sql)
            .fetch_all(&mut conn)
            .await
            .map_err(|_| CatalogError::Storage)
    }

    async fn reference_row<R, T, C>(
        &self,
        table: T,
        id_col: C,
        id: Id,
    ) -> Result<Option<R>, CatalogError>
    where
        T: Iden + 'static,
        C: Iden + 'static,
        R: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let (sql, values) = Qsql::select()
            .expr(Expr::asterisk())
            .from(table)
            .and_where(Expr::col(id_col).eq(id))
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| CatalogError::Storage)
    }

    async fn product_row(&self, id: Id) -> Result<Option<ProductRow>, CatalogError> {
        self.reference_row(Products::Table, Products::Id, id).await
    }

    /// Resolves a stored row into the wire shape. A dangling attribute
    /// reference means the stored data itself is inconsistent.
    async fn resolve_row(&self, row: ProductRow) -> Result<Product, CatalogError> {
        let category: Category = self
            .reference_row(Categories::Table, Categories::Id, row.category_id)
            .await?
            .ok_or(CatalogError::Mapping)?;
        let kind: ProductType = self
            .reference_row(ProductTypes::Table, ProductTypes::Id, row.product_type_id)
            .await?
            .ok_or(CatalogError::Mapping)?;
        let size: Size = self
            .reference_row(Sizes::Table, Sizes::Id, row.size_id)
            .await?
            .ok_or(CatalogError::Mapping)?;
        let color: Color = self
            .reference_row(Colors::Table, Colors::Id, row.color_id)
            .await?
            .ok_or(CatalogError::Mapping)?;
        let product_group: ProductGroup = self
            .reference_row(ProductGroups::Table, ProductGroups::Id, row.product_group_id)
            .await?
            .ok_or(CatalogError::Mapping)?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            image_url: row.image_url,
            created_at: row.created_at,
            category,
            kind,
            size,
            color,
            product_group,
        })
    }
}

#[async_trait]
impl CatalogService for CatalogSqlService {
    async fn list(&self) -> Result<Vec<GroupedProduct>, CatalogError> {
        let rows: Vec<ProductRow> = self.load_table(Products::Table).await?;
        let categories: HashMap<Id, Category> =
            index_by(self.load_table(Categories::Table).await?, |c: &Category| c.id);
        let kinds: HashMap<Id, ProductType> = index_by(
            self.load_table(ProductTypes::Table).await?,
            |t: &ProductType| t.id,
        );
        let sizes: HashMap<Id, Size> =
            index_by(self.load_table(Sizes::Table).await?, |s: &Size| s.id);
        let colors: HashMap<Id, Color> =
            index_by(self.load_table(Colors::Table).await?, |c: &Color| c.id);
        let groups: HashMap<Id, ProductGroup> = index_by(
            self.load_table(ProductGroups::Table).await?,
            |g: &ProductGroup| g.id,
        );

        // groups with zero members never show up here by construction
        let mut by_group: BTreeMap<Id, Vec<ProductRow>> = BTreeMap::new();
        for row in rows {
            by_group.entry(row.product_group_id).or_default().push(row);
        }

        let mut entries = Vec::with_capacity(by_group.len());
        for (_, mut members) in by_group {
            members.sort_by_key(|row| {
                let color_name = colors
                    .get(&row.color_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("");
                group::member_order(color_name, row.id)
            });

            let available_colors = members
                .iter()
                .map(|row| {
                    let color = colors.get(&row.color_id).ok_or(CatalogError::Mapping)?;
                    Ok(AvailableColor {
                        product_id: row.id,
                        name: color.name.clone(),
                        hex_code: color.hex_code.clone(),
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()?;

            let representative = match members.into_iter().next() {
                Some(row) => row,
                None => continue,
            };
            let product = Product {
                category: categories
                    .get(&representative.category_id)
                    .cloned()
                    .ok_or(CatalogError::Mapping)?,
                kind: kinds
                    .get(&representative.product_type_id)
                    .cloned()
                    .ok_or(CatalogError::Mapping)?,
                size: sizes
                    .get(&representative.size_id)
                    .cloned()
                    .ok_or(CatalogError::Mapping)?,
                color: colors
                    .get(&representative.color_id)
                    .cloned()
                    .ok_or(CatalogError::Mapping)?,
                product_group: groups
                    .get(&representative.product_group_id)
                    .cloned()
                    .ok_or(CatalogError::Mapping)?,
                id: representative.id,
                name: representative.name,
                description: representative.description,
                price: representative.price,
                stock: representative.stock,
                image_url: representative.image_url,
                created_at: representative.created_at,
            };
            entries.push(GroupedProduct {
                product,
                available_colors,
            });
        }
        Ok(entries)
    }

    async fn read(&self, id: Id) -> Result<Product, CatalogError> {
        let row = self
            .product_row(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("product", id.to_string()))?;
        self.resolve_row(row).await
    }

    async fn read_variant(&self, slug: &str, color: &str) -> Result<Product, CatalogError> {
        let color = validator::find_color(&self.pool, color)
            .await?
            .ok_or_else(|| CatalogError::NotFound("color", color.to_string()))?;
        let group = group::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| CatalogError::NotFound("group", slug.to_string()))?;

        let (sql, values) = Qsql::select()
            .expr(Expr::asterisk())
            .from(Products::Table)
            .and_where(Expr::col(Products::ProductGroupId).eq(group.id))
            .and_where(Expr::col(Products::ColorId).eq(color.id))
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        let row: Option<ProductRow> = bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| CatalogError::Storage)?;
        drop(conn);

        let row = row.ok_or_else(|| {
            CatalogError::NotFound("product", format!("{}-{}", slug, color.name))
        })?;
        self.resolve_row(row).await
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError> {
        validate_draft(draft)?;
        let attributes = validator::resolve_attributes(&self.pool, draft).await?;
        // group resolution happens-before the product insert; a group left
        // behind by a failed insert is an accepted leftover
        let group = group::resolve_group(&self.pool, draft).await?;

        let id = rand::random::<Id>();
        let (sql, values) = Qsql::insert()
            .into_table(Products::Table)
            .columns(vec![
                Products::Id,
                Products::Name,
                Products::Description,
                Products::Price,
                Products::Stock,
                Products::ImageUrl,
                Products::CategoryId,
                Products::ProductTypeId,
                Products::SizeId,
                Products::ColorId,
                Products::ProductGroupId,
            ])
            .values_panic(vec![
                id.into(),
                draft.name.clone().into(),
                draft.description.clone().into(),
                draft.price.into(),
                draft.stock.into(),
                draft.image_url.clone().into(),
                attributes.category.id.into(),
                attributes.kind.id.into(),
                attributes.size.id.into(),
                attributes.color.id.into(),
                group.id.into(),
            ])
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        bind_query(sqlx::query(&sql), &values)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::Storage)?;
        drop(conn);

        self.read(id).await
    }

    async fn update(&self, id: Id, draft: &ProductDraft) -> Result<Product, CatalogError> {
        validate_draft(draft)?;
        if self.product_row(id).await?.is_none() {
            return Err(CatalogError::NotFound("product", id.to_string()));
        }
        let attributes = validator::resolve_attributes(&self.pool, draft).await?;

        let (sql, values) = Qsql::update()
            .table(Products::Table)
            .value(Products::Name, draft.name.clone().into())
            .value(Products::Description, draft.description.clone().into())
            .value(Products::Price, draft.price.into())
            .value(Products::Stock, draft.stock.into())
            .value(Products::ImageUrl, draft.image_url.clone().into())
            .value(Products::CategoryId, attributes.category.id.into())
            .value(Products::ProductTypeId, attributes.kind.id.into())
            .value(Products::SizeId, attributes.size.id.into())
            .value(Products::ColorId, attributes.color.id.into())
            .and_where(Expr::col(Products::Id).eq(id))
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        bind_query(sqlx::query(&sql), &values)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::Storage)?;
        drop(conn);

        self.read(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), CatalogError> {
        let (sql, values) = Qsql::delete()
            .from_table(Products::Table)
            .and_where(Expr::col(Products::Id).eq(id))
            .build(QueryBuilder);
        let mut conn = self.acquire().await?;
        let done = bind_query(sqlx::query(&sql), &values)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::Storage)?;
        if done.rows_affected() == 0 {
            return Err(CatalogError::NotFound("product", id.to_string()));
        }
        Ok(())
    }

    async fn dependencies(&self) -> Result<Dependencies, CatalogError> {
        let categories: Vec<Category> = self.load_table(Categories::Table).await?;
        let kinds: Vec<ProductType> = self.load_table(ProductTypes::Table).await?;
        let all_sizes: Vec<Size> = self.load_table(Sizes::Table).await?;
        let colors: Vec<Color> = self.load_table(Colors::Table).await?;
        let groups: Vec<ProductGroup> = self.load_table(ProductGroups::Table).await?;

        let mut sizes_by_type: HashMap<Id, Vec<Size>> = HashMap::new();
        for size in all_sizes {
            sizes_by_type
                .entry(size.product_type_id)
                .or_default()
                .push(size);
        }
        let types = kinds
            .into_iter()
            .map(|kind| ProductTypeWithSizes {
                sizes: sizes_by_type.remove(&kind.id).unwrap_or_default(),
                id: kind.id,
                name: kind.name,
            })
            .collect();

        Ok(Dependencies {
            categories,
            types,
            colors,
            groups,
        })
    }
}
