pub(crate) mod backend;
mod group;
pub mod models;
mod schema;
pub mod slug;
mod validator;

pub use backend::CatalogSqlService;
pub use models::{
    AvailableColor, Category, Color, Dependencies, GroupedProduct, Product, ProductDraft,
    ProductGroup, ProductType, ProductTypeWithSizes, Size,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::Id;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("{0} `{1}` not found")]
    NotFound(&'static str, String),
    #[error("size `{size}` is not valid for type `{kind}`")]
    InvalidSize { size: String, kind: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage failure")]
    Storage,
    #[error("stored data could not be mapped")]
    Mapping,
}

/// Catalog operations, grouped-variant reads included. The SQL service is
/// the only implementation; the trait is the seam the HTTP boundary talks
/// through.
#[async_trait]
pub trait CatalogService {
    /// One entry per non-empty product group: the representative variant
    /// plus the colors of every member.
    async fn list(&self) -> Result<Vec<GroupedProduct>, CatalogError>;

    async fn read(&self, id: Id) -> Result<Product, CatalogError>;

    /// Variant lookup by group slug and color name.
    async fn read_variant(&self, slug: &str, color: &str) -> Result<Product, CatalogError>;

    async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError>;

    /// Re-validates the attribute names and reassigns the category, type,
    /// size and color references. The group assignment never moves.
    async fn update(&self, id: Id, draft: &ProductDraft) -> Result<Product, CatalogError>;

    async fn delete(&self, id: Id) -> Result<(), CatalogError>;

    /// The full reference catalogs, for client-side selection forms.
    async fn dependencies(&self) -> Result<Dependencies, CatalogError>;
}
