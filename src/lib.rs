pub mod auth;
pub mod catalog;

pub use auth::AuthSqlService;
pub use catalog::CatalogSqlService;

/// Row identifier for every stored entity, generated in-process at insert.
pub type Id = u32;

sea_query::sea_query_driver_sqlite!();
pub(crate) use sea_query_driver_sqlite::{bind_query, bind_query_as};
