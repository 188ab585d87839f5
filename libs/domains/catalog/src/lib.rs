//! Catalog Domain
//!
//! Product catalog with soft delete and dual pagination (offset and
//! cursor) over MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← slug resolution, search, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← soft-delete visibility, offset + cursor paging
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ EntityStore │  ← MongoDB or in-memory execution
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product entity, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::mongodb::{connect, MongoConfig};
//! use domain_catalog::repository::ProductRepository;
//! use domain_catalog::service::ProductService;
//! use repository::MongoEntityStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MongoConfig::new("mongodb://localhost:27017", "catalog");
//! let client = connect(&config).await?;
//! let db = client.database(&config.database);
//!
//! let repository = ProductRepository::new(MongoEntityStore::new(&db));
//! repository.init_indexes().await?;
//! let service = ProductService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod slug;

pub use error::{CatalogError, CatalogResult};
pub use models::{CreateProduct, CursorQuery, NewProduct, Product, ProductQuery, UpdateProduct};
pub use repository::{CursorPage, ProductRepository, DEFAULT_SCROLL_LIMIT};
pub use service::ProductService;
pub use slug::slugify;
