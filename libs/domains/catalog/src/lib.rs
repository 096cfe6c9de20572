//! Catalog Domain
//!
//! Products, categories, and product images:
//!
//! - Category CRUD with unique names
//! - Product CRUD; products reference their category by name at the API
//!   surface and carry price and stock
//! - Image records, including multipart file upload to local disk
//! - Redis cache-aside on the product and image read paths

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    Category, CreateCategory, CreateImage, CreateProduct, Image, ImageResponse, Product,
    ProductResponse, UpdateCategory, UpdateImage, UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use repository::{
    CategoryRepository, ImageRepository, InMemoryCatalogRepository, ProductRepository,
};
pub use service::CatalogService;
