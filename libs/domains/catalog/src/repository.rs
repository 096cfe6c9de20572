use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, Image, ImageResponse, Product, ProductResponse};

/// Repository trait for Category persistence
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, category: Category) -> CatalogResult<Category>;

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    async fn get_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    async fn list_categories(&self, page: u64, limit: u64) -> CatalogResult<(Vec<Category>, u64)>;

    async fn update_category(&self, category: Category) -> CatalogResult<Category>;

    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool>;
}

/// Repository trait for Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: Product) -> CatalogResult<Product>;

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Fetch a product joined with its category
    async fn get_product_with_category(&self, id: Uuid) -> CatalogResult<Option<ProductResponse>>;

    /// List products joined with their categories, newest first
    async fn list_products(&self, page: u64, limit: u64) -> CatalogResult<Vec<ProductResponse>>;

    /// Persist a modified product; runs inside a transaction in the
    /// PostgreSQL implementation
    async fn update_product(&self, product: Product) -> CatalogResult<Product>;

    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool>;
}

/// Repository trait for Image persistence
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create_image(&self, image: Image) -> CatalogResult<Image>;

    async fn get_image(&self, id: Uuid) -> CatalogResult<Option<Image>>;

    /// Fetch an image joined with its product
    async fn get_image_with_product(&self, id: Uuid) -> CatalogResult<Option<ImageResponse>>;

    /// List images joined with their products, newest first
    async fn list_images(&self, page: u64, limit: u64) -> CatalogResult<(Vec<ImageResponse>, u64)>;

    async fn update_image(&self, image: Image) -> CatalogResult<Image>;

    async fn delete_image(&self, id: Uuid) -> CatalogResult<bool>;
}

/// In-memory implementation of the catalog repositories, shared-state so
/// relations resolve across entities (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    images: Arc<RwLock<HashMap<Uuid, Image>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogRepository {
    async fn create_category(&self, category: Category) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;

        if categories
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(CatalogError::DuplicateCategoryName(category.name));
        }

        categories.insert(category.id, category.clone());
        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn get_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_categories(&self, page: u64, limit: u64) -> CatalogResult<(Vec<Category>, u64)> {
        let categories = self.categories.read().await;
        let total = categories.len() as u64;

        let mut result: Vec<Category> = categories.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok((
            result.into_iter().skip(skip).take(limit as usize).collect(),
            total,
        ))
    }

    async fn update_category(&self, category: Category) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;

        if !categories.contains_key(&category.id) {
            return Err(CatalogError::CategoryNotFound(category.id));
        }

        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogRepository {
    async fn create_product(&self, product: Product) -> CatalogResult<Product> {
        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());
        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_product_with_category(&self, id: Uuid) -> CatalogResult<Option<ProductResponse>> {
        let products = self.products.read().await;
        let categories = self.categories.read().await;

        Ok(products.get(&id).map(|p| ProductResponse {
            product: p.clone(),
            category: categories.get(&p.category_id).cloned(),
        }))
    }

    async fn list_products(&self, page: u64, limit: u64) -> CatalogResult<Vec<ProductResponse>> {
        let products = self.products.read().await;
        let categories = self.categories.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok(result
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|p| {
                let category = categories.get(&p.category_id).cloned();
                ProductResponse {
                    product: p,
                    category,
                }
            })
            .collect())
    }

    async fn update_product(&self, product: Product) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        if !products.contains_key(&product.id) {
            return Err(CatalogError::ProductNotFound(product.id));
        }

        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ImageRepository for InMemoryCatalogRepository {
    async fn create_image(&self, image: Image) -> CatalogResult<Image> {
        let mut images = self.images.write().await;
        images.insert(image.id, image.clone());
        tracing::info!(image_id = %image.id, "Created image");
        Ok(image)
    }

    async fn get_image(&self, id: Uuid) -> CatalogResult<Option<Image>> {
        Ok(self.images.read().await.get(&id).cloned())
    }

    async fn get_image_with_product(&self, id: Uuid) -> CatalogResult<Option<ImageResponse>> {
        let images = self.images.read().await;
        let products = self.products.read().await;

        Ok(images.get(&id).map(|i| ImageResponse {
            image: i.clone(),
            product: i.product_id.and_then(|pid| products.get(&pid).cloned()),
        }))
    }

    async fn list_images(&self, page: u64, limit: u64) -> CatalogResult<(Vec<ImageResponse>, u64)> {
        let images = self.images.read().await;
        let products = self.products.read().await;
        let total = images.len() as u64;

        let mut result: Vec<Image> = images.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok((
            result
                .into_iter()
                .skip(skip)
                .take(limit as usize)
                .map(|i| {
                    let product = i.product_id.and_then(|pid| products.get(&pid).cloned());
                    ImageResponse { image: i, product }
                })
                .collect(),
            total,
        ))
    }

    async fn update_image(&self, image: Image) -> CatalogResult<Image> {
        let mut images = self.images.write().await;

        if !images.contains_key(&image.id) {
            return Err(CatalogError::ImageNotFound(image.id));
        }

        images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn delete_image(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.images.write().await.remove(&id).is_some())
    }
}
