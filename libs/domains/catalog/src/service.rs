use database::redis::CacheStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, CreateImage, CreateProduct, Image, ImageResponse, PageFilter,
    Product, ProductResponse, UpdateCategory, UpdateImage, UpdateProduct,
};
use crate::repository::{CategoryRepository, ImageRepository, ProductRepository};

/// Cached page envelope for image listings
#[derive(Serialize, Deserialize)]
struct CachedImagePage {
    data: Vec<ImageResponse>,
    total: u64,
}

/// Service layer for the catalog: categories, products, and images.
///
/// Product and image reads go through the Redis cache-aside layer when one is
/// configured; every write path invalidates the affected keys.
#[derive(Clone)]
pub struct CatalogService<R> {
    repository: Arc<R>,
    cache: Option<CacheStore>,
    upload_dir: PathBuf,
}

impl<R> CatalogService<R>
where
    R: CategoryRepository + ProductRepository + ImageRepository,
{
    pub fn new(repository: R, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: None,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn with_cache(
        repository: R,
        cache: CacheStore,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: Some(cache),
            upload_dir: upload_dir.into(),
        }
    }

    // Categories

    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create_category(Category::new(input)).await
    }

    pub async fn get_category(&self, id: Uuid) -> CatalogResult<Category> {
        self.repository
            .get_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub async fn list_categories(&self, filter: PageFilter) -> CatalogResult<(Vec<Category>, u64)> {
        self.repository
            .list_categories(filter.page, filter.limit)
            .await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut category = self.get_category(id).await?;

        if let Some(ref new_name) = input.name {
            if new_name != &category.name {
                if let Some(existing) = self.repository.get_category_by_name(new_name).await? {
                    if existing.id != id {
                        return Err(CatalogError::DuplicateCategoryName(new_name.clone()));
                    }
                }
            }
        }

        category.apply_update(input);
        self.repository.update_category(category).await
    }

    pub async fn delete_category(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }
        Ok(())
    }

    // Products

    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let category = self
            .repository
            .get_category_by_name(&input.category)
            .await?
            .ok_or_else(|| CatalogError::CategoryNameNotFound(input.category.clone()))?;

        // The referenced image must exist before the product is created
        let image = match input.image_id {
            Some(image_id) => Some(
                self.repository
                    .get_image(image_id)
                    .await?
                    .ok_or(CatalogError::ImageReferenceMissing(image_id))?,
            ),
            None => None,
        };

        let now = chrono::Utc::now();
        let product = self
            .repository
            .create_product(Product {
                id: Uuid::now_v7(),
                name: input.name,
                description: input.description,
                price: input.price,
                stock: input.stock,
                category_id: category.id,
                created_at: now,
                updated_at: now,
            })
            .await?;

        if let Some(mut image) = image {
            image.product_id = Some(product.id);
            self.repository.update_image(image).await?;
            self.invalidate_image_cache(input.image_id).await;
        }

        self.invalidate_product_cache(None).await;
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> CatalogResult<ProductResponse> {
        let key = CacheStore::entity_key("product", id);

        if let Some(cache) = &self.cache {
            if let Some(product) = cache.get_json::<ProductResponse>(&key).await {
                return Ok(product);
            }
        }

        let product = self
            .repository
            .get_product_with_category(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        if let Some(cache) = &self.cache {
            cache.set_json(&key, &product).await;
        }

        Ok(product)
    }

    pub async fn list_products(&self, filter: PageFilter) -> CatalogResult<Vec<ProductResponse>> {
        let key = CacheStore::list_key("products", filter.page, filter.limit);

        if let Some(cache) = &self.cache {
            if let Some(products) = cache.get_json::<Vec<ProductResponse>>(&key).await {
                return Ok(products);
            }
        }

        let products = self
            .repository
            .list_products(filter.page, filter.limit)
            .await?;

        if let Some(cache) = &self.cache {
            cache.set_json(&key, &products).await;
        }

        Ok(products)
    }

    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let category_id = match input.category.as_deref() {
            Some(name) => Some(
                self.repository
                    .get_category_by_name(name)
                    .await?
                    .ok_or_else(|| CatalogError::CategoryNameNotFound(name.to_string()))?
                    .id,
            ),
            None => None,
        };

        let mut product = self
            .repository
            .get_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        product.apply_update(input, category_id);

        let updated = self.repository.update_product(product).await?;
        self.invalidate_product_cache(Some(id)).await;
        Ok(updated)
    }

    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }

        self.invalidate_product_cache(Some(id)).await;
        Ok(())
    }

    // Images

    pub async fn create_image(&self, input: CreateImage) -> CatalogResult<Image> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let image = self
            .repository
            .create_image(Image::new(input.url, None))
            .await?;

        self.invalidate_image_cache(None).await;
        Ok(image)
    }

    /// Store an uploaded file under the upload directory and record it
    /// against the product.
    pub async fn upload_image(
        &self,
        filename: &str,
        bytes: &[u8],
        product_id: Uuid,
    ) -> CatalogResult<Image> {
        if bytes.is_empty() {
            return Err(CatalogError::Validation("File buffer is empty".to_string()));
        }

        self.repository
            .get_product(product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        // Only the final path component; uploads must not escape the
        // upload directory
        let safe_name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CatalogError::Validation("Invalid file name".to_string()))?;

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| CatalogError::Internal(format!("Failed to create upload dir: {}", e)))?;

        let path = self.upload_dir.join(safe_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CatalogError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!(path = %path.display(), product_id = %product_id, "Stored uploaded image");

        let image = self
            .repository
            .create_image(Image::new(
                format!("/uploads/{}", safe_name),
                Some(product_id),
            ))
            .await?;

        self.invalidate_image_cache(None).await;
        Ok(image)
    }

    pub async fn get_image(&self, id: Uuid) -> CatalogResult<ImageResponse> {
        let key = CacheStore::entity_key("image", id);

        if let Some(cache) = &self.cache {
            if let Some(image) = cache.get_json::<ImageResponse>(&key).await {
                return Ok(image);
            }
        }

        let image = self
            .repository
            .get_image_with_product(id)
            .await?
            .ok_or(CatalogError::ImageNotFound(id))?;

        if let Some(cache) = &self.cache {
            cache.set_json(&key, &image).await;
        }

        Ok(image)
    }

    pub async fn list_images(
        &self,
        filter: PageFilter,
    ) -> CatalogResult<(Vec<ImageResponse>, u64)> {
        let key = CacheStore::list_key("images", filter.page, filter.limit);

        if let Some(cache) = &self.cache {
            if let Some(page) = cache.get_json::<CachedImagePage>(&key).await {
                return Ok((page.data, page.total));
            }
        }

        let (data, total) = self
            .repository
            .list_images(filter.page, filter.limit)
            .await?;

        if let Some(cache) = &self.cache {
            cache
                .set_json(
                    &key,
                    &CachedImagePage {
                        data: data.clone(),
                        total,
                    },
                )
                .await;
        }

        Ok((data, total))
    }

    pub async fn update_image(&self, id: Uuid, input: UpdateImage) -> CatalogResult<Image> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut image = self
            .repository
            .get_image(id)
            .await?
            .ok_or(CatalogError::ImageNotFound(id))?;

        if let Some(url) = input.url {
            image.url = url;
        }
        if let Some(product_id) = input.product_id {
            self.repository
                .get_product(product_id)
                .await?
                .ok_or(CatalogError::ProductNotFound(product_id))?;
            image.product_id = Some(product_id);
        }

        let updated = self.repository.update_image(image).await?;
        self.invalidate_image_cache(Some(id)).await;
        Ok(updated)
    }

    pub async fn delete_image(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete_image(id).await? {
            return Err(CatalogError::ImageNotFound(id));
        }

        self.invalidate_image_cache(Some(id)).await;
        Ok(())
    }

    // Cache invalidation

    async fn invalidate_product_cache(&self, id: Option<Uuid>) {
        if let Some(cache) = &self.cache {
            if let Some(id) = id {
                cache.del(&CacheStore::entity_key("product", id)).await;
            }
            cache.del_prefix("products:all:").await;
        }
    }

    async fn invalidate_image_cache(&self, id: Option<Uuid>) {
        if let Some(cache) = &self.cache {
            if let Some(id) = id {
                cache.del(&CacheStore::entity_key("image", id)).await;
            }
            cache.del_prefix("images:all:").await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCatalogRepository;
    use rust_decimal::Decimal;

    fn service() -> CatalogService<InMemoryCatalogRepository> {
        CatalogService::new(InMemoryCatalogRepository::new(), "./data/uploads")
    }

    fn service_with_tempdir() -> (CatalogService<InMemoryCatalogRepository>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), dir.path());
        (service, dir)
    }

    async fn seeded_category(service: &CatalogService<InMemoryCatalogRepository>) -> Category {
        service
            .create_category(CreateCategory {
                name: "Garden".to_string(),
                description: "Outdoor things".to_string(),
            })
            .await
            .unwrap()
    }

    fn product_input(category: &str) -> CreateProduct {
        CreateProduct {
            name: "Lamp".to_string(),
            description: "A lamp".to_string(),
            price: Decimal::new(1999, 2),
            stock: 10,
            category: category.to_string(),
            image_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_category_name_rejected() {
        let service = service();
        seeded_category(&service).await;

        let result = service
            .create_category(CreateCategory {
                name: "Garden".to_string(),
                description: String::new(),
            })
            .await;
        assert!(matches!(result, Err(CatalogError::DuplicateCategoryName(_))));
    }

    #[tokio::test]
    async fn test_create_product_requires_existing_category() {
        let service = service();

        let result = service.create_product(product_input("Nope")).await;
        assert!(matches!(result, Err(CatalogError::CategoryNameNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_product_rejects_missing_image_reference() {
        let service = service();
        seeded_category(&service).await;

        let missing = Uuid::now_v7();
        let result = service
            .create_product(CreateProduct {
                image_id: Some(missing),
                ..product_input("Garden")
            })
            .await;
        assert!(matches!(result, Err(CatalogError::ImageReferenceMissing(_))));
    }

    #[tokio::test]
    async fn test_create_product_attaches_image() {
        let service = service();
        seeded_category(&service).await;

        let image = service
            .create_image(CreateImage {
                url: "/uploads/lamp.jpg".to_string(),
            })
            .await
            .unwrap();
        assert!(image.product_id.is_none());

        let product = service
            .create_product(CreateProduct {
                image_id: Some(image.id),
                ..product_input("Garden")
            })
            .await
            .unwrap();

        let attached = service.get_image(image.id).await.unwrap();
        assert_eq!(attached.image.product_id, Some(product.id));
    }

    #[tokio::test]
    async fn test_get_product_includes_category() {
        let service = service();
        let category = seeded_category(&service).await;
        let product = service.create_product(product_input("Garden")).await.unwrap();

        let response = service.get_product(product.id).await.unwrap();
        assert_eq!(response.category.as_ref().map(|c| c.id), Some(category.id));
    }

    #[tokio::test]
    async fn test_update_product_resolves_category_by_name() {
        let service = service();
        seeded_category(&service).await;
        let product = service.create_product(product_input("Garden")).await.unwrap();

        let other = service
            .create_category(CreateCategory {
                name: "Indoor".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        let updated = service
            .update_product(
                product.id,
                UpdateProduct {
                    category: Some("Indoor".to_string()),
                    price: Some(Decimal::new(2999, 2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category_id, other.id);
        assert_eq!(updated.price, Decimal::new(2999, 2));
    }

    #[tokio::test]
    async fn test_update_product_unknown_category_is_rejected() {
        let service = service();
        seeded_category(&service).await;
        let product = service.create_product(product_input("Garden")).await.unwrap();

        let result = service
            .update_product(
                product.id,
                UpdateProduct {
                    category: Some("Nope".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogError::CategoryNameNotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_image_writes_file_and_links_product() {
        let (service, dir) = service_with_tempdir();
        seeded_category(&service).await;
        let product = service.create_product(product_input("Garden")).await.unwrap();

        let image = service
            .upload_image("lamp.jpg", b"jpegdata", product.id)
            .await
            .unwrap();

        assert_eq!(image.url, "/uploads/lamp.jpg");
        assert_eq!(image.product_id, Some(product.id));
        assert!(dir.path().join("lamp.jpg").exists());
    }

    #[tokio::test]
    async fn test_upload_image_strips_path_components() {
        let (service, dir) = service_with_tempdir();
        seeded_category(&service).await;
        let product = service.create_product(product_input("Garden")).await.unwrap();

        let image = service
            .upload_image("../../etc/lamp.jpg", b"jpegdata", product.id)
            .await
            .unwrap();

        assert_eq!(image.url, "/uploads/lamp.jpg");
        assert!(dir.path().join("lamp.jpg").exists());
    }

    #[tokio::test]
    async fn test_upload_image_rejects_empty_file() {
        let (service, _dir) = service_with_tempdir();
        seeded_category(&service).await;
        let product = service.create_product(product_input("Garden")).await.unwrap();

        let result = service.upload_image("lamp.jpg", b"", product.id).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_image_rejects_unknown_product() {
        let (service, _dir) = service_with_tempdir();

        let result = service
            .upload_image("lamp.jpg", b"jpegdata", Uuid::now_v7())
            .await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_product_missing_is_not_found() {
        let service = service();
        let result = service.delete_product(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }
}
