use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{CatalogError, CatalogResult},
    models::{Category, Image, ImageResponse, Product, ProductResponse},
    repository::{CategoryRepository, ImageRepository, ProductRepository},
};

fn db_err(e: sea_orm::DbErr) -> CatalogError {
    CatalogError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of the catalog repositories
#[derive(Clone)]
pub struct PgCatalogRepository {
    categories: BaseRepository<entity::category::Entity>,
    products: BaseRepository<entity::product::Entity>,
    images: BaseRepository<entity::image::Entity>,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: BaseRepository::new(db.clone()),
            products: BaseRepository::new(db.clone()),
            images: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.products.db()
    }
}

#[async_trait]
impl CategoryRepository for PgCatalogRepository {
    async fn create_category(&self, category: Category) -> CatalogResult<Category> {
        let name = category.name.clone();
        let model = self
            .categories
            .insert(entity::category::ActiveModel::from(category))
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                    CatalogError::DuplicateCategoryName(name.clone())
                } else {
                    db_err(e)
                }
            })?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        Ok(self
            .categories
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn get_category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = entity::category::Entity::find()
            .filter(entity::category::Column::Name.eq(name))
            .one(self.db())
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_categories(&self, page: u64, limit: u64) -> CatalogResult<(Vec<Category>, u64)> {
        let total = entity::category::Entity::find()
            .count(self.db())
            .await
            .map_err(db_err)?;

        let models = entity::category::Entity::find()
            .order_by_desc(entity::category::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update_category(&self, category: Category) -> CatalogResult<Category> {
        let id = category.id;
        let model = self
            .categories
            .update(entity::category::ActiveModel::from(category))
            .await
            .map_err(db_err)?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(model.into())
    }

    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool> {
        let rows_affected = self.categories.delete_by_id(id).await.map_err(db_err)?;

        if rows_affected > 0 {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn create_product(&self, product: Product) -> CatalogResult<Product> {
        let model = self
            .products
            .insert(entity::product::ActiveModel::from(product))
            .await
            .map_err(db_err)?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        Ok(self
            .products
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn get_product_with_category(&self, id: Uuid) -> CatalogResult<Option<ProductResponse>> {
        let result = entity::product::Entity::find_by_id(id)
            .find_also_related(entity::category::Entity)
            .one(self.db())
            .await
            .map_err(db_err)?;

        Ok(result.map(|(product, category)| ProductResponse {
            product: product.into(),
            category: category.map(Into::into),
        }))
    }

    async fn list_products(&self, page: u64, limit: u64) -> CatalogResult<Vec<ProductResponse>> {
        let results = entity::product::Entity::find()
            .find_also_related(entity::category::Entity)
            .order_by_desc(entity::product::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.db())
            .await
            .map_err(db_err)?;

        Ok(results
            .into_iter()
            .map(|(product, category)| ProductResponse {
                product: product.into(),
                category: category.map(Into::into),
            })
            .collect())
    }

    async fn update_product(&self, product: Product) -> CatalogResult<Product> {
        // The read-modify-write runs in a transaction so a concurrent delete
        // can't leave a half-applied update
        let txn = self.db().begin().await.map_err(db_err)?;

        let existing = entity::product::Entity::find_by_id(product.id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            txn.rollback().await.map_err(db_err)?;
            return Err(CatalogError::ProductNotFound(product.id));
        }

        let id = product.id;
        let model = entity::product::ActiveModel::from(product)
            .update(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(model.into())
    }

    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool> {
        let rows_affected = self.products.delete_by_id(id).await.map_err(db_err)?;

        if rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl ImageRepository for PgCatalogRepository {
    async fn create_image(&self, image: Image) -> CatalogResult<Image> {
        let model = self
            .images
            .insert(entity::image::ActiveModel::from(image))
            .await
            .map_err(db_err)?;

        tracing::info!(image_id = %model.id, "Created image");
        Ok(model.into())
    }

    async fn get_image(&self, id: Uuid) -> CatalogResult<Option<Image>> {
        Ok(self
            .images
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn get_image_with_product(&self, id: Uuid) -> CatalogResult<Option<ImageResponse>> {
        let result = entity::image::Entity::find_by_id(id)
            .find_also_related(entity::product::Entity)
            .one(self.db())
            .await
            .map_err(db_err)?;

        Ok(result.map(|(image, product)| ImageResponse {
            image: image.into(),
            product: product.map(Into::into),
        }))
    }

    async fn list_images(&self, page: u64, limit: u64) -> CatalogResult<(Vec<ImageResponse>, u64)> {
        let total = entity::image::Entity::find()
            .count(self.db())
            .await
            .map_err(db_err)?;

        let results = entity::image::Entity::find()
            .find_also_related(entity::product::Entity)
            .order_by_desc(entity::image::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.db())
            .await
            .map_err(db_err)?;

        Ok((
            results
                .into_iter()
                .map(|(image, product)| ImageResponse {
                    image: image.into(),
                    product: product.map(Into::into),
                })
                .collect(),
            total,
        ))
    }

    async fn update_image(&self, image: Image) -> CatalogResult<Image> {
        let id = image.id;
        let model = self
            .images
            .update(entity::image::ActiveModel::from(image))
            .await
            .map_err(db_err)?;

        tracing::info!(image_id = %id, "Updated image");
        Ok(model.into())
    }

    async fn delete_image(&self, id: Uuid) -> CatalogResult<bool> {
        let rows_affected = self.images.delete_by_id(id).await.map_err(db_err)?;

        if rows_affected > 0 {
            tracing::info!(image_id = %id, "Deleted image");
        }
        Ok(rows_affected > 0)
    }
}
