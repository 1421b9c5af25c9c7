//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id("product", id)?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Create a new product (payload must already be validated)
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = shared::util::now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    name = $name,
                    description = $description,
                    price = $price,
                    category = $category,
                    collection = $collection,
                    carat = $carat,
                    weight = $weight,
                    material = $material,
                    jewelry_type = $jewelry_type,
                    sizes = $sizes,
                    images = $images,
                    stock = $stock,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("price", data.price.unwrap_or_default()))
            .bind(("category", data.category))
            .bind(("collection", data.collection))
            .bind(("carat", data.carat.unwrap_or_default()))
            .bind(("weight", data.weight.unwrap_or_default()))
            .bind(("material", data.material))
            .bind(("jewelry_type", data.jewelry_type))
            .bind(("sizes", data.sizes))
            .bind(("images", data.images))
            .bind(("stock", data.stock.unwrap_or_default()))
            .bind(("now", now))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partially update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = parse_record_id("product", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    description = $description OR description,
                    price = IF $has_price THEN $price ELSE price END,
                    category = $category OR category,
                    collection = $collection OR collection,
                    carat = IF $has_carat THEN $carat ELSE carat END,
                    weight = IF $has_weight THEN $weight ELSE weight END,
                    material = $material OR material,
                    jewelry_type = $jewelry_type OR jewelry_type,
                    sizes = IF $has_sizes THEN $sizes ELSE sizes END,
                    images = IF $has_images THEN $images ELSE images END,
                    stock = IF $has_stock THEN $stock ELSE stock END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price))
            .bind(("category", data.category))
            .bind(("collection", data.collection))
            .bind(("has_carat", data.carat.is_some()))
            .bind(("carat", data.carat))
            .bind(("has_weight", data.weight.is_some()))
            .bind(("weight", data.weight))
            .bind(("material", data.material))
            .bind(("jewelry_type", data.jewelry_type))
            .bind(("has_sizes", data.sizes.is_some()))
            .bind(("sizes", data.sizes))
            .bind(("has_images", data.images.is_some()))
            .bind(("images", data.images))
            .bind(("has_stock", data.stock.is_some()))
            .bind(("stock", data.stock))
            .bind(("now", shared::util::now_millis()))
            .await?;

        result
            .take::<Option<Product>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id("product", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
