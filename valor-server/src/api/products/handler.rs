//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::RepoError;
use crate::orders::money::MAX_PRICE;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Upper bound for carat / weight values
const MAX_MEASURE: f64 = 100_000.0;

fn validate_amount(value: f64, field: &str, max: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be a non-negative number"),
        ));
    }
    if value > max {
        return Err(AppError::out_of_range(
            field,
            format!("{field} exceeds maximum allowed ({max})"),
        ));
    }
    Ok(())
}

fn validate_price(value: f64) -> AppResult<()> {
    validate_amount(value, "price", MAX_PRICE)
        .map_err(|e| AppError::with_message(ErrorCode::ProductInvalidPrice, e.message))
}

fn validate_stock(value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::out_of_range("stock", "stock must be non-negative"));
    }
    Ok(())
}

fn validate_list(values: &[String], field: &str, max_len: usize) -> AppResult<()> {
    for (i, v) in values.iter().enumerate() {
        validate_required_text(v, &format!("{field}[{i}]"), max_len)?;
    }
    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::required_field(field))
}

/// All fields are required on create
fn validate_create(payload: &ProductCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.collection, "collection", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.material, "material", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.jewelry_type, "jewelry_type", MAX_SHORT_TEXT_LEN)?;
    validate_price(required(payload.price, "price")?)?;
    validate_amount(required(payload.carat, "carat")?, "carat", MAX_MEASURE)?;
    validate_amount(required(payload.weight, "weight")?, "weight", MAX_MEASURE)?;
    validate_stock(required(payload.stock, "stock")?)?;
    if payload.sizes.is_empty() {
        return Err(AppError::required_field("sizes"));
    }
    validate_list(&payload.sizes, "sizes", MAX_SHORT_TEXT_LEN)?;
    if payload.images.is_empty() {
        return Err(AppError::required_field("images"));
    }
    validate_list(&payload.images, "images", MAX_URL_LEN)?;
    Ok(())
}

/// Only the fields present are checked
fn validate_update(payload: &ProductUpdate) -> AppResult<()> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.collection, "collection", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.material, "material", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.jewelry_type, "jewelry_type", MAX_SHORT_TEXT_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(carat) = payload.carat {
        validate_amount(carat, "carat", MAX_MEASURE)?;
    }
    if let Some(weight) = payload.weight {
        validate_amount(weight, "weight", MAX_MEASURE)?;
    }
    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
    }
    if let Some(sizes) = &payload.sizes {
        validate_list(sizes, "sizes", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(images) = &payload.images {
        validate_list(images, "images", MAX_URL_LEN)?;
    }
    Ok(())
}

fn product_not_found(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(_) => AppError::product_not_found(),
        other => other.into(),
    }
}

/// GET /api/products - 获取所有商品 (最新在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.products.find_all().await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::product_not_found)?;
    Ok(Json(ApiResponse::success(product)))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    ensure_admin(&current_user)?;
    validate_create(&payload)?;

    let product = state.products.create(payload).await?;
    tracing::info!(
        product_id = %product.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        name = %product.name,
        user_id = %current_user.id,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

/// PUT /api/products/:id - 部分更新商品
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_admin(&current_user)?;
    validate_update(&payload)?;

    let product = state
        .products
        .update(&id, payload)
        .await
        .map_err(product_not_found)?;
    tracing::info!(product_id = %id, user_id = %current_user.id, "Product updated");
    Ok(Json(ApiResponse::success(product)))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    ensure_admin(&current_user)?;

    let deleted = state
        .products
        .delete(&id)
        .await
        .map_err(product_not_found)?;
    tracing::info!(product_id = %id, user_id = %current_user.id, "Product deleted");
    Ok(Json(ApiResponse::success(deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProductCreate {
        ProductCreate {
            name: "Eternity Band".into(),
            description: "Platinum band with round diamonds".into(),
            price: Some(2450.0),
            category: "rings".into(),
            collection: "Eternal".into(),
            carat: Some(1.5),
            weight: Some(4.2),
            material: "platinum".into(),
            jewelry_type: "band".into(),
            sizes: vec!["5".into(), "6".into()],
            images: vec!["https://cdn.example.com/band.jpg".into()],
            stock: Some(3),
        }
    }

    #[test]
    fn test_create_validation() {
        assert!(validate_create(&valid()).is_ok());

        let mut p = valid();
        p.price = None;
        assert_eq!(validate_create(&p).unwrap_err().code, ErrorCode::RequiredField);

        let mut p = valid();
        p.price = Some(-1.0);
        assert_eq!(
            validate_create(&p).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );

        let mut p = valid();
        p.stock = Some(-2);
        assert_eq!(validate_create(&p).unwrap_err().code, ErrorCode::ValueOutOfRange);

        let mut p = valid();
        p.name = " ".into();
        assert_eq!(validate_create(&p).unwrap_err().code, ErrorCode::ValidationFailed);

        let mut p = valid();
        p.images.clear();
        assert!(validate_create(&p).is_err());
    }

    #[test]
    fn test_update_validation() {
        assert!(validate_update(&ProductUpdate::default()).is_ok());
        let p = ProductUpdate {
            carat: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(validate_update(&p).is_err());
        let p = ProductUpdate {
            stock: Some(0),
            ..Default::default()
        };
        assert!(validate_update(&p).is_ok());
    }
}
