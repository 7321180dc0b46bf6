//! Product catalogue endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clinica_core::ProductId;
use clinica_core::envelope::ListPayload;

use crate::error::{InputError, require_text};
use crate::{ApiResponse, BackendClient, BackendError, Paginated, RequestContext};

/// A catalogue product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.is_active && self.in_stock()
    }

    /// Whether the product is on sale (compare-at price above price).
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.compare_at_price.is_some_and(|was| was > self.price)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub product_count: Option<u64>,
}

/// Filters for the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Stable key for caching this query's results.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "search={}&category={}&page={}&limit={}",
            self.search.as_deref().unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
            self.page.unwrap_or(1),
            self.limit.map_or_else(String::new, |l| l.to_string()),
        )
    }
}

/// Body for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ProductInput {
    /// Check the fields the backend would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        require_text("name", &self.name)?;
        if self.price.is_sign_negative() {
            return Err(InputError::new("price", "must not be negative"));
        }
        if self.stock < 0 {
            return Err(InputError::new("stock", "must not be negative"));
        }
        Ok(())
    }
}

/// Partial update of a product; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ProductPatch {
    /// Check any fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `InputError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if self.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(InputError::new("price", "must not be negative"));
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(InputError::new("stock", "must not be negative"));
        }
        Ok(())
    }
}

// =============================================================================
// Endpoints
// =============================================================================

impl BackendClient {
    /// List products, normalizing bare arrays into a single page.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx))]
    pub async fn list_products(
        &self,
        ctx: &RequestContext,
        query: &ProductQuery,
    ) -> Result<ApiResponse<Paginated<Product>>, BackendError> {
        let response: ApiResponse<ListPayload<Product>> =
            self.get_with_query(ctx, &["products"], query).await?;
        Ok(response.map(ListPayload::into_page))
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails; a missing product is a 404 `Status`.
    #[instrument(skip(self, ctx), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        ctx: &RequestContext,
        id: &ProductId,
    ) -> Result<ApiResponse<Product>, BackendError> {
        self.get(ctx, &["products", id.as_str()]).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        input: &ProductInput,
    ) -> Result<ApiResponse<Product>, BackendError> {
        self.post(ctx, &["products"], input).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx, patch), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<ApiResponse<Product>, BackendError> {
        self.patch(ctx, &["products", id.as_str()], patch).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        ctx: &RequestContext,
        id: &ProductId,
    ) -> Result<ApiResponse<serde_json::Value>, BackendError> {
        self.delete(ctx, &["products", id.as_str()]).await
    }

    /// List product categories.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self, ctx))]
    pub async fn list_categories(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResponse<Vec<Category>>, BackendError> {
        let response: ApiResponse<ListPayload<Category>> =
            self.get(ctx, &["ecommerce", "categories"]).await?;
        Ok(response.map(|payload| payload.into_page().data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": "prod_1",
            "name": "Vitamin D3",
            "price": 19.99,
            "compareAtPrice": "24.99",
            "stock": 3,
            "imageUrl": "https://cdn.test/d3.png",
            "isActive": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "prod_1");
        assert_eq!(product.price, dec("19.99"));
        assert!(product.on_sale());
        assert!(product.is_purchasable());
        assert_eq!(product.image_url.as_deref(), Some("https://cdn.test/d3.png"));
    }

    #[test]
    fn test_product_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p","name":"Gauze","price":"2.50"}"#).unwrap();
        assert!(product.is_active);
        assert_eq!(product.stock, 0);
        assert!(!product.is_purchasable());
        assert!(!product.on_sale());
    }

    #[test]
    fn test_inactive_product_not_purchasable() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p","name":"Gauze","price":"2.50","stock":10,"isActive":false}"#,
        )
        .unwrap();
        assert!(!product.is_purchasable());
    }

    #[test]
    fn test_query_serializes_only_present_fields() {
        let query = ProductQuery {
            search: Some("tea".to_string()),
            page: Some(2),
            ..ProductQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"search": "tea", "page": 2}));
    }

    #[test]
    fn test_cache_key_distinguishes_queries() {
        let a = ProductQuery::default();
        let b = ProductQuery {
            page: Some(2),
            ..ProductQuery::default()
        };
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(
            a.cache_key(),
            ProductQuery {
                page: Some(1),
                ..ProductQuery::default()
            }
            .cache_key()
        );
    }

    #[test]
    fn test_input_validation() {
        let mut input = ProductInput {
            name: "Bandage".to_string(),
            description: None,
            price: dec("4.00"),
            stock: 10,
            category: None,
            image_url: None,
            sku: None,
            is_active: true,
        };
        assert!(input.validate().is_ok());

        input.price = dec("-1");
        assert_eq!(input.validate().unwrap_err().field, "price");

        input.price = dec("1");
        input.name = " ".to_string();
        assert_eq!(input.validate().unwrap_err().field, "name");

        let patch = ProductPatch {
            stock: Some(-3),
            ..ProductPatch::default()
        };
        assert_eq!(patch.validate().unwrap_err().field, "stock");
        assert!(ProductPatch::default().validate().is_ok());
    }

    #[test]
    fn test_patch_serializes_camel_case() {
        let patch = ProductPatch {
            image_url: Some("x.png".to_string()),
            is_active: Some(false),
            ..ProductPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"imageUrl": "x.png", "isActive": false}));
    }
}
