//! Catalog entities and data transfer objects.

use chrono::{DateTime, Utc};
use repository::{now_millis, serde_helpers, Entity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product entity, stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique identifier, fixed at creation time.
    pub slug: String,
    pub description: String,
    pub price: f64,
    /// Image URL.
    pub image: String,
    #[serde(default)]
    pub is_deleted: bool,
    /// Set by a soft delete, cleared by a restore.
    #[serde(with = "serde_helpers::optional_datetime", default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(with = "serde_helpers::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            slug: input.slug,
            description: input.description,
            price: input.price,
            image: input.image,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Product {
    type Create = NewProduct;
    type Update = UpdateProduct;

    const COLLECTION: &'static str = "products";
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn new_record(input: NewProduct) -> Self {
        Product::new(input)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Creation input with the slug already resolved; built by the service,
/// which owns slug derivation.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub image: String,
}

/// Creation input as accepted from callers. A missing `slug` is derived
/// from `name`; a supplied one is normalized to lowercase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: String,
    pub price: f64,
    pub image: String,
}

/// Partial update; absent fields keep their stored values. The slug is
/// deliberately not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Offset-paginated listing query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// 1-based page number, defaulting to 1.
    pub page: Option<u64>,
    /// Page size, defaulting to 10.
    pub limit: Option<u64>,
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
}

/// Cursor-paginated listing query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CursorQuery {
    /// Batch size, defaulting to 10.
    pub limit: Option<u64>,
    /// `created_at` of the last record of the previous batch; records at
    /// or after this instant are excluded.
    pub last_created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{to_document, Bson};

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Walnut Desk Organizer".to_string(),
            slug: "walnut-desk-organizer".to_string(),
            description: "Five compartments in oiled walnut".to_string(),
            price: 49.90,
            image: "https://example.com/img/organizer.jpg".to_string(),
        }
    }

    #[test]
    fn test_new_product_lifecycle_defaults() {
        let product = Product::new(new_product());

        assert!(!product.id.is_nil());
        assert!(!product.is_deleted);
        assert_eq!(product.deleted_at, None);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_product_serializes_with_storage_field_names() {
        let product = Product::new(new_product());
        let doc = to_document(&product).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), product.id.to_string());
        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));
        assert_eq!(doc.get("deleted_at"), Some(&Bson::Null));
        assert!(!doc.get_bool("is_deleted").unwrap());
    }

    #[test]
    fn test_update_product_skips_absent_fields() {
        let update = UpdateProduct {
            price: Some(39.90),
            ..Default::default()
        };
        let doc = to_document(&update).unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get_f64("price").unwrap(), 39.90);
    }
}
