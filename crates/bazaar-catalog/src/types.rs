//! Product catalog types

use serde::{Deserialize, Serialize};

/// A product record as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Response envelope for the product list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_camel_case() {
        let raw = r#"{
            "id": 1,
            "title": "iPhone 9",
            "description": "An apple mobile",
            "category": "smartphones",
            "price": 549.0,
            "discountPercentage": 12.96,
            "rating": 4.69,
            "stock": 94,
            "brand": "Apple",
            "thumbnail": "https://cdn.dummyjson.com/1/thumbnail.jpg",
            "images": ["https://cdn.dummyjson.com/1/1.jpg"]
        }"#;

        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.discount_percentage, 12.96);
        assert_eq!(product.brand.as_deref(), Some("Apple"));
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let raw = r#"{"id": 2, "title": "Bare", "price": 9.5}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.title, "Bare");
        assert!(product.brand.is_none());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_empty_list_is_a_valid_response() {
        let raw = r#"{"products": [], "total": 0, "skip": 0, "limit": 0}"#;
        let response: ProductsResponse = serde_json::from_str(raw).unwrap();
        assert!(response.products.is_empty());
    }
}
