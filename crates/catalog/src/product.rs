use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity, ProductId};

/// Catalog product: metadata shown on the storefront.
///
/// A product logically owns its variants; deleting a product cascades
/// deletion of its variants (enforced by the store, see `shopfront-infra`).
/// The product record itself is read-only input to ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub available_sizes: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub available_sizes: Vec<String>,
    pub is_active: bool,
}

/// Full-record replacement applied by an admin edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub available_sizes: Vec<String>,
    pub is_active: bool,
}

impl Product {
    pub fn create(id: ProductId, new: NewProduct, at: DateTime<Utc>) -> DomainResult<Self> {
        validate_name(&new.name)?;
        validate_category(&new.category)?;

        Ok(Self {
            id,
            name: new.name,
            description: new.description,
            category: new.category,
            image_url: new.image_url,
            available_sizes: new.available_sizes,
            is_active: new.is_active,
            created_at: at,
            updated_at: at,
        })
    }

    pub fn apply_update(&mut self, update: ProductUpdate, at: DateTime<Utc>) -> DomainResult<()> {
        validate_name(&update.name)?;
        validate_category(&update.category)?;

        self.name = update.name;
        self.description = update.description;
        self.category = update.category;
        self.image_url = update.image_url;
        self.available_sizes = update.available_sizes;
        self.is_active = update.is_active;
        self.updated_at = at;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn validate_category(category: &str) -> DomainResult<()> {
    if category.trim().is_empty() {
        return Err(DomainError::validation("category cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Wool Sweater".to_string(),
            description: "Heavy knit".to_string(),
            category: "sweaters".to_string(),
            image_url: None,
            available_sizes: vec!["M".to_string(), "L".to_string()],
            is_active: true,
        }
    }

    #[test]
    fn create_sets_timestamps_and_fields() {
        let at = test_time();
        let product = Product::create(ProductId::new(), new_product(), at).unwrap();
        assert_eq!(product.name, "Wool Sweater");
        assert_eq!(product.created_at, at);
        assert_eq!(product.updated_at, at);
        assert!(product.is_active);
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut new = new_product();
        new.name = "   ".to_string();
        let err = Product::create(ProductId::new(), new, test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn create_rejects_blank_category() {
        let mut new = new_product();
        new.category = String::new();
        let err = Product::create(ProductId::new(), new, test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("category cannot be empty"));
    }

    #[test]
    fn update_replaces_record_and_bumps_updated_at() {
        let created = test_time();
        let mut product = Product::create(ProductId::new(), new_product(), created).unwrap();

        let later = created + chrono::Duration::seconds(5);
        product
            .apply_update(
                ProductUpdate {
                    name: "Cotton Sweater".to_string(),
                    description: String::new(),
                    category: "sweaters".to_string(),
                    image_url: Some("https://cdn.example/sweater.jpg".to_string()),
                    available_sizes: vec!["S".to_string()],
                    is_active: false,
                },
                later,
            )
            .unwrap();

        assert_eq!(product.name, "Cotton Sweater");
        assert!(!product.is_active);
        assert_eq!(product.created_at, created);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn update_rejects_blank_name_without_mutating() {
        let mut product = Product::create(ProductId::new(), new_product(), test_time()).unwrap();
        let before = product.clone();

        let err = product
            .apply_update(
                ProductUpdate {
                    name: String::new(),
                    description: String::new(),
                    category: "sweaters".to_string(),
                    image_url: None,
                    available_sizes: vec![],
                    is_active: true,
                },
                test_time(),
            )
            .unwrap_err();

        assert_eq!(err, DomainError::validation("name cannot be empty"));
        assert_eq!(product, before);
    }
}
