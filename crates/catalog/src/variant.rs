use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity, ProductId, VariantId};

/// Product variant: the unit of stock.
///
/// `stock_quantity` is the one contended field in the whole system. It must
/// stay non-negative at all times; the only code allowed to decrement it is
/// the stock ledger (`shopfront-inventory`), which does so with an atomic
/// conditional update.
///
/// Prices are in the smallest currency unit (e.g., cents). `cost_price` is
/// admin-only and must never reach customer-facing responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub color: String,
    pub available_sizes: Vec<String>,
    pub cost_price: u64,
    pub selling_price: u64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVariant {
    pub product_id: ProductId,
    pub color: String,
    pub available_sizes: Vec<String>,
    pub cost_price: u64,
    pub selling_price: u64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
}

impl Variant {
    pub fn create(id: VariantId, new: NewVariant, at: DateTime<Utc>) -> DomainResult<Self> {
        if new.color.trim().is_empty() {
            return Err(DomainError::validation("color cannot be empty"));
        }
        if new.stock_quantity < 0 {
            return Err(DomainError::validation("stock_quantity cannot be negative"));
        }

        Ok(Self {
            id,
            product_id: new.product_id,
            color: new.color,
            available_sizes: new.available_sizes,
            cost_price: new.cost_price,
            selling_price: new.selling_price,
            stock_quantity: new.stock_quantity,
            image_url: new.image_url,
            created_at: at,
            updated_at: at,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Admin-driven absolute stock correction (not a ledger operation).
    pub fn set_stock(&mut self, stock_quantity: i64, at: DateTime<Utc>) -> DomainResult<()> {
        if stock_quantity < 0 {
            return Err(DomainError::validation("stock_quantity cannot be negative"));
        }
        self.stock_quantity = stock_quantity;
        self.updated_at = at;
        Ok(())
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn new_variant() -> NewVariant {
        NewVariant {
            product_id: ProductId::new(),
            color: "navy".to_string(),
            available_sizes: vec!["M".to_string()],
            cost_price: 1200,
            selling_price: 2500,
            stock_quantity: 10,
            image_url: None,
        }
    }

    #[test]
    fn create_keeps_stock_and_prices() {
        let variant = Variant::create(VariantId::new(), new_variant(), test_time()).unwrap();
        assert_eq!(variant.stock_quantity, 10);
        assert_eq!(variant.cost_price, 1200);
        assert_eq!(variant.selling_price, 2500);
        assert!(variant.in_stock());
    }

    #[test]
    fn create_rejects_negative_stock() {
        let mut new = new_variant();
        new.stock_quantity = -1;
        let err = Variant::create(VariantId::new(), new, test_time()).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("stock_quantity cannot be negative")
        );
    }

    #[test]
    fn create_rejects_blank_color() {
        let mut new = new_variant();
        new.color = " ".to_string();
        let err = Variant::create(VariantId::new(), new, test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("color cannot be empty"));
    }

    #[test]
    fn set_stock_rejects_negative_and_keeps_state() {
        let mut variant = Variant::create(VariantId::new(), new_variant(), test_time()).unwrap();
        let before = variant.clone();

        let err = variant.set_stock(-3, test_time()).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("stock_quantity cannot be negative")
        );
        assert_eq!(variant, before);
    }

    #[test]
    fn set_stock_to_zero_marks_out_of_stock() {
        let mut variant = Variant::create(VariantId::new(), new_variant(), test_time()).unwrap();
        variant.set_stock(0, test_time()).unwrap();
        assert!(!variant.in_stock());
    }
}
