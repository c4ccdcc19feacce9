use async_trait::async_trait;
use thiserror::Error;

use shopfront_catalog::Variant;
use shopfront_core::VariantId;

/// Ledger operation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Not enough stock to satisfy the reservation. Carries the stock level
    /// observed at decision time so callers can report "only N available".
    #[error("insufficient stock: {available} available")]
    InsufficientStock { available: i64 },

    /// The variant does not exist.
    #[error("variant not found")]
    VariantNotFound,

    /// The requested quantity is not a positive amount.
    #[error("quantity must be positive")]
    InvalidQuantity,

    /// The backing store failed (connectivity, etc.). Not retried.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Pure admission rule for a reservation: returns the remaining stock after
/// decrementing, or the reason the reservation must be refused.
///
/// Both ledger implementations route their decision through this rule (the
/// in-memory store calls it under its lock; the Postgres store expresses it
/// as the `WHERE stock_quantity >= $n` clause of a conditional UPDATE).
pub fn admit(stock: i64, quantity: i64) -> Result<i64, LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity);
    }
    if stock < quantity {
        return Err(LedgerError::InsufficientStock { available: stock });
    }
    Ok(stock - quantity)
}

/// Pure rule for returning stock: the inverse of [`admit`].
///
/// Not idempotent; callers (the order lifecycle) are responsible for
/// invoking it at most once per logical reversal.
pub fn restock(stock: i64, quantity: i64) -> Result<i64, LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity);
    }
    stock
        .checked_add(quantity)
        .ok_or(LedgerError::InvalidQuantity)
}

/// Race-safe stock operations per variant.
///
/// `reserve` must be linearizable per-variant: two concurrent reservations
/// whose combined quantity exceeds the available stock must never both
/// succeed.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Atomically check `stock >= quantity` and decrement in the same step.
    /// On refusal no side effect occurs.
    async fn reserve(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError>;

    /// Atomically increment stock by `quantity`.
    async fn release(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError>;
}

#[async_trait]
impl<L> StockLedger for std::sync::Arc<L>
where
    L: StockLedger + ?Sized,
{
    async fn reserve(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError> {
        (**self).reserve(variant_id, quantity).await
    }

    async fn release(&self, variant_id: VariantId, quantity: i64) -> Result<Variant, LedgerError> {
        (**self).release(variant_id, quantity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admit_decrements_when_enough_stock() {
        assert_eq!(admit(10, 2), Ok(8));
        assert_eq!(admit(2, 2), Ok(0));
    }

    #[test]
    fn admit_refuses_and_reports_available() {
        assert_eq!(admit(3, 4), Err(LedgerError::InsufficientStock { available: 3 }));
        assert_eq!(admit(0, 1), Err(LedgerError::InsufficientStock { available: 0 }));
    }

    #[test]
    fn admit_rejects_non_positive_quantity() {
        assert_eq!(admit(10, 0), Err(LedgerError::InvalidQuantity));
        assert_eq!(admit(10, -2), Err(LedgerError::InvalidQuantity));
    }

    #[test]
    fn restock_is_inverse_of_admit() {
        let remaining = admit(10, 4).unwrap();
        assert_eq!(restock(remaining, 4), Ok(10));
    }

    #[test]
    fn restock_rejects_non_positive_quantity() {
        assert_eq!(restock(10, 0), Err(LedgerError::InvalidQuantity));
        assert_eq!(restock(10, -1), Err(LedgerError::InvalidQuantity));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: admission never produces negative remaining stock.
            #[test]
            fn admit_never_goes_negative(stock in 0i64..1_000_000, quantity in 1i64..1_000_000) {
                match admit(stock, quantity) {
                    Ok(remaining) => prop_assert!(remaining >= 0),
                    Err(LedgerError::InsufficientStock { available }) => {
                        prop_assert_eq!(available, stock);
                        prop_assert!(stock < quantity);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
                }
            }

            /// Property: admit then restock with the same quantity round-trips.
            #[test]
            fn admit_restock_round_trips(stock in 0i64..1_000_000, quantity in 1i64..1_000_000) {
                if let Ok(remaining) = admit(stock, quantity) {
                    prop_assert_eq!(restock(remaining, quantity), Ok(stock));
                }
            }

            /// Property: a refused admission has no effect to undo.
            #[test]
            fn refusal_reports_current_stock(stock in 0i64..1000, extra in 1i64..1000) {
                let quantity = stock + extra;
                prop_assert_eq!(
                    admit(stock, quantity),
                    Err(LedgerError::InsufficientStock { available: stock })
                );
            }
        }
    }
}
