//! Ordering workflow: the one place that combines the stock ledger with the
//! order lifecycle.
//!
//! The flow mirrors the storefront contract: a customer order reserves stock
//! first and only then creates the `pending` order record; admin-driven
//! status changes are planned by the pure state machine and the planned
//! ledger effect is executed before the new status is persisted, so a failed
//! effect leaves the order untouched.

use chrono::Utc;
use thiserror::Error;

use shopfront_auth::AdminIdentity;
use shopfront_core::{DomainError, OrderId};
use shopfront_inventory::{LedgerError, StockLedger};
use shopfront_orders::{NewOrder, Order, OrderStatus, StockEffect, TransitionError};

use crate::store::{OrderStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("order not found")]
    OrderNotFound,

    /// Deletion policy: only completed orders can be deleted.
    #[error("only completed orders can be deleted")]
    DeleteNotAllowed { status: OrderStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application service driving order placement and lifecycle transitions.
#[derive(Debug, Clone)]
pub struct OrderingService<S> {
    store: S,
}

impl<S> OrderingService<S>
where
    S: OrderStore + StockLedger,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Place a customer order: reserve stock atomically, then create the
    /// order snapshot in `pending`.
    ///
    /// If persisting the order fails after a successful reservation the
    /// stock stays decremented with no order record (orphaned reservation,
    /// accepted risk); logged so an operator can reconcile.
    pub async fn place_order(&self, new: NewOrder) -> Result<Order, OrderingError> {
        let now = Utc::now();

        // Validate the snapshot before touching stock, so a bad request can
        // never strand a reservation.
        let order = Order::create(OrderId::new(), new, now)?;

        self.store.reserve(order.variant_id, order.quantity).await?;

        if let Err(e) = self.store.put_order(order.clone()).await {
            tracing::warn!(
                order_id = %order.id,
                variant_id = %order.variant_id,
                quantity = order.quantity,
                "order persist failed after reserve; reservation is orphaned"
            );
            return Err(e.into());
        }

        tracing::info!(order_id = %order.id, variant_id = %order.variant_id, "order placed");
        Ok(order)
    }

    /// Drive an admin status change through the state machine and apply its
    /// planned stock effect.
    pub async fn transition_order(
        &self,
        order_id: OrderId,
        to: OrderStatus,
        actor: &AdminIdentity,
    ) -> Result<Order, OrderingError> {
        let now = Utc::now();

        let mut order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(OrderingError::OrderNotFound)?;

        let outcome = order.plan_transition(to, &actor.id, &actor.name, now)?;

        // The stock effect runs first: if the ledger refuses (e.g. the
        // completion decrement would oversell), the transition is aborted
        // and the order keeps its current status.
        if let Some(effect) = outcome.stock_effect {
            match effect {
                StockEffect::Reserve { quantity } => {
                    self.store.reserve(order.variant_id, quantity).await?;
                }
                StockEffect::Release { quantity } => {
                    self.store.release(order.variant_id, quantity).await?;
                }
            }
        }

        order.apply_transition(&outcome, now);
        self.store.put_order(order.clone()).await?;

        tracing::info!(
            order_id = %order.id,
            status = %order.status,
            admin_id = %actor.id,
            "order status updated"
        );
        Ok(order)
    }

    /// "Delete" an order: permitted for completed orders only; restocks and
    /// stamps `deleted_by`. The record survives as a cancelled order.
    pub async fn delete_order(
        &self,
        order_id: OrderId,
        actor: &AdminIdentity,
    ) -> Result<Order, OrderingError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(OrderingError::OrderNotFound)?;

        if !order.is_deletable() {
            return Err(OrderingError::DeleteNotAllowed {
                status: order.status,
            });
        }

        self.transition_order(order_id, OrderStatus::Cancelled, actor)
            .await
    }
}
