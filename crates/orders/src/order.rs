use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopfront_core::{DomainError, DomainResult, Entity, OrderId, ProductId, VariantId};

/// Order status lifecycle.
///
/// Closed enum: anything outside the transition table in
/// [`Order::plan_transition`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Who performed an admin action, recorded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub admin_id: String,
    pub admin_name: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditStamp {
    pub fn new(
        admin_id: impl Into<String>,
        admin_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            admin_id: admin_id.into(),
            admin_name: admin_name.into(),
            timestamp,
        }
    }
}

/// Customer order.
///
/// Product details are denormalized at creation time (snapshot, not
/// live-joined). Orders are never hard-deleted; "deletion" is a transition to
/// `cancelled` carrying a `deleted_by` stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
    pub phone_number: String,
    pub country: String,
    pub status: OrderStatus,
    pub approved_by: Option<AuditStamp>,
    pub deleted_by: Option<AuditStamp>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot captured when a customer places an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
    pub phone_number: String,
    pub country: String,
}

/// Ledger side effect a transition requires.
///
/// The state machine only *plans* the effect; the ordering workflow executes
/// it through the ledger before persisting the new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    /// Guarded decrement (`reserve`).
    Reserve { quantity: i64 },
    /// Increment (`release`).
    Release { quantity: i64 },
}

/// Result of planning a transition: the target status, the ledger effect to
/// execute (if any), and the audit stamps to set (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub status: OrderStatus,
    pub stock_effect: Option<StockEffect>,
    pub approved_by: Option<AuditStamp>,
    pub deleted_by: Option<AuditStamp>,
}

impl TransitionOutcome {
    fn plain(status: OrderStatus) -> Self {
        Self {
            status,
            stock_effect: None,
            approved_by: None,
            deleted_by: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The requested transition is not in the table.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl Order {
    /// Create a `pending` order from a snapshot. Set atomically with a
    /// successful stock reservation by the ordering workflow.
    pub fn create(id: OrderId, new: NewOrder, at: DateTime<Utc>) -> DomainResult<Self> {
        if new.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if new.product_name.trim().is_empty() {
            return Err(DomainError::validation("product_name cannot be empty"));
        }
        if new.phone_number.trim().is_empty() {
            return Err(DomainError::validation("phone_number cannot be empty"));
        }

        Ok(Self {
            id,
            variant_id: new.variant_id,
            product_id: new.product_id,
            product_name: new.product_name,
            size: new.size,
            color: new.color,
            quantity: new.quantity,
            phone_number: new.phone_number,
            country: new.country,
            status: OrderStatus::Pending,
            approved_by: None,
            deleted_by: None,
            created_at: at,
            updated_at: at,
        })
    }

    /// Decide what a transition to `to` entails, without mutating state.
    ///
    /// Transition table:
    ///
    /// | from      | to        | stock effect      | audit effect    |
    /// |-----------|-----------|-------------------|-----------------|
    /// | pending   | confirmed | none              | none            |
    /// | pending   | cancelled | release(qty)      | none            |
    /// | confirmed | completed | reserve(qty)      | set approved_by |
    /// | confirmed | cancelled | none              | none            |
    /// | completed | cancelled | release(qty)      | set deleted_by  |
    ///
    /// Everything else is rejected. Matching on the *current* status is what
    /// makes the guards hold: a second `completed` request finds the order
    /// already `completed` and falls through to `InvalidTransition`, so the
    /// completion decrement fires exactly once; likewise the restock only
    /// fires when the prior status actually was `completed`.
    pub fn plan_transition(
        &self,
        to: OrderStatus,
        admin_id: &str,
        admin_name: &str,
        at: DateTime<Utc>,
    ) -> Result<TransitionOutcome, TransitionError> {
        use OrderStatus::*;

        let outcome = match (self.status, to) {
            (Pending, Confirmed) => TransitionOutcome::plain(to),
            (Pending, Cancelled) => TransitionOutcome {
                stock_effect: Some(StockEffect::Release {
                    quantity: self.quantity,
                }),
                ..TransitionOutcome::plain(to)
            },
            // Observed "decrement on completion" behavior, preserved
            // literally but routed through the guarded reserve so stock can
            // still never go negative.
            (Confirmed, Completed) => TransitionOutcome {
                stock_effect: Some(StockEffect::Reserve {
                    quantity: self.quantity,
                }),
                approved_by: Some(AuditStamp::new(admin_id, admin_name, at)),
                ..TransitionOutcome::plain(to)
            },
            (Confirmed, Cancelled) => TransitionOutcome::plain(to),
            (Completed, Cancelled) => TransitionOutcome {
                stock_effect: Some(StockEffect::Release {
                    quantity: self.quantity,
                }),
                deleted_by: Some(AuditStamp::new(admin_id, admin_name, at)),
                ..TransitionOutcome::plain(to)
            },
            (from, to) => return Err(TransitionError::InvalidTransition { from, to }),
        };

        Ok(outcome)
    }

    /// Apply a planned transition. Audit stamps are write-once.
    pub fn apply_transition(&mut self, outcome: &TransitionOutcome, at: DateTime<Utc>) {
        self.status = outcome.status;
        if let Some(stamp) = &outcome.approved_by {
            self.approved_by = Some(stamp.clone());
        }
        if let Some(stamp) = &outcome.deleted_by {
            self.deleted_by = Some(stamp.clone());
        }
        self.updated_at = at;
    }

    /// Deletion policy: only `completed` orders may be deleted.
    pub fn is_deletable(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
