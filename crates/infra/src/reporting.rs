//! Dashboard reporting: enriched order rows and the analytics summary.
//!
//! Pure aggregation over store reads; no background jobs, no caching. The
//! numbers match what the dashboard shows: revenue/profit over completed
//! orders, inventory valued at cost, and stock warnings per variant.

use std::collections::HashMap;

use serde::Serialize;

use shopfront_catalog::{Product, Variant};
use shopfront_core::{ProductId, VariantId};
use shopfront_orders::{Order, OrderStatus};

/// Variants with `0 < stock < LOW_STOCK_THRESHOLD` are reported as low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// One order row as the dashboard shows it, enriched with the variant's
/// pricing (admin view; includes cost).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    #[serde(flatten)]
    pub order: Order,
    pub cost_price: u64,
    pub selling_price: u64,
    pub profit: i64,
}

/// Stock warning row (low stock / out of stock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantStockReport {
    pub id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub color: String,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_orders: u64,
    pub approved_orders: u64,
    pub cancelled_orders: u64,
    pub pending_orders: u64,
    pub total_products: u64,
    pub total_revenue: u64,
    pub total_profit: i64,
    pub inventory_value: u64,
    pub low_stock_variants: Vec<VariantStockReport>,
    pub out_of_stock_variants: Vec<VariantStockReport>,
}

/// Attach variant pricing to each order. Orders whose variant has since been
/// deleted report zero prices rather than disappearing from the list.
pub fn enrich_orders(orders: Vec<Order>, variants: &[Variant]) -> Vec<OrderReport> {
    let by_id: HashMap<VariantId, &Variant> = variants.iter().map(|v| (v.id, v)).collect();

    orders
        .into_iter()
        .map(|order| {
            let (cost, selling) = by_id
                .get(&order.variant_id)
                .map(|v| (v.cost_price, v.selling_price))
                .unwrap_or((0, 0));
            OrderReport {
                cost_price: cost,
                selling_price: selling,
                profit: (selling as i64 - cost as i64) * order.quantity,
                order,
            }
        })
        .collect()
}

pub fn summarize(
    products: &[Product],
    variants: &[Variant],
    orders: &[Order],
) -> AnalyticsSummary {
    let by_id: HashMap<VariantId, &Variant> = variants.iter().map(|v| (v.id, v)).collect();
    let product_names: HashMap<ProductId, &str> =
        products.iter().map(|p| (p.id, p.name.as_str())).collect();

    let mut total_revenue: u64 = 0;
    let mut total_profit: i64 = 0;
    for order in orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
    {
        let Some(variant) = by_id.get(&order.variant_id) else {
            continue;
        };
        total_revenue += variant.selling_price * order.quantity as u64;
        total_profit +=
            (variant.selling_price as i64 - variant.cost_price as i64) * order.quantity;
    }

    let inventory_value: u64 = variants
        .iter()
        .map(|v| v.cost_price * v.stock_quantity as u64)
        .sum();

    let stock_report = |v: &Variant| VariantStockReport {
        id: v.id,
        product_id: v.product_id,
        product_name: product_names
            .get(&v.product_id)
            .map(|n| n.to_string())
            .unwrap_or_default(),
        color: v.color.clone(),
        stock_quantity: v.stock_quantity,
    };

    let low_stock_variants = variants
        .iter()
        .filter(|v| v.stock_quantity > 0 && v.stock_quantity < LOW_STOCK_THRESHOLD)
        .map(stock_report)
        .collect();
    let out_of_stock_variants = variants
        .iter()
        .filter(|v| v.stock_quantity == 0)
        .map(stock_report)
        .collect();

    AnalyticsSummary {
        total_orders: orders.len() as u64,
        approved_orders: count_status(orders, OrderStatus::Completed),
        cancelled_orders: count_status(orders, OrderStatus::Cancelled),
        pending_orders: count_status(orders, OrderStatus::Pending)
            + count_status(orders, OrderStatus::Confirmed),
        total_products: products.iter().filter(|p| p.is_active).count() as u64,
        total_revenue,
        total_profit,
        inventory_value,
        low_stock_variants,
        out_of_stock_variants,
    }
}

fn count_status(orders: &[Order], status: OrderStatus) -> u64 {
    orders.iter().filter(|o| o.status == status).count() as u64
}
