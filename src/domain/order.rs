use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an order document. Only `Pending` orders may be cancelled;
/// stock and customer aggregates change exclusively on create and cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn valid_options() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or(())
    }
}

/// One product/quantity/price entry within an order, with the unit price
/// snapshotted at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub sales_rep_id: i32,
    pub items: Vec<OrderItem>,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of the line totals. Invariant: equals `total_amount`.
    pub fn items_total(&self) -> BigDecimal {
        self.items
            .iter()
            .map(|i| i.total_price.clone())
            .sum::<BigDecimal>()
    }
}

/// A requested line item, before validation against the catalog.
#[derive(Debug, Clone)]
pub struct LineRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// Validated input to the order-creation workflow.
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub customer_id: String,
    pub sales_rep_id: i32,
    pub items: Vec<LineRequest>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
}

/// Workflow result returned to the caller of `POST /orders`.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: String,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
}
