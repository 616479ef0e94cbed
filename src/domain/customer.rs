use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

/// Denormalized customer document. `total_orders`, `total_value` and
/// `last_order_date` are derived aggregates owned by the order workflow;
/// they are not reachable from `CustomerPatch`.
#[derive(Debug, Clone)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company: String,
    pub notes: String,
    pub status: String,
    pub assigned_sales_rep_id: Option<i32>,
    pub total_orders: i32,
    pub total_value: BigDecimal,
    pub last_order_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company: String,
    pub notes: String,
    pub status: String,
    pub assigned_sales_rep_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub assigned_sales_rep_id: Option<Option<i32>>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.company.is_none()
            && self.notes.is_none()
            && self.status.is_none()
            && self.assigned_sales_rep_id.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Free-text search over name, email and company.
    pub search: Option<String>,
    pub status: Option<String>,
    pub sales_rep_id: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub total: i64,
}

/// Aggregate adjustment applied by the order workflow: `+1/+total` on create,
/// `-1/-total` on cancel.
#[derive(Debug, Clone)]
pub struct OrderDelta {
    pub orders: i32,
    pub value: BigDecimal,
    pub last_order_date: Option<DateTime<Utc>>,
}
