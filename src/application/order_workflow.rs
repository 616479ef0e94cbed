use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::customer::OrderDelta;
use crate::domain::errors::DomainError;
use crate::domain::order::{CreateOrderInput, CreatedOrder, Order, OrderStatus};
use crate::domain::ports::{CatalogStore, CustomerStore, OrderStore, SaleContext};

/// The order-fulfillment workflow: stock reservation against the catalog
/// store, order/customer writes against the document store, and the
/// compensating cancellation path.
///
/// The two stores are independently transactional. The catalog transaction
/// always commits (or fully aborts) before any document write is attempted,
/// and the document writes run in the fixed order order-then-customer. A
/// document-store failure after the catalog committed cannot be rolled back;
/// the workflow logs the orphaned state and surfaces an `Internal` error.
#[derive(Clone)]
pub struct OrderWorkflow {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    customers: Arc<dyn CustomerStore>,
}

impl OrderWorkflow {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        customers: Arc<dyn CustomerStore>,
    ) -> Self {
        Self {
            catalog,
            orders,
            customers,
        }
    }

    pub fn create(&self, input: CreateOrderInput) -> Result<CreatedOrder, DomainError> {
        validate(&input)?;

        // Fail fast before touching stock: the customer record is needed for
        // the aggregate update in the final step anyway.
        let customer = self
            .customers
            .get(&input.customer_id)?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Customer not found: {}", input.customer_id))
            })?;

        let order_id = Uuid::new_v4().to_string();
        let sale = SaleContext {
            order_id: order_id.clone(),
            customer_id: customer.customer_id.clone(),
            customer_name: customer.name.clone(),
            sales_rep_id: input.sales_rep_id,
        };

        // One catalog transaction: price snapshot, stock decrement and the
        // flattened sales rows commit together or not at all.
        let items = self.catalog.reserve_stock(&sale, &input.items)?;
        let total_amount: BigDecimal = items.iter().map(|i| i.total_price.clone()).sum();

        let now = Utc::now();
        let order = Order {
            order_id: order_id.clone(),
            customer_id: input.customer_id.clone(),
            sales_rep_id: input.sales_rep_id,
            items,
            total_amount: total_amount.clone(),
            status: OrderStatus::Pending,
            shipping_address: input.shipping_address.unwrap_or_default(),
            notes: input.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.orders.put(&order) {
            log::error!(
                "order {order_id}: stock reserved but order write failed, \
                 catalog and document stores have diverged: {e}"
            );
            return Err(DomainError::Internal(format!(
                "order write failed after stock was reserved: {e}"
            )));
        }

        let delta = OrderDelta {
            orders: 1,
            value: total_amount.clone(),
            last_order_date: Some(now),
        };
        if let Err(e) = self.customers.apply_order_delta(&input.customer_id, &delta) {
            log::error!(
                "order {order_id}: created but customer {} aggregates were not updated: {e}",
                input.customer_id
            );
            return Err(DomainError::Internal(format!(
                "customer aggregate update failed after order was created: {e}"
            )));
        }

        Ok(CreatedOrder {
            order_id,
            total_amount,
        })
    }

    pub fn cancel(&self, order_id: &str) -> Result<(), DomainError> {
        let order = self
            .orders
            .get(order_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Order not found: {order_id}")))?;

        if order.status != OrderStatus::Pending {
            return Err(DomainError::Conflict(
                "Only pending orders can be cancelled".to_string(),
            ));
        }

        // If restoration fails the order stays pending and nothing changed.
        self.catalog.restore_stock(order_id, &order.items)?;

        if let Err(e) = self
            .orders
            .update_status(order_id, OrderStatus::Cancelled, None)
        {
            log::error!(
                "order {order_id}: stock restored but order is still pending, \
                 catalog and document stores have diverged: {e}"
            );
            return Err(DomainError::Internal(format!(
                "order status update failed after stock was restored: {e}"
            )));
        }

        let delta = OrderDelta {
            orders: -1,
            value: -order.total_amount.clone(),
            last_order_date: None,
        };
        if let Err(e) = self.customers.apply_order_delta(&order.customer_id, &delta) {
            log::error!(
                "order {order_id}: cancelled but customer {} aggregates were not updated: {e}",
                order.customer_id
            );
            return Err(DomainError::Internal(format!(
                "customer aggregate update failed after order was cancelled: {e}"
            )));
        }

        Ok(())
    }

    /// Status transitions never touch stock or customer aggregates.
    pub fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, DomainError> {
        self.orders.update_status(order_id, status, notes)
    }
}

fn validate(input: &CreateOrderInput) -> Result<(), DomainError> {
    if input.customer_id.trim().is_empty() {
        return Err(DomainError::Validation(
            "customerId must not be empty".to_string(),
        ));
    }
    if input.items.is_empty() {
        return Err(DomainError::Validation(
            "items must contain at least one line".to_string(),
        ));
    }
    if input.items.iter().any(|l| l.quantity <= 0) {
        return Err(DomainError::Validation(
            "Invalid item: productId and positive quantity required".to_string(),
        ));
    }
    Ok(())
}
