//! Document-store repositories. Orders and customers are denormalized records
//! keyed by opaque string identifiers; every operation here is a single-item
//! statement and is never enlisted in a catalog-store transaction, so the two
//! stores stay independently transactional.

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::{
    Customer, CustomerFilter, CustomerPage, CustomerPatch, NewCustomer, OrderDelta,
};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderFilter, OrderItem, OrderPage, OrderStatus};
use crate::domain::ports::{CustomerStore, OrderStore};
use crate::schema::{customer_documents, order_documents};

use super::models::{
    CustomerDocumentChangeset, CustomerDocumentRow, NewCustomerDocumentRow, NewOrderDocumentRow,
    OrderDocumentRow,
};

fn row_to_order(row: OrderDocumentRow) -> Result<Order, DomainError> {
    let status = row.status.parse::<OrderStatus>().map_err(|_| {
        DomainError::Internal(format!(
            "order {} has corrupt status '{}'",
            row.order_id, row.status
        ))
    })?;
    let items: Vec<OrderItem> = serde_json::from_value(row.items).map_err(|e| {
        DomainError::Internal(format!("order {} has corrupt items: {e}", row.order_id))
    })?;
    Ok(Order {
        order_id: row.order_id,
        customer_id: row.customer_id,
        sales_rep_id: row.sales_rep_id,
        items,
        total_amount: row.total_amount,
        status,
        shipping_address: row.shipping_address,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for DieselOrderStore {
    fn put(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let items = serde_json::to_value(&order.items)
            .map_err(|e| DomainError::Internal(format!("failed to encode order items: {e}")))?;
        let result = diesel::insert_into(order_documents::table)
            .values(&NewOrderDocumentRow {
                order_id: order.order_id.clone(),
                customer_id: order.customer_id.clone(),
                sales_rep_id: order.sales_rep_id,
                items,
                total_amount: order.total_amount.clone(),
                status: order.status.as_str().to_string(),
                shipping_address: order.shipping_address.clone(),
                notes: order.notes.clone(),
                created_at: order.created_at,
                updated_at: order.updated_at,
            })
            .execute(&mut conn);
        match result {
            Ok(_) => Ok(()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Err(
                DomainError::Conflict("Order with this ID already exists".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = order_documents::table
            .find(order_id)
            .select(OrderDocumentRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(row_to_order).transpose()
    }

    fn list(&self, filter: &OrderFilter) -> Result<OrderPage, DomainError> {
        let mut conn = self.pool.get()?;

        let build = || {
            let mut query = order_documents::table.into_boxed();
            if let Some(status) = filter.status {
                query = query.filter(order_documents::status.eq(status.as_str()));
            }
            if let Some(customer_id) = &filter.customer_id {
                query = query.filter(order_documents::customer_id.eq(customer_id));
            }
            query
        };

        let total: i64 = build().count().get_result(&mut conn)?;
        let rows = build()
            .select(OrderDocumentRow::as_select())
            .order(order_documents::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load(&mut conn)?;

        let orders = rows
            .into_iter()
            .map(row_to_order)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrderPage { orders, total })
    }

    fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now();
        let target = order_documents::table.find(order_id);
        let row = match notes {
            Some(notes) => diesel::update(target)
                .set((
                    order_documents::status.eq(status.as_str()),
                    order_documents::notes.eq(notes),
                    order_documents::updated_at.eq(now),
                ))
                .returning(OrderDocumentRow::as_returning())
                .get_result(&mut conn)
                .optional()?,
            None => diesel::update(target)
                .set((
                    order_documents::status.eq(status.as_str()),
                    order_documents::updated_at.eq(now),
                ))
                .returning(OrderDocumentRow::as_returning())
                .get_result(&mut conn)
                .optional()?,
        };
        let row =
            row.ok_or_else(|| DomainError::NotFound(format!("Order not found: {order_id}")))?;
        row_to_order(row)
    }

    fn count_for_customer(&self, customer_id: &str) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        let count = order_documents::table
            .filter(order_documents::customer_id.eq(customer_id))
            .count()
            .get_result(&mut conn)?;
        Ok(count)
    }
}

pub struct DieselCustomerStore {
    pool: DbPool,
}

impl DieselCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CustomerStore for DieselCustomerStore {
    fn create(&self, input: NewCustomer) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;
        let row: CustomerDocumentRow = diesel::insert_into(customer_documents::table)
            .values(&NewCustomerDocumentRow {
                customer_id: format!("cust_{}", Uuid::new_v4()),
                name: input.name,
                email: input.email,
                phone: input.phone,
                address: input.address,
                company: input.company,
                notes: input.notes,
                status: input.status,
                assigned_sales_rep_id: input.assigned_sales_rep_id,
            })
            .returning(CustomerDocumentRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn get(&self, customer_id: &str) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = customer_documents::table
            .find(customer_id)
            .select(CustomerDocumentRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn list(&self, filter: &CustomerFilter) -> Result<CustomerPage, DomainError> {
        let mut conn = self.pool.get()?;

        let build = || {
            let mut query = customer_documents::table.into_boxed();
            if let Some(search) = &filter.search {
                let pattern = format!("%{search}%");
                query = query.filter(
                    customer_documents::name
                        .ilike(pattern.clone())
                        .or(customer_documents::email.ilike(pattern.clone()))
                        .or(customer_documents::company.ilike(pattern)),
                );
            }
            if let Some(status) = &filter.status {
                query = query.filter(customer_documents::status.eq(status));
            }
            if let Some(rep_id) = filter.sales_rep_id {
                query = query.filter(customer_documents::assigned_sales_rep_id.eq(rep_id));
            }
            query
        };

        let total: i64 = build().count().get_result(&mut conn)?;
        let rows = build()
            .select(CustomerDocumentRow::as_select())
            .order(customer_documents::name.asc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load(&mut conn)?;

        Ok(CustomerPage {
            customers: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    fn update(&self, customer_id: &str, patch: CustomerPatch) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::update(customer_documents::table.find(customer_id))
            .set(&CustomerDocumentChangeset {
                name: patch.name,
                email: patch.email,
                phone: patch.phone,
                address: patch.address,
                company: patch.company,
                notes: patch.notes,
                status: patch.status,
                assigned_sales_rep_id: patch.assigned_sales_rep_id,
                updated_at: Utc::now(),
            })
            .returning(CustomerDocumentRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Customer not found: {customer_id}"))
            })?;
        Ok(row.into())
    }

    fn delete(&self, customer_id: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted =
            diesel::delete(customer_documents::table.find(customer_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!(
                "Customer not found: {customer_id}"
            )));
        }
        Ok(())
    }

    fn apply_order_delta(
        &self,
        customer_id: &str,
        delta: &OrderDelta,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now();
        let target = customer_documents::table.find(customer_id);
        let updated = match delta.last_order_date {
            Some(last_order_date) => diesel::update(target)
                .set((
                    customer_documents::total_orders
                        .eq(customer_documents::total_orders + delta.orders),
                    customer_documents::total_value
                        .eq(customer_documents::total_value + delta.value.clone()),
                    customer_documents::last_order_date.eq(last_order_date),
                    customer_documents::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
            None => diesel::update(target)
                .set((
                    customer_documents::total_orders
                        .eq(customer_documents::total_orders + delta.orders),
                    customer_documents::total_value
                        .eq(customer_documents::total_value + delta.value.clone()),
                    customer_documents::updated_at.eq(now),
                ))
                .execute(&mut conn)?,
        };
        if updated == 0 {
            return Err(DomainError::NotFound(format!(
                "Customer not found: {customer_id}"
            )));
        }
        Ok(())
    }
}
