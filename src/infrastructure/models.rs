use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::customer::Customer;
use crate::domain::product::Product;
use crate::domain::staff::StaffMember;
use crate::schema::{customer_documents, order_documents, products, sales, sales_staff};

// ── Catalog store rows ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: String,
    pub stock_quantity: i32,
    pub specifications: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            stock_quantity: row.stock_quantity,
            specifications: row.specifications,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub category: String,
    pub stock_quantity: i32,
    pub specifications: Value,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub specifications: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales_staff)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StaffRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub commission_rate: BigDecimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StaffRow> for StaffMember {
    fn from(row: StaffRow) -> Self {
        StaffMember {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            hire_date: row.hire_date,
            commission_rate: row.commission_rate,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales_staff)]
pub struct NewStaffRow {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub commission_rate: BigDecimal,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = sales_staff)]
pub struct StaffChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub hire_date: Option<Option<NaiveDate>>,
    pub commission_rate: Option<BigDecimal>,
    pub active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales)]
pub struct NewSaleRow {
    pub order_ref: String,
    pub product_id: i32,
    pub staff_id: i32,
    pub promotion_id: Option<i32>,
    pub customer_ref: String,
    pub customer_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
    pub status: String,
}

// ── Document store rows ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_documents)]
#[diesel(primary_key(order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderDocumentRow {
    pub order_id: String,
    pub customer_id: String,
    pub sales_rep_id: i32,
    pub items: Value,
    pub total_amount: BigDecimal,
    pub status: String,
    pub shipping_address: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_documents)]
pub struct NewOrderDocumentRow {
    pub order_id: String,
    pub customer_id: String,
    pub sales_rep_id: i32,
    pub items: Value,
    pub total_amount: BigDecimal,
    pub status: String,
    pub shipping_address: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customer_documents)]
#[diesel(primary_key(customer_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerDocumentRow {
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

impl From<CustomerDocumentRow> for Customer {
    fn from(row: CustomerDocumentRow) -> Self {
        Customer {
            customer_id: row.customer_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            company: row.company,
            notes: row.notes,
            status: row.status,
            assigned_sales_rep_id: row.assigned_sales_rep_id,
            total_orders: row.total_orders,
            total_value: row.total_value,
            last_order_date: row.last_order_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customer_documents)]
pub struct NewCustomerDocumentRow {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company: String,
    pub notes: String,
    pub status: String,
    pub assigned_sales_rep_id: Option<i32>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = customer_documents)]
pub struct CustomerDocumentChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub assigned_sales_rep_id: Option<Option<i32>>,
    pub updated_at: DateTime<Utc>,
}
