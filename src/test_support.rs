//! In-memory implementations of the store ports, used by the workflow and
//! handler tests. Reservation and restoration mimic the all-or-nothing
//! semantics of the real catalog transactions by staging changes on a clone.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::customer::{
    Customer, CustomerFilter, CustomerPage, CustomerPatch, NewCustomer, OrderDelta,
};
use crate::domain::dashboard::{
    CustomerInsightRow, CustomerTotals, DashboardSummary, DateRange, InventoryStatusRow,
    ProductTotals, RepPerformanceRow, SalesSummaryRow, SalesTotals, SalesTrends, StaffTotals,
    TopProductRow,
};
use crate::domain::errors::DomainError;
use crate::domain::order::{LineRequest, Order, OrderFilter, OrderItem, OrderPage, OrderStatus};
use crate::domain::ports::{
    CatalogStore, CustomerStore, DashboardQueries, OrderStore, SaleContext,
};
use crate::domain::product::{NewProduct, Product, ProductFilter, ProductPage, ProductPatch};
use crate::domain::staff::{NewStaffMember, StaffFilter, StaffMember, StaffPage, StaffPatch};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal literal")
}

#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub order_ref: String,
    pub product_id: i32,
    pub staff_id: i32,
    pub customer_ref: String,
    pub customer_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
    pub status: String,
}

#[derive(Default)]
pub struct MemoryCatalog {
    products: Mutex<HashMap<i32, Product>>,
    staff: Mutex<HashMap<i32, StaffMember>>,
    sales: Mutex<Vec<SaleRecord>>,
    next_product_id: AtomicI32,
    next_staff_id: AtomicI32,
    fail_restore: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            next_product_id: AtomicI32::new(1),
            next_staff_id: AtomicI32::new(1),
            ..Default::default()
        }
    }

    pub fn seed_product(&self, id: i32, name: &str, price: &str, stock: i32) {
        self.seed_product_with_category(id, name, price, stock, "General");
    }

    pub fn seed_product_with_category(
        &self,
        id: i32,
        name: &str,
        price: &str,
        stock: i32,
        category: &str,
    ) {
        let now = Utc::now();
        self.products.lock().unwrap().insert(
            id,
            Product {
                id,
                name: name.to_string(),
                description: String::new(),
                price: dec(price),
                category: category.to_string(),
                stock_quantity: stock,
                specifications: serde_json::json!({}),
                created_at: now,
                updated_at: now,
            },
        );
        self.next_product_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    pub fn seed_staff(&self, id: i32, name: &str, email: &str) {
        let now = Utc::now();
        self.staff.lock().unwrap().insert(
            id,
            StaffMember {
                id,
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                hire_date: None,
                commission_rate: dec("0.05"),
                active: true,
                created_at: now,
                updated_at: now,
            },
        );
        self.next_staff_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    pub fn set_price(&self, id: i32, price: &str) {
        if let Some(p) = self.products.lock().unwrap().get_mut(&id) {
            p.price = dec(price);
        }
    }

    pub fn stock_of(&self, id: i32) -> i32 {
        self.products.lock().unwrap()[&id].stock_quantity
    }

    pub fn sales_for_order(&self, order_id: &str) -> Vec<SaleRecord> {
        self.sales
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.order_ref == order_id)
            .cloned()
            .collect()
    }

    pub fn fail_next_restore(&self) {
        self.fail_restore.store(true, Ordering::SeqCst);
    }
}

impl CatalogStore for MemoryCatalog {
    fn create_product(&self, input: NewProduct) -> Result<Product, DomainError> {
        let id = self.next_product_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let product = Product {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            stock_quantity: input.stock_quantity,
            specifications: input.specifications,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().insert(id, product.clone());
        Ok(product)
    }

    fn product_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, DomainError> {
        let products = self.products.lock().unwrap();
        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| {
                filter.category.as_deref().is_none_or(|c| p.category == c)
                    && filter.search.as_deref().is_none_or(|s| {
                        let s = s.to_lowercase();
                        p.name.to_lowercase().contains(&s)
                            || p.description.to_lowercase().contains(&s)
                    })
                    && filter.low_stock.is_none_or(|n| p.stock_quantity <= n)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        let total = matched.len() as i64;
        let page: Vec<Product> = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok(ProductPage {
            products: page,
            total,
        })
    }

    fn update_product(&self, id: i32, patch: ProductPatch) -> Result<Product, DomainError> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("Product not found: {id}")))?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(stock) = patch.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(specs) = patch.specifications {
            product.specifications = specs;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    fn delete_product(&self, id: i32) -> Result<(), DomainError> {
        self.products
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Product not found: {id}")))
    }

    fn create_staff(&self, input: NewStaffMember) -> Result<StaffMember, DomainError> {
        let mut staff = self.staff.lock().unwrap();
        if staff.values().any(|s| s.email == input.email) {
            return Err(DomainError::Conflict(
                "Sales representative with this email already exists".to_string(),
            ));
        }
        let id = self.next_staff_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let member = StaffMember {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            hire_date: input.hire_date,
            commission_rate: input.commission_rate,
            active: true,
            created_at: now,
            updated_at: now,
        };
        staff.insert(id, member.clone());
        Ok(member)
    }

    fn staff_by_id(&self, id: i32) -> Result<Option<StaffMember>, DomainError> {
        Ok(self.staff.lock().unwrap().get(&id).cloned())
    }

    fn list_staff(&self, filter: &StaffFilter) -> Result<StaffPage, DomainError> {
        let staff = self.staff.lock().unwrap();
        let mut matched: Vec<StaffMember> = staff
            .values()
            .filter(|s| {
                filter.active.is_none_or(|a| s.active == a)
                    && filter.search.as_deref().is_none_or(|q| {
                        let q = q.to_lowercase();
                        s.name.to_lowercase().contains(&q) || s.email.to_lowercase().contains(&q)
                    })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        let total = matched.len() as i64;
        let page: Vec<StaffMember> = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok(StaffPage { staff: page, total })
    }

    fn update_staff(&self, id: i32, patch: StaffPatch) -> Result<StaffMember, DomainError> {
        let mut staff = self.staff.lock().unwrap();
        let member = staff
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("Sales representative not found: {id}")))?;
        if let Some(name) = patch.name {
            member.name = name;
        }
        if let Some(email) = patch.email {
            member.email = email;
        }
        if let Some(phone) = patch.phone {
            member.phone = phone;
        }
        if let Some(hire_date) = patch.hire_date {
            member.hire_date = hire_date;
        }
        if let Some(rate) = patch.commission_rate {
            member.commission_rate = rate;
        }
        if let Some(active) = patch.active {
            member.active = active;
        }
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    fn delete_staff(&self, id: i32) -> Result<(), DomainError> {
        if self.sales.lock().unwrap().iter().any(|r| r.staff_id == id) {
            return Err(DomainError::Conflict(
                "Sales representative has recorded sales and cannot be deleted".to_string(),
            ));
        }
        self.staff
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Sales representative not found: {id}")))
    }

    fn reserve_stock(
        &self,
        sale: &SaleContext,
        lines: &[LineRequest],
    ) -> Result<Vec<OrderItem>, DomainError> {
        let mut products = self.products.lock().unwrap();
        let mut staged = products.clone();
        let mut items = Vec::with_capacity(lines.len());
        let mut rows = Vec::with_capacity(lines.len());

        for line in lines {
            let product = staged
                .get_mut(&line.product_id)
                .ok_or_else(|| DomainError::NotFound(format!(
                    "Product not found: {}",
                    line.product_id
                )))?;
            if product.stock_quantity < line.quantity {
                return Err(DomainError::Conflict(format!(
                    "Insufficient stock for product {}. Available: {}, Requested: {}",
                    product.name, product.stock_quantity, line.quantity
                )));
            }
            let total_price = &product.price * BigDecimal::from(line.quantity);
            items.push(OrderItem {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.price.clone(),
                total_price: total_price.clone(),
            });
            rows.push(SaleRecord {
                order_ref: sale.order_id.clone(),
                product_id: product.id,
                staff_id: sale.sales_rep_id,
                customer_ref: sale.customer_id.clone(),
                customer_name: sale.customer_name.clone(),
                quantity: line.quantity,
                unit_price: product.price.clone(),
                total_price,
                status: OrderStatus::Pending.as_str().to_string(),
            });
            product.stock_quantity -= line.quantity;
        }

        *products = staged;
        self.sales.lock().unwrap().extend(rows);
        Ok(items)
    }

    fn restore_stock(&self, order_id: &str, items: &[OrderItem]) -> Result<(), DomainError> {
        if self.fail_restore.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Internal("injected restore failure".to_string()));
        }
        let mut products = self.products.lock().unwrap();
        for item in items {
            if let Some(product) = products.get_mut(&item.product_id) {
                product.stock_quantity += item.quantity;
            }
        }
        for row in self.sales.lock().unwrap().iter_mut() {
            if row.order_ref == order_id {
                row.status = OrderStatus::Cancelled.as_str().to_string();
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryOrders {
    orders: Mutex<HashMap<String, Order>>,
    fail_put: AtomicBool,
}

impl MemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_put(&self) {
        self.fail_put.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for MemoryOrders {
    fn put(&self, order: &Order) -> Result<(), DomainError> {
        if self.fail_put.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Internal(
                "injected order write failure".to_string(),
            ));
        }
        let mut orders = self.orders.lock().unwrap();
        if orders.contains_key(&order.order_id) {
            return Err(DomainError::Conflict(
                "Order with this ID already exists".to_string(),
            ));
        }
        orders.insert(order.order_id.clone(), order.clone());
        Ok(())
    }

    fn get(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().get(order_id).cloned())
    }

    fn list(&self, filter: &OrderFilter) -> Result<OrderPage, DomainError> {
        let orders = self.orders.lock().unwrap();
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| {
                filter.status.is_none_or(|s| o.status == s)
                    && filter
                        .customer_id
                        .as_deref()
                        .is_none_or(|c| o.customer_id == c)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matched.len() as i64;
        let page: Vec<Order> = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok(OrderPage {
            orders: page,
            total,
        })
    }

    fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::NotFound(format!("Order not found: {order_id}")))?;
        order.status = status;
        if let Some(notes) = notes {
            order.notes = notes.to_string();
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    fn count_for_customer(&self, customer_id: &str) -> Result<i64, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.customer_id == customer_id)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryCustomers {
    customers: Mutex<HashMap<String, Customer>>,
}

impl MemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_customer(&self, id: &str, name: &str) {
        let now = Utc::now();
        self.customers.lock().unwrap().insert(
            id.to_string(),
            Customer {
                customer_id: id.to_string(),
                name: name.to_string(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                company: String::new(),
                notes: String::new(),
                status: "active".to_string(),
                assigned_sales_rep_id: None,
                total_orders: 0,
                total_value: BigDecimal::from(0),
                last_order_date: None,
                created_at: now,
                updated_at: now,
            },
        );
    }
}

impl CustomerStore for MemoryCustomers {
    fn create(&self, input: NewCustomer) -> Result<Customer, DomainError> {
        let now = Utc::now();
        let customer = Customer {
            customer_id: format!("cust_{}", Uuid::new_v4()),
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            company: input.company,
            notes: input.notes,
            status: input.status,
            assigned_sales_rep_id: input.assigned_sales_rep_id,
            total_orders: 0,
            total_value: BigDecimal::from(0),
            last_order_date: None,
            created_at: now,
            updated_at: now,
        };
        self.customers
            .lock()
            .unwrap()
            .insert(customer.customer_id.clone(), customer.clone());
        Ok(customer)
    }

    fn get(&self, customer_id: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self.customers.lock().unwrap().get(customer_id).cloned())
    }

    fn list(&self, filter: &CustomerFilter) -> Result<CustomerPage, DomainError> {
        let customers = self.customers.lock().unwrap();
        let mut matched: Vec<Customer> = customers
            .values()
            .filter(|c| {
                filter.status.as_deref().is_none_or(|s| c.status == s)
                    && filter
                        .sales_rep_id
                        .is_none_or(|r| c.assigned_sales_rep_id == Some(r))
                    && filter.search.as_deref().is_none_or(|q| {
                        let q = q.to_lowercase();
                        c.name.to_lowercase().contains(&q)
                            || c.email.to_lowercase().contains(&q)
                            || c.company.to_lowercase().contains(&q)
                    })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        let total = matched.len() as i64;
        let page: Vec<Customer> = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok(CustomerPage {
            customers: page,
            total,
        })
    }

    fn update(&self, customer_id: &str, patch: CustomerPatch) -> Result<Customer, DomainError> {
        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .get_mut(customer_id)
            .ok_or_else(|| DomainError::NotFound(format!("Customer not found: {customer_id}")))?;
        if let Some(name) = patch.name {
            customer.name = name;
        }
        if let Some(email) = patch.email {
            customer.email = email;
        }
        if let Some(phone) = patch.phone {
            customer.phone = phone;
        }
        if let Some(address) = patch.address {
            customer.address = address;
        }
        if let Some(company) = patch.company {
            customer.company = company;
        }
        if let Some(notes) = patch.notes {
            customer.notes = notes;
        }
        if let Some(status) = patch.status {
            customer.status = status;
        }
        if let Some(rep) = patch.assigned_sales_rep_id {
            customer.assigned_sales_rep_id = rep;
        }
        customer.updated_at = Utc::now();
        Ok(customer.clone())
    }

    fn delete(&self, customer_id: &str) -> Result<(), DomainError> {
        self.customers
            .lock()
            .unwrap()
            .remove(customer_id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Customer not found: {customer_id}")))
    }

    fn apply_order_delta(
        &self,
        customer_id: &str,
        delta: &OrderDelta,
    ) -> Result<(), DomainError> {
        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .get_mut(customer_id)
            .ok_or_else(|| DomainError::NotFound(format!("Customer not found: {customer_id}")))?;
        customer.total_orders += delta.orders;
        customer.total_value = &customer.total_value + &delta.value;
        if delta.last_order_date.is_some() {
            customer.last_order_date = delta.last_order_date;
        }
        customer.updated_at = Utc::now();
        Ok(())
    }
}

/// Dashboard stub for handler tests; every query returns an empty report.
#[derive(Default)]
pub struct MemoryDashboard;

impl DashboardQueries for MemoryDashboard {
    fn summary(&self, _range: DateRange) -> Result<DashboardSummary, DomainError> {
        let zero = BigDecimal::from(0);
        Ok(DashboardSummary {
            sales: SalesTotals {
                total_sales: 0,
                delivered_sales: 0,
                pending_sales: 0,
                cancelled_sales: 0,
                total_revenue: zero.clone(),
                avg_order_value: zero,
            },
            products: ProductTotals {
                total_products: 0,
                in_stock_products: 0,
                out_of_stock_products: 0,
                low_stock_products: 0,
            },
            customers: CustomerTotals {
                total_customers: 0,
                active_customers: 0,
            },
            sales_reps: StaffTotals {
                total_sales_reps: 0,
                active_sales_reps: 0,
            },
            recent_sales: vec![],
        })
    }

    fn sales_summary(&self, _range: DateRange) -> Result<Vec<SalesSummaryRow>, DomainError> {
        Ok(vec![])
    }

    fn top_products(&self, _range: DateRange) -> Result<Vec<TopProductRow>, DomainError> {
        Ok(vec![])
    }

    fn rep_performance(&self, _range: DateRange) -> Result<Vec<RepPerformanceRow>, DomainError> {
        Ok(vec![])
    }

    fn customer_insights(
        &self,
        _range: DateRange,
    ) -> Result<Vec<CustomerInsightRow>, DomainError> {
        Ok(vec![])
    }

    fn inventory_status(&self) -> Result<Vec<InventoryStatusRow>, DomainError> {
        Ok(vec![])
    }

    fn sales_trends(&self, _range: DateRange) -> Result<SalesTrends, DomainError> {
        Ok(SalesTrends {
            monthly_trends: vec![],
            status_trends: vec![],
        })
    }
}

/// Handles onto the fakes behind an [`AppState`], so handler tests can seed
/// data and inspect state after the request.
pub struct Fakes {
    pub catalog: std::sync::Arc<MemoryCatalog>,
    pub orders: std::sync::Arc<MemoryOrders>,
    pub customers: std::sync::Arc<MemoryCustomers>,
}

pub fn test_state() -> (crate::AppState, Fakes) {
    let catalog = std::sync::Arc::new(MemoryCatalog::new());
    let orders = std::sync::Arc::new(MemoryOrders::new());
    let customers = std::sync::Arc::new(MemoryCustomers::new());
    let state = crate::AppState {
        catalog: catalog.clone(),
        orders: orders.clone(),
        customers: customers.clone(),
        dashboard: std::sync::Arc::new(MemoryDashboard),
    };
    (
        state,
        Fakes {
            catalog,
            orders,
            customers,
        },
    )
}
